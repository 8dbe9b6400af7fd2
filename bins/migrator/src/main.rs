//! Database migration runner for Orbis.
//!
//! Usage:
//!   migrator up      - Apply the schema
//!   migrator down    - Roll the schema back
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop everything and re-apply
//!
//! The connection string is read from `DATABASE_URL`.

use orbis_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The CLI sets up its own tracing.
    cli::run_cli(Migrator).await;
}
