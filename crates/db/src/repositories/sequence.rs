//! Transactional document numbering.
//!
//! Counters live in the `sequences` table and are advanced with a single
//! upsert, so two concurrent creators never read the same value. Call these
//! functions with the transaction that inserts the numbered row; a rollback
//! then also returns the number.

use orbis_core::numbering::SequenceScope;
use sea_orm::{ConnectionTrait, DbBackend, DbErr, Statement};

const NEXT_VALUE_SQL: &str = r"
INSERT INTO sequences (scope, value) VALUES ($1, 1)
ON CONFLICT (scope) DO UPDATE SET value = sequences.value + 1
RETURNING value
";

/// Advances the counter of `scope` and returns its new value (1-based).
///
/// # Errors
///
/// Returns an error if the upsert fails.
pub async fn next_value<C: ConnectionTrait>(conn: &C, scope: &SequenceScope) -> Result<i64, DbErr> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DbBackend::Postgres,
            NEXT_VALUE_SQL,
            [scope.key().into()],
        ))
        .await?
        .ok_or_else(|| DbErr::Custom(format!("sequence {} returned no row", scope.key())))?;
    row.try_get("", "value")
}

/// Advances the counter of `scope` and formats the resulting number.
///
/// # Errors
///
/// Returns an error if the upsert fails.
pub async fn next_number<C: ConnectionTrait>(
    conn: &C,
    scope: &SequenceScope,
) -> Result<String, DbErr> {
    let value = next_value(conn, scope).await?;
    Ok(scope.format(value))
}
