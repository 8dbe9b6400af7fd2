//! `SeaORM` entity definitions.
//!
//! One module per table. Database enums live in [`sea_orm_active_enums`]
//! together with their conversions to the domain enums of `orbis-core`.

pub mod chart_of_accounts;
pub mod customers;
pub mod inventory;
pub mod inventory_transactions;
pub mod invoice_items;
pub mod invoices;
pub mod journal_entries;
pub mod journal_lines;
pub mod order_items;
pub mod orders;
pub mod payments;
pub mod products;
pub mod sea_orm_active_enums;
pub mod sequences;
pub mod vendors;
pub mod warehouses;
