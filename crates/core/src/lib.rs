//! Core business logic for Orbis.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here; the database
//! layer executes the decisions made here inside its own transactions.
//!
//! # Modules
//!
//! - `ledger` - Double-entry bookkeeping, chart of accounts, balances
//! - `reports` - Balance sheet, trial balance, income statement
//! - `inventory` - Stock levels, stock movements, reservations
//! - `orders` - Sales and purchase orders, totals, status transitions
//! - `billing` - Invoices, payments, settlement
//! - `numbering` - Human-readable document numbers

pub mod billing;
pub mod inventory;
pub mod ledger;
pub mod numbering;
pub mod orders;
pub mod reports;
