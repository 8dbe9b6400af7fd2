//! Financial report generation.
//!
//! This module provides pure business logic for generating financial reports
//! from per-account balances:
//! - Balance Sheet (with current/non-current buckets and retained earnings)
//! - Trial Balance
//! - Income Statement

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
