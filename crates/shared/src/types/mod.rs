//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::{checked_sum, percent_of, round_money, validate_percent};
pub use pagination::{PageRequest, PageResponse};
