//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` and stored amounts carry two decimal places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept on stored monetary amounts.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to cent precision (half away from zero).
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `percent` percent of `amount`, unrounded, or `None` on overflow.
#[must_use]
pub fn percent_of(amount: Decimal, percent: Decimal) -> Option<Decimal> {
    amount.checked_mul(percent)?.checked_div(Decimal::ONE_HUNDRED)
}

/// Sums amounts, returning `None` on overflow.
#[must_use]
pub fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
}

/// Checks that a percentage lies within `0..=100`.
///
/// # Errors
///
/// Returns the offending value when it is out of range.
pub fn validate_percent(percent: Decimal) -> Result<Decimal, Decimal> {
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(percent);
    }
    Ok(percent)
}
