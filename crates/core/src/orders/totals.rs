//! Order total calculation.
//!
//! Every stored amount is rounded to cents at the step that produces it, so
//! `total_amount == subtotal - discount_amount + tax_amount` holds exactly.
//! Arithmetic is checked; amounts beyond the decimal range are rejected.

use orbis_shared::types::{checked_sum, percent_of, round_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::OrderError;

/// Derived totals of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Order-level discount.
    pub discount_amount: Decimal,
    /// Tax on the discounted subtotal.
    pub tax_amount: Decimal,
    /// Amount due.
    pub total_amount: Decimal,
}

impl OrderTotals {
    /// Recomputes totals from line totals and the order-level rates.
    ///
    /// Idempotent: the result depends only on the inputs.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::AmountOutOfRange` if a total overflows.
    pub fn recompute(
        line_totals: impl IntoIterator<Item = Decimal>,
        discount_percent: Decimal,
        tax_rate: Decimal,
    ) -> Result<Self, OrderError> {
        let subtotal = round_money(checked_sum(line_totals).ok_or(OrderError::AmountOutOfRange)?);
        let discount_amount = round_money(
            percent_of(subtotal, discount_percent).ok_or(OrderError::AmountOutOfRange)?,
        );
        let taxable = subtotal - discount_amount;
        let tax_amount =
            round_money(percent_of(taxable, tax_rate).ok_or(OrderError::AmountOutOfRange)?);

        Ok(Self {
            subtotal,
            discount_amount,
            tax_amount,
            total_amount: taxable
                .checked_add(tax_amount)
                .ok_or(OrderError::AmountOutOfRange)?,
        })
    }
}

/// `unit_price * quantity` less the item-level discount, rounded to cents.
///
/// # Errors
///
/// Returns `OrderError::AmountOutOfRange` if the product overflows.
pub fn line_total(
    unit_price: Decimal,
    quantity: i32,
    discount_percent: Decimal,
) -> Result<Decimal, OrderError> {
    let gross = unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(OrderError::AmountOutOfRange)?;
    let discount = percent_of(gross, discount_percent).ok_or(OrderError::AmountOutOfRange)?;
    Ok(round_money(gross - discount))
}
