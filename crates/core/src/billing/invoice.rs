//! Invoice types and invoice arithmetic.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use orbis_shared::types::{
    CustomerId, InvoiceId, OrderId, ProductId, UserId, VendorId, checked_sum, percent_of,
    round_money,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::BillingError;
use crate::orders::OrderKind;

/// Sales (to a customer) or purchase (from a vendor) invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceType {
    /// Issued to a customer.
    Sales,
    /// Received from a vendor.
    Purchase,
}

impl InvoiceType {
    /// Invoice number prefix.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Sales => "SI",
            Self::Purchase => "PI",
        }
    }

    /// Returns the lowercase name stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Purchase => "purchase",
        }
    }

    /// Name of the party this invoice type requires.
    #[must_use]
    pub const fn party_name(self) -> &'static str {
        match self {
            Self::Sales => "customer",
            Self::Purchase => "vendor",
        }
    }
}

impl From<OrderKind> for InvoiceType {
    fn from(kind: OrderKind) -> Self {
        match kind {
            OrderKind::Sales => Self::Sales,
            OrderKind::Purchase => Self::Purchase,
        }
    }
}

impl fmt::Display for InvoiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sales" => Ok(Self::Sales),
            "purchase" => Ok(Self::Purchase),
            other => Err(format!("unknown invoice type: {other}")),
        }
    }
}

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Not yet issued.
    #[default]
    Draft,
    /// Issued, not fully paid.
    Sent,
    /// Fully paid.
    Paid,
    /// Flagged overdue by a user.
    Overdue,
    /// Void.
    Cancelled,
}

impl InvoiceStatus {
    /// Returns true for statuses that end the invoice's life.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }

    /// Status implied by a paid amount: `paid` once it covers the total.
    #[must_use]
    pub fn from_settlement(paid_amount: Decimal, total_amount: Decimal) -> Self {
        if paid_amount >= total_amount {
            Self::Paid
        } else {
            Self::Sent
        }
    }

    /// Returns the lowercase name stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown invoice status: {other}")),
        }
    }
}

/// Derived totals of an invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// `subtotal * tax_rate / 100`.
    pub tax_amount: Decimal,
    /// `subtotal + tax_amount - discount_amount`.
    pub total_amount: Decimal,
}

impl InvoiceTotals {
    /// Recomputes totals from line totals, the tax rate and a flat discount.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::AmountOutOfRange` if a total overflows.
    pub fn recompute(
        line_totals: impl IntoIterator<Item = Decimal>,
        tax_rate: Decimal,
        discount_amount: Decimal,
    ) -> Result<Self, BillingError> {
        let subtotal = round_money(checked_sum(line_totals).ok_or(BillingError::AmountOutOfRange)?);
        let tax_amount =
            round_money(percent_of(subtotal, tax_rate).ok_or(BillingError::AmountOutOfRange)?);
        let total_amount = subtotal
            .checked_add(tax_amount)
            .and_then(|gross| gross.checked_sub(discount_amount))
            .ok_or(BillingError::AmountOutOfRange)?;
        Ok(Self {
            subtotal,
            tax_amount,
            total_amount,
        })
    }
}

/// `quantity * unit_price`, rounded to cents.
///
/// # Errors
///
/// Returns `BillingError::AmountOutOfRange` if the product overflows.
pub fn invoice_line_total(quantity: Decimal, unit_price: Decimal) -> Result<Decimal, BillingError> {
    quantity
        .checked_mul(unit_price)
        .map(round_money)
        .ok_or(BillingError::AmountOutOfRange)
}

/// An invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice ID.
    pub id: InvoiceId,
    /// `{SI|PI}-YYYYMMDD-NNNN`, immutable once assigned.
    pub invoice_number: String,
    /// Sales or purchase; immutable.
    pub invoice_type: InvoiceType,
    /// Current status.
    pub status: InvoiceStatus,
    /// Issue date.
    pub invoice_date: NaiveDate,
    /// Payment due date.
    pub due_date: NaiveDate,
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Tax rate, percent.
    pub tax_rate: Decimal,
    /// Tax amount.
    pub tax_amount: Decimal,
    /// Flat discount.
    pub discount_amount: Decimal,
    /// Amount due in total.
    pub total_amount: Decimal,
    /// Amount settled so far.
    pub paid_amount: Decimal,
    /// Sales only: billed customer.
    pub customer_id: Option<CustomerId>,
    /// Purchase only: billing vendor.
    pub vendor_id: Option<VendorId>,
    /// Originating order.
    pub order_id: Option<OrderId>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Payment terms text.
    pub terms_and_conditions: Option<String>,
    /// User who created the invoice.
    pub created_by: Option<UserId>,
}

impl Invoice {
    /// `total_amount - paid_amount`.
    #[must_use]
    pub fn balance_due(&self) -> Decimal {
        self.total_amount - self.paid_amount
    }

    /// True if past due and not paid or cancelled.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date < today && !self.status.is_terminal()
    }

    /// Whole days past the due date, or 0 if not overdue.
    #[must_use]
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        if self.is_overdue(today) {
            (today - self.due_date).num_days()
        } else {
            0
        }
    }

    /// Returns the stored derived totals.
    #[must_use]
    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals {
            subtotal: self.subtotal,
            tax_amount: self.tax_amount,
            total_amount: self.total_amount,
        }
    }

    /// Recomputes the derived totals from the given items.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::AmountOutOfRange` if a total overflows; the
    /// stored totals are left unchanged.
    pub fn recompute(&mut self, items: &[InvoiceItem]) -> Result<InvoiceTotals, BillingError> {
        let totals = InvoiceTotals::recompute(
            items.iter().map(|i| i.line_total),
            self.tax_rate,
            self.discount_amount,
        )?;
        self.subtotal = totals.subtotal;
        self.tax_amount = totals.tax_amount;
        self.total_amount = totals.total_amount;
        Ok(totals)
    }

    /// Sets the paid amount, defaulting to the full total, and derives status.
    ///
    /// # Errors
    ///
    /// Returns an error for a negative amount or a cancelled invoice.
    pub fn mark_as_paid(&mut self, amount: Option<Decimal>) -> Result<(), BillingError> {
        if self.status == InvoiceStatus::Cancelled {
            return Err(BillingError::InvoiceCancelled);
        }
        let amount = amount.unwrap_or(self.total_amount);
        if amount < Decimal::ZERO {
            return Err(BillingError::NegativePaidAmount);
        }
        self.paid_amount = amount;
        self.status = InvoiceStatus::from_settlement(self.paid_amount, self.total_amount);
        Ok(())
    }
}

/// An invoice line, independent of order items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Integer surrogate key.
    pub id: i64,
    /// Owning invoice.
    pub invoice_id: InvoiceId,
    /// Optional product reference.
    pub product_id: Option<ProductId>,
    /// Line description.
    pub description: String,
    /// Quantity, greater than zero.
    pub quantity: Decimal,
    /// Price per unit, not negative.
    pub unit_price: Decimal,
    /// `quantity * unit_price`.
    pub line_total: Decimal,
}

/// Input for an invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInvoiceItem {
    /// Optional product reference.
    #[serde(default)]
    pub product_id: Option<ProductId>,
    /// Line description.
    pub description: String,
    /// Quantity, greater than zero.
    pub quantity: Decimal,
    /// Price per unit, not negative.
    pub unit_price: Decimal,
}

/// A validated invoice line with its total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedInvoiceItem {
    /// Optional product reference.
    pub product_id: Option<ProductId>,
    /// Line description.
    pub description: String,
    /// Quantity.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// `quantity * unit_price`.
    pub line_total: Decimal,
}

/// Input for creating an invoice directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInvoice {
    /// Sales or purchase.
    pub invoice_type: InvoiceType,
    /// Initial status, draft unless given.
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
    /// Issue date, today unless given.
    #[serde(default)]
    pub invoice_date: Option<NaiveDate>,
    /// Due date, issue date plus the configured term unless given.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Tax rate, percent.
    #[serde(default)]
    pub tax_rate: Decimal,
    /// Flat discount.
    #[serde(default)]
    pub discount_amount: Decimal,
    /// Customer; ignored on purchase invoices.
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    /// Vendor; ignored on sales invoices.
    #[serde(default)]
    pub vendor_id: Option<VendorId>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Payment terms text.
    #[serde(default)]
    pub terms_and_conditions: Option<String>,
    /// Initial lines.
    #[serde(default)]
    pub items: Vec<NewInvoiceItem>,
    /// User creating the invoice.
    #[serde(default)]
    pub created_by: Option<UserId>,
}

/// A validated invoice ready to insert, still without a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewInvoice {
    /// Sales or purchase.
    pub invoice_type: InvoiceType,
    /// Initial status.
    pub status: InvoiceStatus,
    /// Issue date.
    pub invoice_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Tax rate, percent.
    pub tax_rate: Decimal,
    /// Flat discount.
    pub discount_amount: Decimal,
    /// Derived totals.
    pub totals: InvoiceTotals,
    /// Sales only: customer.
    pub customer_id: Option<CustomerId>,
    /// Purchase only: vendor.
    pub vendor_id: Option<VendorId>,
    /// Originating order.
    pub order_id: Option<OrderId>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Payment terms text.
    pub terms_and_conditions: Option<String>,
    /// Lines to insert with the invoice.
    pub items: Vec<PricedInvoiceItem>,
    /// User creating the invoice.
    pub created_by: Option<UserId>,
}

/// Partial update of an invoice.
///
/// Type and number cannot change. The party field that does not belong to
/// the invoice type is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceUpdate {
    /// New status.
    pub status: Option<InvoiceStatus>,
    /// New issue date.
    pub invoice_date: Option<NaiveDate>,
    /// New due date.
    pub due_date: Option<NaiveDate>,
    /// New tax rate.
    pub tax_rate: Option<Decimal>,
    /// New flat discount.
    pub discount_amount: Option<Decimal>,
    /// New customer (sales only).
    pub customer_id: Option<CustomerId>,
    /// New vendor (purchase only).
    pub vendor_id: Option<VendorId>,
    /// New notes.
    pub notes: Option<String>,
    /// New terms text.
    pub terms_and_conditions: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn invoice(total: Decimal) -> Invoice {
        Invoice {
            id: InvoiceId::new(),
            invoice_number: "SI-20260115-0001".into(),
            invoice_type: InvoiceType::Sales,
            status: InvoiceStatus::Sent,
            invoice_date: date(2026, 1, 15),
            due_date: date(2026, 2, 14),
            subtotal: total,
            tax_rate: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            total_amount: total,
            paid_amount: Decimal::ZERO,
            customer_id: Some(CustomerId::new()),
            vendor_id: None,
            order_id: None,
            notes: None,
            terms_and_conditions: None,
            created_by: None,
        }
    }

    #[test]
    fn test_overdue_and_days_overdue() {
        let inv = invoice(dec!(100));
        assert!(!inv.is_overdue(date(2026, 2, 14)));
        assert_eq!(inv.days_overdue(date(2026, 2, 14)), 0);
        assert!(inv.is_overdue(date(2026, 2, 20)));
        assert_eq!(inv.days_overdue(date(2026, 2, 20)), 6);
    }

    #[test]
    fn test_paid_invoice_is_never_overdue() {
        let mut inv = invoice(dec!(100));
        inv.status = InvoiceStatus::Paid;
        assert!(!inv.is_overdue(date(2027, 1, 1)));
        inv.status = InvoiceStatus::Cancelled;
        assert_eq!(inv.days_overdue(date(2027, 1, 1)), 0);
    }

    #[test]
    fn test_recompute_subtracts_flat_discount_after_tax() {
        let mut inv = invoice(Decimal::ZERO);
        inv.tax_rate = dec!(10);
        inv.discount_amount = dec!(5);
        let items = vec![InvoiceItem {
            id: 1,
            invoice_id: inv.id,
            product_id: None,
            description: "Consulting".into(),
            quantity: dec!(2.5),
            unit_price: dec!(40),
            line_total: invoice_line_total(dec!(2.5), dec!(40)).unwrap(),
        }];
        let totals = inv.recompute(&items).unwrap();
        assert_eq!(totals.subtotal, dec!(100));
        assert_eq!(totals.tax_amount, dec!(10));
        assert_eq!(totals.total_amount, dec!(105));
        assert_eq!(inv.balance_due(), dec!(105));
    }

    #[test]
    fn test_recompute_after_last_item_deleted() {
        let mut inv = invoice(dec!(100));
        inv.tax_rate = dec!(10);
        let totals = inv.recompute(&[]).unwrap();
        assert_eq!(totals, InvoiceTotals::default());
    }

    #[test]
    fn test_line_total_out_of_range() {
        assert_eq!(
            invoice_line_total(dec!(100000000000000000000), dec!(100000000000000000000)),
            Err(BillingError::AmountOutOfRange)
        );
        assert_eq!(invoice_line_total(dec!(1.5), dec!(3.33)), Ok(dec!(5.00)));
    }

    #[test]
    fn test_recompute_out_of_range_keeps_stored_totals() {
        let mut inv = invoice(dec!(100));
        let huge = InvoiceItem {
            id: 1,
            invoice_id: inv.id,
            product_id: None,
            description: "Bulk".into(),
            quantity: dec!(1),
            unit_price: Decimal::MAX,
            line_total: Decimal::MAX,
        };
        let items = vec![huge.clone(), InvoiceItem { id: 2, ..huge }];
        assert_eq!(inv.recompute(&items), Err(BillingError::AmountOutOfRange));
        assert_eq!(inv.total_amount, dec!(100));
    }

    #[test]
    fn test_mark_as_paid_defaults_to_total() {
        let mut inv = invoice(dec!(250));
        inv.mark_as_paid(None).unwrap();
        assert_eq!(inv.paid_amount, dec!(250));
        assert_eq!(inv.status, InvoiceStatus::Paid);
        assert_eq!(inv.balance_due(), Decimal::ZERO);
    }

    #[test]
    fn test_mark_as_paid_partial_amount() {
        let mut inv = invoice(dec!(250));
        inv.mark_as_paid(Some(dec!(100))).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Sent);
        assert_eq!(inv.balance_due(), dec!(150));
    }

    #[test]
    fn test_mark_as_paid_rejects_cancelled() {
        let mut inv = invoice(dec!(250));
        inv.status = InvoiceStatus::Cancelled;
        assert_eq!(inv.mark_as_paid(None), Err(BillingError::InvoiceCancelled));
    }

    #[test]
    fn test_type_prefix() {
        assert_eq!(InvoiceType::Sales.prefix(), "SI");
        assert_eq!(InvoiceType::Purchase.prefix(), "PI");
        assert_eq!(InvoiceType::from(OrderKind::Purchase), InvoiceType::Purchase);
    }
}
