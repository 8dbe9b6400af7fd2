//! Billing error types.

use rust_decimal::Decimal;
use thiserror::Error;

use super::invoice::InvoiceType;
use super::payment::PaymentType;

/// Errors that can occur during invoice and payment operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BillingError {
    // ========== Validation Errors ==========
    /// Invoice lacks the party its type requires.
    #[error("A {0} invoice requires a {party}", party = .0.party_name())]
    MissingInvoiceParty(InvoiceType),

    /// Payment lacks the party its type requires, or names the other one.
    #[error("A {0} must reference a {party} only", party = .0.party_name())]
    InvalidPaymentParty(PaymentType),

    /// Payment amount must be positive.
    #[error("Payment amount must be positive, got {0}")]
    InvalidPaymentAmount(Decimal),

    /// Paid amount cannot be negative.
    #[error("Paid amount cannot be negative")]
    NegativePaidAmount,

    /// Invoice item quantity must be positive.
    #[error("Quantity must be greater than zero, got {0}")]
    InvalidQuantity(Decimal),

    /// Invoice item price cannot be negative.
    #[error("Unit price cannot be negative")]
    NegativeUnitPrice,

    /// Invoice item needs a description.
    #[error("Item description is required")]
    MissingDescription,

    /// Tax rate outside 0-100.
    #[error("Tax rate must be between 0 and 100, got {0}")]
    InvalidTaxRate(Decimal),

    /// Flat discount cannot be negative.
    #[error("Discount amount cannot be negative")]
    NegativeDiscount,

    /// Due date precedes the invoice date.
    #[error("Due date cannot be before the invoice date")]
    DueBeforeIssue,

    /// An amount exceeds the representable range.
    #[error("Amount is too large")]
    AmountOutOfRange,

    /// Receipts reference sales orders, payments purchase orders.
    #[error("Order type does not match the payment type")]
    OrderKindMismatch,

    /// A linked order or invoice names another counterparty.
    #[error("Linked record belongs to a different {party}", party = .0.party_name())]
    LinkedPartyMismatch(PaymentType),

    // ========== Application Errors ==========
    /// Only receipts settle invoices.
    #[error("Only receipts can be applied to invoices")]
    NotAReceipt,

    /// Receipts settle sales invoices, payments reference purchase invoices.
    #[error("Invoice type does not match the payment type")]
    InvoiceTypeMismatch,

    /// The payment references another invoice.
    #[error("Payment is not linked to this invoice")]
    InvoiceMismatch,

    /// The payment was already applied.
    #[error("Payment has already been applied")]
    AlreadyApplied,

    /// Cancelled invoices cannot be settled.
    #[error("Invoice is cancelled")]
    InvoiceCancelled,

    /// Invoices with settled amounts cannot be deleted.
    #[error("Invoice has payments applied and cannot be deleted")]
    InvoiceHasPayments,
}

impl BillingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingInvoiceParty(_) => "MISSING_INVOICE_PARTY",
            Self::InvalidPaymentParty(_) => "INVALID_PAYMENT_PARTY",
            Self::InvalidPaymentAmount(_) => "INVALID_PAYMENT_AMOUNT",
            Self::NegativePaidAmount => "NEGATIVE_PAID_AMOUNT",
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::NegativeUnitPrice => "NEGATIVE_UNIT_PRICE",
            Self::MissingDescription => "MISSING_DESCRIPTION",
            Self::InvalidTaxRate(_) => "INVALID_TAX_RATE",
            Self::NegativeDiscount => "NEGATIVE_DISCOUNT",
            Self::DueBeforeIssue => "DUE_BEFORE_ISSUE",
            Self::AmountOutOfRange => "AMOUNT_OUT_OF_RANGE",
            Self::OrderKindMismatch => "ORDER_KIND_MISMATCH",
            Self::LinkedPartyMismatch(_) => "LINKED_PARTY_MISMATCH",
            Self::NotAReceipt => "NOT_A_RECEIPT",
            Self::InvoiceTypeMismatch => "INVOICE_TYPE_MISMATCH",
            Self::InvoiceMismatch => "INVOICE_MISMATCH",
            Self::AlreadyApplied => "ALREADY_APPLIED",
            Self::InvoiceCancelled => "INVOICE_CANCELLED",
            Self::InvoiceHasPayments => "INVOICE_HAS_PAYMENTS",
        }
    }

    /// Returns true for idempotency and state violations rather than bad input.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyApplied | Self::InvoiceCancelled | Self::InvoiceHasPayments
        )
    }
}
