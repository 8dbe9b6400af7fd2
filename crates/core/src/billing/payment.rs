//! Payments and receipts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use orbis_shared::types::{CustomerId, InvoiceId, OrderId, PaymentId, UserId, VendorId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::invoice::InvoiceType;
use crate::orders::OrderKind;

/// Direction of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Money received from a customer.
    Receipt,
    /// Money paid to a vendor.
    Payment,
}

impl PaymentType {
    /// Returns the lowercase name stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Receipt => "receipt",
            Self::Payment => "payment",
        }
    }

    /// Name of the counterparty this payment type requires.
    #[must_use]
    pub const fn party_name(self) -> &'static str {
        match self {
            Self::Receipt => "customer",
            Self::Payment => "vendor",
        }
    }

    /// Kind of order this payment type may reference.
    #[must_use]
    pub const fn order_kind(self) -> OrderKind {
        match self {
            Self::Receipt => OrderKind::Sales,
            Self::Payment => OrderKind::Purchase,
        }
    }

    /// Type of invoice this payment type may reference.
    #[must_use]
    pub const fn invoice_type(self) -> InvoiceType {
        match self {
            Self::Receipt => InvoiceType::Sales,
            Self::Payment => InvoiceType::Purchase,
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "receipt" => Ok(Self::Receipt),
            "payment" => Ok(Self::Payment),
            other => Err(format!("unknown payment type: {other}")),
        }
    }
}

/// How the money moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash.
    #[default]
    Cash,
    /// Paper check.
    Check,
    /// Bank transfer.
    BankTransfer,
    /// Credit card.
    CreditCard,
    /// Anything else.
    Other,
}

impl PaymentMethod {
    /// Returns the snake_case name stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Check => "check",
            Self::BankTransfer => "bank_transfer",
            Self::CreditCard => "credit_card",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "check" => Ok(Self::Check),
            "bank_transfer" => Ok(Self::BankTransfer),
            "credit_card" => Ok(Self::CreditCard),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// A recorded payment or receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Payment ID.
    pub id: PaymentId,
    /// `PAY000001`-style number.
    pub payment_number: String,
    /// Receipt or payment.
    pub payment_type: PaymentType,
    /// Always positive.
    pub amount: Decimal,
    /// How the money moved.
    pub payment_method: PaymentMethod,
    /// When the money moved.
    pub payment_date: DateTime<Utc>,
    /// Bank or check reference.
    pub reference_number: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// User who recorded the payment.
    pub created_by: Option<UserId>,
    /// Receipts only: `RCPT000001`-style number.
    pub receipt_number: Option<String>,
    /// Receipts only: paying customer.
    pub customer_id: Option<CustomerId>,
    /// Payments only: paid vendor.
    pub vendor_id: Option<VendorId>,
    /// Related order.
    pub order_id: Option<OrderId>,
    /// Settled invoice.
    pub invoice_id: Option<InvoiceId>,
    /// Set once the amount has been added to the invoice.
    pub applied_to_invoice: bool,
}

/// Input for recording a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayment {
    /// Receipt or payment.
    pub payment_type: PaymentType,
    /// Must be positive.
    pub amount: Decimal,
    /// How the money moved.
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// When the money moved; now unless given.
    #[serde(default)]
    pub payment_date: Option<DateTime<Utc>>,
    /// Bank or check reference.
    #[serde(default)]
    pub reference_number: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Receipts only: paying customer.
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    /// Payments only: paid vendor.
    #[serde(default)]
    pub vendor_id: Option<VendorId>,
    /// Related order.
    #[serde(default)]
    pub order_id: Option<OrderId>,
    /// Invoice to settle; receipts only.
    #[serde(default)]
    pub invoice_id: Option<InvoiceId>,
    /// User recording the payment.
    #[serde(default)]
    pub created_by: Option<UserId>,
}
