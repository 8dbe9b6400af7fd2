//! Invoices and payments.
//!
//! Invoices are created directly or from an order; payments record a single
//! cash movement and, for receipts linked to an invoice, settle it exactly
//! once at creation time.

pub mod error;
pub mod invoice;
pub mod payment;
pub mod service;

#[cfg(test)]
mod billing_props;

pub use error::BillingError;
pub use invoice::{
    CreateInvoice, Invoice, InvoiceItem, InvoiceStatus, InvoiceTotals, InvoiceType, InvoiceUpdate,
    NewInvoice, NewInvoiceItem, PricedInvoiceItem, invoice_line_total,
};
pub use payment::{NewPayment, Payment, PaymentMethod, PaymentType};
pub use service::BillingService;
