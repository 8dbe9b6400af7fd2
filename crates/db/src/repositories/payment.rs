//! Payment repository.
//!
//! A receipt linked to an invoice settles it in the transaction that records
//! the receipt, with the invoice row locked. That application never runs
//! again for the same payment. A vendor payment may reference a purchase
//! invoice; the link is kept but settles nothing.

use chrono::Utc;
use orbis_core::billing::{
    BillingError, BillingService, Invoice, NewPayment, Payment, PaymentType,
};
use orbis_core::numbering::SequenceScope;
use orbis_core::orders::Order;
use orbis_shared::AppError;
use orbis_shared::types::{
    CustomerId, InvoiceId, OrderId, PageRequest, PageResponse, PaymentId, VendorId,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;

use super::{invoice as invoices, sequence};
use crate::entities::{
    customers, invoices as invoice_rows, orders, payments,
    sea_orm_active_enums::{PaymentMethod as DbPaymentMethod, PaymentType as DbPaymentType},
    vendors,
};
use crate::error;

/// Error types for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentRepoError {
    /// Rejected by the billing rules.
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// Payment not found.
    #[error("Payment not found: {0}")]
    NotFound(PaymentId),

    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(InvoiceId),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// Vendor not found.
    #[error("Vendor not found: {0}")]
    VendorNotFound(VendorId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PaymentRepoError> for AppError {
    fn from(err: PaymentRepoError) -> Self {
        match &err {
            PaymentRepoError::Billing(e) => error::billing(e),
            PaymentRepoError::Database(e) => error::database(e),
            _ => Self::NotFound(err.to_string()),
        }
    }
}

/// Filter options for listing payments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentFilter {
    /// Only payments of this type.
    #[serde(default, rename = "type")]
    pub payment_type: Option<PaymentType>,
    /// Only payments linked to this invoice.
    #[serde(default)]
    pub invoice_id: Option<InvoiceId>,
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a payment or receipt, applying a linked receipt to its
    /// invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid, a linked record does not
    /// exist or belongs to another party or payment direction, or the
    /// invoice cannot take the receipt.
    pub async fn create_payment(&self, input: NewPayment) -> Result<Payment, PaymentRepoError> {
        BillingService::validate_payment(&input)?;
        self.ensure_links(&input).await?;

        let txn = self.db.begin().await?;
        let payment_number = sequence::next_number(&txn, &SequenceScope::Payment).await?;
        let receipt_number = match input.payment_type {
            PaymentType::Receipt => {
                Some(sequence::next_number(&txn, &SequenceScope::Receipt).await?)
            }
            PaymentType::Payment => None,
        };

        let mut payment = Payment {
            id: PaymentId::new(),
            payment_number,
            payment_type: input.payment_type,
            amount: input.amount,
            payment_method: input.payment_method,
            payment_date: input.payment_date.unwrap_or_else(Utc::now),
            reference_number: input.reference_number,
            notes: input.notes,
            created_by: input.created_by,
            receipt_number,
            customer_id: input.customer_id,
            vendor_id: input.vendor_id,
            order_id: input.order_id,
            invoice_id: input.invoice_id,
            applied_to_invoice: false,
        };

        if let Some(invoice_id) = payment.invoice_id
            && payment.payment_type == PaymentType::Receipt
        {
            let mut invoice = invoices::lock_invoice(&txn, invoice_id)
                .await?
                .ok_or(PaymentRepoError::InvoiceNotFound(invoice_id))?;
            BillingService::apply_payment(&mut invoice, &mut payment)?;
            invoices::save_invoice(&txn, &invoice).await?;
            tracing::info!(
                invoice_number = %invoice.invoice_number,
                paid_amount = %invoice.paid_amount,
                status = %invoice.status,
                "receipt applied to invoice"
            );
        }

        payments::ActiveModel {
            id: Set(payment.id.into_inner()),
            payment_number: Set(payment.payment_number.clone()),
            payment_type: Set(DbPaymentType::from(payment.payment_type)),
            amount: Set(payment.amount),
            payment_method: Set(DbPaymentMethod::from(payment.payment_method)),
            payment_date: Set(payment.payment_date.into()),
            reference_number: Set(payment.reference_number.clone()),
            notes: Set(payment.notes.clone()),
            created_by: Set(payment.created_by.map(|u| u.into_inner())),
            receipt_number: Set(payment.receipt_number.clone()),
            customer_id: Set(payment.customer_id.map(CustomerId::into_inner)),
            vendor_id: Set(payment.vendor_id.map(VendorId::into_inner)),
            order_id: Set(payment.order_id.map(OrderId::into_inner)),
            invoice_id: Set(payment.invoice_id.map(InvoiceId::into_inner)),
            applied_to_invoice: Set(payment.applied_to_invoice),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        tracing::info!(
            payment_number = %payment.payment_number,
            payment_type = %payment.payment_type,
            amount = %payment.amount,
            "payment recorded"
        );
        Ok(payment)
    }

    /// Finds a payment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment does not exist.
    pub async fn get_payment(&self, id: PaymentId) -> Result<Payment, PaymentRepoError> {
        payments::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .map(Payment::from)
            .ok_or(PaymentRepoError::NotFound(id))
    }

    /// Lists payments, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_payments(
        &self,
        filter: &PaymentFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<Payment>, PaymentRepoError> {
        let mut query = payments::Entity::find().order_by_desc(payments::Column::PaymentDate);
        if let Some(payment_type) = filter.payment_type {
            query = query.filter(payments::Column::PaymentType.eq(DbPaymentType::from(payment_type)));
        }
        if let Some(invoice_id) = filter.invoice_id {
            query = query.filter(payments::Column::InvoiceId.eq(invoice_id.into_inner()));
        }

        let page = page.normalized();
        let total = query.clone().count(&self.db).await?;
        let data = query
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?
            .into_iter()
            .map(Payment::from)
            .collect();
        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    async fn ensure_links(&self, input: &NewPayment) -> Result<(), PaymentRepoError> {
        if let Some(id) = input.customer_id
            && customers::Entity::find_by_id(id.into_inner())
                .one(&self.db)
                .await?
                .is_none()
        {
            return Err(PaymentRepoError::CustomerNotFound(id));
        }
        if let Some(id) = input.vendor_id
            && vendors::Entity::find_by_id(id.into_inner())
                .one(&self.db)
                .await?
                .is_none()
        {
            return Err(PaymentRepoError::VendorNotFound(id));
        }
        let order = match input.order_id {
            Some(id) => Some(Order::try_from(
                orders::Entity::find_by_id(id.into_inner())
                    .one(&self.db)
                    .await?
                    .ok_or(PaymentRepoError::OrderNotFound(id))?,
            )?),
            None => None,
        };
        let invoice = match input.invoice_id {
            Some(id) => Some(
                invoice_rows::Entity::find_by_id(id.into_inner())
                    .one(&self.db)
                    .await?
                    .map(Invoice::from)
                    .ok_or(PaymentRepoError::InvoiceNotFound(id))?,
            ),
            None => None,
        };
        BillingService::validate_payment_links(input, order.as_ref(), invoice.as_ref())?;
        Ok(())
    }
}
