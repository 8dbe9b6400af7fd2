//! Invoice repository.
//!
//! Direct creation and order-triggered creation share [`insert_invoice`], so
//! numbering and totals behave the same on both paths.

use chrono::{NaiveDate, Utc};
use orbis_core::billing::{
    BillingError, BillingService, CreateInvoice, Invoice, InvoiceItem, InvoiceStatus, InvoiceType,
    InvoiceUpdate, NewInvoice, NewInvoiceItem,
};
use orbis_core::numbering::SequenceScope;
use orbis_shared::AppError;
use orbis_shared::types::{CustomerId, InvoiceId, PageRequest, PageResponse, ProductId, VendorId};
use rust_decimal::Decimal;
use sea_orm::sea_query::Condition;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};

use super::sequence;
use crate::entities::{
    customers, invoice_items, invoices, products,
    sea_orm_active_enums::{InvoiceStatus as DbInvoiceStatus, InvoiceType as DbInvoiceType},
    vendors,
};
use crate::error;

/// Error types for invoice operations.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceRepoError {
    /// Rejected by the billing rules.
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    NotFound(InvoiceId),

    /// Invoice item not found.
    #[error("Invoice item not found: {0}")]
    ItemNotFound(i64),

    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// Vendor not found.
    #[error("Vendor not found: {0}")]
    VendorNotFound(VendorId),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<InvoiceRepoError> for AppError {
    fn from(err: InvoiceRepoError) -> Self {
        match &err {
            InvoiceRepoError::Billing(e) => error::billing(e),
            InvoiceRepoError::Database(e) => error::database(e),
            _ => Self::NotFound(err.to_string()),
        }
    }
}

/// Invoice with the figures derived from it at a given date.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceView {
    /// The invoice.
    #[serde(flatten)]
    pub invoice: Invoice,
    /// `total_amount - paid_amount`.
    pub balance_due: Decimal,
    /// Past due and neither paid nor cancelled.
    pub is_overdue: bool,
    /// Days past the due date, 0 if not overdue.
    pub days_overdue: i64,
}

impl InvoiceView {
    /// Derives the view of `invoice` as of `today`.
    #[must_use]
    pub fn new(invoice: Invoice, today: NaiveDate) -> Self {
        Self {
            balance_due: invoice.balance_due(),
            is_overdue: invoice.is_overdue(today),
            days_overdue: invoice.days_overdue(today),
            invoice,
        }
    }
}

/// Invoice view with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDetail {
    /// The invoice and its derived figures.
    #[serde(flatten)]
    pub view: InvoiceView,
    /// Invoice lines.
    pub items: Vec<InvoiceItem>,
}

/// Filter options for listing invoices.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceFilter {
    /// Only invoices with this status.
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
    /// Only invoices of this type.
    #[serde(default, rename = "type")]
    pub invoice_type: Option<InvoiceType>,
    /// Only overdue (`true`) or not overdue (`false`) invoices.
    #[serde(default)]
    pub overdue: Option<bool>,
}

/// Inserts a prepared invoice and its lines, numbering it in `conn`.
///
/// # Errors
///
/// Returns an error if the sequence or an insert fails.
pub(crate) async fn insert_invoice<C: ConnectionTrait>(
    conn: &C,
    input: NewInvoice,
) -> Result<(Invoice, Vec<InvoiceItem>), DbErr> {
    let scope = SequenceScope::Invoice {
        invoice_type: input.invoice_type,
        date: input.invoice_date,
    };
    let invoice_number = sequence::next_number(conn, &scope).await?;
    let now = Utc::now();
    let id = InvoiceId::new();

    let invoice = invoices::ActiveModel {
        id: Set(id.into_inner()),
        invoice_number: Set(invoice_number),
        invoice_type: Set(DbInvoiceType::from(input.invoice_type)),
        status: Set(DbInvoiceStatus::from(input.status)),
        invoice_date: Set(input.invoice_date),
        due_date: Set(input.due_date),
        subtotal: Set(input.totals.subtotal),
        tax_rate: Set(input.tax_rate),
        tax_amount: Set(input.totals.tax_amount),
        discount_amount: Set(input.discount_amount),
        total_amount: Set(input.totals.total_amount),
        paid_amount: Set(Decimal::ZERO),
        customer_id: Set(input.customer_id.map(CustomerId::into_inner)),
        vendor_id: Set(input.vendor_id.map(VendorId::into_inner)),
        order_id: Set(input.order_id.map(|o| o.into_inner())),
        notes: Set(input.notes),
        terms_and_conditions: Set(input.terms_and_conditions),
        created_by: Set(input.created_by.map(|u| u.into_inner())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(conn)
    .await?;

    let mut items = Vec::with_capacity(input.items.len());
    for item in input.items {
        let model = invoice_items::ActiveModel {
            invoice_id: Set(id.into_inner()),
            product_id: Set(item.product_id.map(ProductId::into_inner)),
            description: Set(item.description),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            line_total: Set(item.line_total),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        items.push(InvoiceItem::from(model));
    }

    tracing::info!(
        invoice_number = %invoice.invoice_number,
        invoice_type = %input.invoice_type,
        total = %invoice.total_amount,
        "invoice created"
    );
    Ok((Invoice::from(invoice), items))
}

/// Loads an invoice under `FOR UPDATE`.
pub(crate) async fn lock_invoice<C: ConnectionTrait>(
    conn: &C,
    id: InvoiceId,
) -> Result<Option<Invoice>, DbErr> {
    Ok(invoices::Entity::find_by_id(id.into_inner())
        .lock_exclusive()
        .one(conn)
        .await?
        .map(Invoice::from))
}

/// Writes the mutable header fields of an invoice.
pub(crate) async fn save_invoice<C: ConnectionTrait>(
    conn: &C,
    invoice: &Invoice,
) -> Result<(), DbErr> {
    invoices::ActiveModel {
        id: Unchanged(invoice.id.into_inner()),
        status: Set(DbInvoiceStatus::from(invoice.status)),
        invoice_date: Set(invoice.invoice_date),
        due_date: Set(invoice.due_date),
        subtotal: Set(invoice.subtotal),
        tax_rate: Set(invoice.tax_rate),
        tax_amount: Set(invoice.tax_amount),
        discount_amount: Set(invoice.discount_amount),
        total_amount: Set(invoice.total_amount),
        paid_amount: Set(invoice.paid_amount),
        customer_id: Set(invoice.customer_id.map(CustomerId::into_inner)),
        vendor_id: Set(invoice.vendor_id.map(VendorId::into_inner)),
        notes: Set(invoice.notes.clone()),
        terms_and_conditions: Set(invoice.terms_and_conditions.clone()),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .update(conn)
    .await?;
    Ok(())
}

/// Returns true if an invoice already references the order.
pub(crate) async fn order_has_invoice<C: ConnectionTrait>(
    conn: &C,
    order_id: uuid::Uuid,
) -> Result<bool, DbErr> {
    let count = invoices::Entity::find()
        .filter(invoices::Column::OrderId.eq(order_id))
        .count(conn)
        .await?;
    Ok(count > 0)
}

async fn load_items<C: ConnectionTrait>(
    conn: &C,
    invoice_id: InvoiceId,
) -> Result<Vec<InvoiceItem>, DbErr> {
    Ok(invoice_items::Entity::find()
        .filter(invoice_items::Column::InvoiceId.eq(invoice_id.into_inner()))
        .order_by_asc(invoice_items::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(InvoiceItem::from)
        .collect())
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an invoice directly.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid or references an unknown
    /// party or product.
    pub async fn create_invoice(
        &self,
        input: CreateInvoice,
        due_days: u32,
    ) -> Result<InvoiceDetail, InvoiceRepoError> {
        let today = Utc::now().date_naive();
        let prepared = BillingService::prepare_invoice(input, today, due_days)?;
        self.ensure_parties(prepared.customer_id, prepared.vendor_id)
            .await?;
        for item in &prepared.items {
            if let Some(product_id) = item.product_id {
                self.ensure_product(product_id).await?;
            }
        }

        let txn = self.db.begin().await?;
        let (invoice, items) = insert_invoice(&txn, prepared).await?;
        txn.commit().await?;

        Ok(InvoiceDetail {
            view: InvoiceView::new(invoice, today),
            items,
        })
    }

    /// Finds an invoice with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice does not exist.
    pub async fn get_invoice(&self, id: InvoiceId) -> Result<InvoiceDetail, InvoiceRepoError> {
        let invoice = invoices::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(InvoiceRepoError::NotFound(id))?;
        let items = load_items(&self.db, id).await?;
        Ok(InvoiceDetail {
            view: InvoiceView::new(Invoice::from(invoice), Utc::now().date_naive()),
            items,
        })
    }

    /// Lists invoices, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_invoices(
        &self,
        filter: &InvoiceFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<InvoiceView>, InvoiceRepoError> {
        let today = Utc::now().date_naive();
        let mut query = invoices::Entity::find()
            .order_by_desc(invoices::Column::InvoiceDate)
            .order_by_desc(invoices::Column::InvoiceNumber);

        if let Some(status) = filter.status {
            query = query.filter(invoices::Column::Status.eq(DbInvoiceStatus::from(status)));
        }
        if let Some(invoice_type) = filter.invoice_type {
            query =
                query.filter(invoices::Column::InvoiceType.eq(DbInvoiceType::from(invoice_type)));
        }
        if let Some(overdue) = filter.overdue {
            let open = invoices::Column::Status.is_not_in([
                DbInvoiceStatus::Paid,
                DbInvoiceStatus::Cancelled,
            ]);
            let overdue_condition = Condition::all()
                .add(invoices::Column::DueDate.lt(today))
                .add(open);
            query = if overdue {
                query.filter(overdue_condition)
            } else {
                query.filter(overdue_condition.not())
            };
        }

        let page = page.normalized();
        let total = query.clone().count(&self.db).await?;
        let invoices = query
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        let data = invoices
            .into_iter()
            .map(|m| InvoiceView::new(Invoice::from(m), today))
            .collect();
        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Applies a partial update, recomputing totals if a charge changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice does not exist, the update is
    /// invalid, or a new party does not exist.
    pub async fn update_invoice(
        &self,
        id: InvoiceId,
        update: InvoiceUpdate,
    ) -> Result<InvoiceDetail, InvoiceRepoError> {
        let txn = self.db.begin().await?;
        let mut invoice = lock_invoice(&txn, id)
            .await?
            .ok_or(InvoiceRepoError::NotFound(id))?;

        let rates_changed = BillingService::apply_update(&mut invoice, &update)?;
        self.ensure_parties(invoice.customer_id, invoice.vendor_id)
            .await?;
        let items = load_items(&txn, id).await?;
        if rates_changed {
            invoice.recompute(&items)?;
        }
        save_invoice(&txn, &invoice).await?;
        txn.commit().await?;

        Ok(InvoiceDetail {
            view: InvoiceView::new(invoice, Utc::now().date_naive()),
            items,
        })
    }

    /// Deletes an invoice and its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice does not exist or has payments applied.
    pub async fn delete_invoice(&self, id: InvoiceId) -> Result<(), InvoiceRepoError> {
        let txn = self.db.begin().await?;
        let invoice = lock_invoice(&txn, id)
            .await?
            .ok_or(InvoiceRepoError::NotFound(id))?;
        BillingService::ensure_deletable(&invoice)?;
        invoices::Entity::delete_by_id(id.into_inner())
            .exec(&txn)
            .await?;
        txn.commit().await?;

        tracing::info!(invoice_number = %invoice.invoice_number, "invoice deleted");
        Ok(())
    }

    /// Adds a line and recomputes totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice does not exist or is cancelled, or
    /// the line is invalid.
    pub async fn add_item(
        &self,
        id: InvoiceId,
        input: NewInvoiceItem,
    ) -> Result<InvoiceDetail, InvoiceRepoError> {
        let item = BillingService::price_invoice_item(&input)?;
        if let Some(product_id) = item.product_id {
            self.ensure_product(product_id).await?;
        }

        let txn = self.db.begin().await?;
        let invoice = self.lock_open_invoice(&txn, id).await?;
        invoice_items::ActiveModel {
            invoice_id: Set(id.into_inner()),
            product_id: Set(item.product_id.map(ProductId::into_inner)),
            description: Set(item.description),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            line_total: Set(item.line_total),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        let detail = recompute_and_save(&txn, invoice).await?;
        txn.commit().await?;
        Ok(detail)
    }

    /// Replaces a line and recomputes totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice or line does not exist, the invoice
    /// is cancelled, or the line is invalid.
    pub async fn update_item(
        &self,
        id: InvoiceId,
        item_id: i64,
        input: NewInvoiceItem,
    ) -> Result<InvoiceDetail, InvoiceRepoError> {
        let item = BillingService::price_invoice_item(&input)?;
        if let Some(product_id) = item.product_id {
            self.ensure_product(product_id).await?;
        }

        let txn = self.db.begin().await?;
        let invoice = self.lock_open_invoice(&txn, id).await?;
        let existing = find_item(&txn, id, item_id).await?;
        let mut active: invoice_items::ActiveModel = existing.into();
        active.product_id = Set(item.product_id.map(ProductId::into_inner));
        active.description = Set(item.description);
        active.quantity = Set(item.quantity);
        active.unit_price = Set(item.unit_price);
        active.line_total = Set(item.line_total);
        active.update(&txn).await?;
        let detail = recompute_and_save(&txn, invoice).await?;
        txn.commit().await?;
        Ok(detail)
    }

    /// Deletes a line and recomputes totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice or line does not exist or the invoice
    /// is cancelled.
    pub async fn delete_item(
        &self,
        id: InvoiceId,
        item_id: i64,
    ) -> Result<InvoiceDetail, InvoiceRepoError> {
        let txn = self.db.begin().await?;
        let invoice = self.lock_open_invoice(&txn, id).await?;
        find_item(&txn, id, item_id).await?.delete(&txn).await?;
        let detail = recompute_and_save(&txn, invoice).await?;
        txn.commit().await?;
        Ok(detail)
    }

    /// Sets the paid amount, defaulting to the full total, and derives status.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice does not exist or is cancelled, or
    /// the amount is negative.
    pub async fn mark_as_paid(
        &self,
        id: InvoiceId,
        amount: Option<Decimal>,
    ) -> Result<InvoiceDetail, InvoiceRepoError> {
        let txn = self.db.begin().await?;
        let mut invoice = lock_invoice(&txn, id)
            .await?
            .ok_or(InvoiceRepoError::NotFound(id))?;
        invoice.mark_as_paid(amount)?;
        save_invoice(&txn, &invoice).await?;
        let items = load_items(&txn, id).await?;
        txn.commit().await?;

        tracing::info!(
            invoice_number = %invoice.invoice_number,
            paid_amount = %invoice.paid_amount,
            status = %invoice.status,
            "invoice marked as paid"
        );
        Ok(InvoiceDetail {
            view: InvoiceView::new(invoice, Utc::now().date_naive()),
            items,
        })
    }

    async fn lock_open_invoice<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: InvoiceId,
    ) -> Result<Invoice, InvoiceRepoError> {
        let invoice = lock_invoice(conn, id)
            .await?
            .ok_or(InvoiceRepoError::NotFound(id))?;
        if invoice.status == InvoiceStatus::Cancelled {
            return Err(BillingError::InvoiceCancelled.into());
        }
        Ok(invoice)
    }

    async fn ensure_parties(
        &self,
        customer_id: Option<CustomerId>,
        vendor_id: Option<VendorId>,
    ) -> Result<(), InvoiceRepoError> {
        if let Some(id) = customer_id
            && customers::Entity::find_by_id(id.into_inner())
                .one(&self.db)
                .await?
                .is_none()
        {
            return Err(InvoiceRepoError::CustomerNotFound(id));
        }
        if let Some(id) = vendor_id
            && vendors::Entity::find_by_id(id.into_inner())
                .one(&self.db)
                .await?
                .is_none()
        {
            return Err(InvoiceRepoError::VendorNotFound(id));
        }
        Ok(())
    }

    async fn ensure_product(&self, id: ProductId) -> Result<(), InvoiceRepoError> {
        products::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(InvoiceRepoError::ProductNotFound(id))
    }
}

async fn find_item<C: ConnectionTrait>(
    conn: &C,
    invoice_id: InvoiceId,
    item_id: i64,
) -> Result<invoice_items::Model, InvoiceRepoError> {
    invoice_items::Entity::find_by_id(item_id)
        .filter(invoice_items::Column::InvoiceId.eq(invoice_id.into_inner()))
        .one(conn)
        .await?
        .ok_or(InvoiceRepoError::ItemNotFound(item_id))
}

async fn recompute_and_save<C: ConnectionTrait>(
    conn: &C,
    mut invoice: Invoice,
) -> Result<InvoiceDetail, InvoiceRepoError> {
    let items = load_items(conn, invoice.id).await?;
    invoice.recompute(&items)?;
    save_invoice(conn, &invoice).await?;
    Ok(InvoiceDetail {
        view: InvoiceView::new(invoice, Utc::now().date_naive()),
        items,
    })
}
