//! `SeaORM` Entity for invoices.

use orbis_core::billing::Invoice;
use orbis_shared::types::{CustomerId, InvoiceId, OrderId, UserId, VendorId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{InvoiceStatus, InvoiceType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub invoice_number: String,
    pub invoice_type: InvoiceType,
    pub status: InvoiceStatus,
    pub invoice_date: Date,
    pub due_date: Date,
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub customer_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub notes: Option<String>,
    pub terms_and_conditions: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::invoice_items::Entity")]
    InvoiceItems,
}

impl Related<super::invoice_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Invoice {
    fn from(model: Model) -> Self {
        Self {
            id: InvoiceId(model.id),
            invoice_number: model.invoice_number,
            invoice_type: model.invoice_type.into(),
            status: model.status.into(),
            invoice_date: model.invoice_date,
            due_date: model.due_date,
            subtotal: model.subtotal,
            tax_rate: model.tax_rate,
            tax_amount: model.tax_amount,
            discount_amount: model.discount_amount,
            total_amount: model.total_amount,
            paid_amount: model.paid_amount,
            customer_id: model.customer_id.map(CustomerId),
            vendor_id: model.vendor_id.map(VendorId),
            order_id: model.order_id.map(OrderId),
            notes: model.notes,
            terms_and_conditions: model.terms_and_conditions,
            created_by: model.created_by.map(UserId),
        }
    }
}
