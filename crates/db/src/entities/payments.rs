//! `SeaORM` Entity for payments and receipts.

use orbis_core::billing::Payment;
use orbis_shared::types::{CustomerId, InvoiceId, OrderId, PaymentId, UserId, VendorId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PaymentMethod, PaymentType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub payment_number: String,
    pub payment_type: PaymentType,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_date: DateTimeWithTimeZone,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub receipt_number: Option<String>,
    pub customer_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub invoice_id: Option<Uuid>,
    pub applied_to_invoice: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Payment {
    fn from(model: Model) -> Self {
        Self {
            id: PaymentId(model.id),
            payment_number: model.payment_number,
            payment_type: model.payment_type.into(),
            amount: model.amount,
            payment_method: model.payment_method.into(),
            payment_date: model.payment_date.to_utc(),
            reference_number: model.reference_number,
            notes: model.notes,
            created_by: model.created_by.map(UserId),
            receipt_number: model.receipt_number,
            customer_id: model.customer_id.map(CustomerId),
            vendor_id: model.vendor_id.map(VendorId),
            order_id: model.order_id.map(OrderId),
            invoice_id: model.invoice_id.map(InvoiceId),
            applied_to_invoice: model.applied_to_invoice,
        }
    }
}
