//! `SeaORM` Entity for sales and purchase orders.

use orbis_core::orders::{Order, OrderParty};
use orbis_shared::types::{CustomerId, OrderId, UserId, VendorId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{OrderKind, OrderStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_kind: OrderKind,
    #[sea_orm(unique)]
    pub order_number: String,
    pub customer_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub status: OrderStatus,
    pub order_date: DateTimeWithTimeZone,
    pub delivery_date: Option<DateTimeWithTimeZone>,
    pub tax_rate: Decimal,
    pub discount_percent: Decimal,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub warehouse_id: Option<i32>,
    pub payment_due_date: Option<Date>,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Order {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let party = match (model.order_kind, model.customer_id, model.vendor_id) {
            (OrderKind::Sales, Some(customer), _) => OrderParty::Customer(CustomerId(customer)),
            (OrderKind::Purchase, _, Some(vendor)) => OrderParty::Vendor(VendorId(vendor)),
            _ => {
                return Err(DbErr::Custom(format!(
                    "order {} has no party for its kind",
                    model.order_number
                )));
            }
        };

        Ok(Self {
            id: OrderId(model.id),
            kind: model.order_kind.into(),
            order_number: model.order_number,
            party,
            status: model.status.into(),
            order_date: model.order_date.to_utc(),
            delivery_date: model.delivery_date.map(|d| d.to_utc()),
            tax_rate: model.tax_rate,
            discount_percent: model.discount_percent,
            subtotal: model.subtotal,
            discount_amount: model.discount_amount,
            tax_amount: model.tax_amount,
            total_amount: model.total_amount,
            paid_amount: model.paid_amount,
            warehouse_id: model.warehouse_id,
            payment_due_date: model.payment_due_date,
            reference_number: model.reference_number,
            notes: model.notes,
            created_by: model.created_by.map(UserId),
        })
    }
}
