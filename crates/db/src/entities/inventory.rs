//! `SeaORM` Entity for per-warehouse stock rows.

use orbis_core::inventory::StockLevel;
use orbis_shared::types::ProductId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub product_id: Uuid,
    pub warehouse_id: i32,
    pub quantity_on_hand: i32,
    pub quantity_reserved: i32,
    pub quantity_available: i32,
    pub reorder_point: i32,
    pub reorder_quantity: i32,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::warehouses::Entity",
        from = "Column::WarehouseId",
        to = "super::warehouses::Column::Id"
    )]
    Warehouses,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
}

impl Related<super::warehouses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warehouses.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Builds the domain stock level; the warehouse name comes from the join.
    #[must_use]
    pub fn into_stock_level(self, warehouse_name: String) -> StockLevel {
        StockLevel {
            product_id: ProductId::from_uuid(self.product_id),
            warehouse_id: self.warehouse_id,
            warehouse_name,
            quantity_on_hand: self.quantity_on_hand,
            quantity_reserved: self.quantity_reserved,
            quantity_available: self.quantity_available,
            reorder_point: self.reorder_point,
            reorder_quantity: self.reorder_quantity,
        }
    }
}
