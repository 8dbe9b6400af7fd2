//! Inventory repository: stock rows, movements and reservations.
//!
//! Stock rows of a product are always locked in warehouse-name order, which
//! is also the order reservations consume them in.

use chrono::Utc;
use orbis_core::inventory::{
    InventoryError, InventoryService, NewInventoryTransaction, ReservationPlan, StockLevel,
};
use orbis_shared::AppError;
use orbis_shared::types::ProductId;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
    TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{
    inventory, inventory_transactions, products,
    sea_orm_active_enums::InventoryTransactionType, warehouses,
};
use crate::error;

/// Error types for inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum InventoryRepoError {
    /// Movement rejected by the domain rules.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Warehouse not found.
    #[error("Warehouse not found: {0}")]
    WarehouseNotFound(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<InventoryRepoError> for AppError {
    fn from(err: InventoryRepoError) -> Self {
        match &err {
            InventoryRepoError::Inventory(e) => error::inventory(e),
            InventoryRepoError::ProductNotFound(_) | InventoryRepoError::WarehouseNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            InventoryRepoError::Database(e) => error::database(e),
        }
    }
}

/// A recorded movement and the stock row after it.
#[derive(Debug, Clone, Serialize)]
pub struct MovementResult {
    /// The stored movement.
    pub transaction: inventory_transactions::Model,
    /// Stock row after the movement.
    pub stock: StockLevel,
}

/// Answer to an availability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Availability {
    /// Quantity asked about.
    pub requested: i32,
    /// Quantity available in the warehouse, or across all warehouses.
    pub available_quantity: i32,
    /// True if `available_quantity >= requested`.
    pub is_available: bool,
}

/// Inventory row joined with its warehouse name.
#[derive(Debug, FromQueryResult)]
struct StockRow {
    product_id: Uuid,
    warehouse_id: i32,
    quantity_on_hand: i32,
    quantity_reserved: i32,
    quantity_available: i32,
    reorder_point: i32,
    reorder_quantity: i32,
    warehouse_name: String,
}

impl From<StockRow> for StockLevel {
    fn from(row: StockRow) -> Self {
        Self {
            product_id: ProductId(row.product_id),
            warehouse_id: row.warehouse_id,
            warehouse_name: row.warehouse_name,
            quantity_on_hand: row.quantity_on_hand,
            quantity_reserved: row.quantity_reserved,
            quantity_available: row.quantity_available,
            reorder_point: row.reorder_point,
            reorder_quantity: row.reorder_quantity,
        }
    }
}

fn stock_query() -> Select<inventory::Entity> {
    inventory::Entity::find()
        .join(JoinType::InnerJoin, inventory::Relation::Warehouses.def())
        .column_as(warehouses::Column::Name, "warehouse_name")
        .filter(warehouses::Column::IsActive.eq(true))
        .order_by_asc(warehouses::Column::Name)
}

/// Loads a product's stock rows in warehouse-name order under `FOR UPDATE`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub(crate) async fn lock_stock_levels<C: ConnectionTrait>(
    conn: &C,
    product_id: ProductId,
) -> Result<Vec<StockLevel>, DbErr> {
    let rows = stock_query()
        .filter(inventory::Column::ProductId.eq(product_id.into_inner()))
        .lock_exclusive()
        .into_model::<StockRow>()
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(StockLevel::from).collect())
}

/// Writes a reservation plan to stock rows locked by [`lock_stock_levels`].
///
/// # Errors
///
/// Returns an error if an update fails.
pub(crate) async fn apply_reservation<C: ConnectionTrait>(
    conn: &C,
    product_id: ProductId,
    plan: &ReservationPlan,
) -> Result<(), DbErr> {
    let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
    for allocation in &plan.allocations {
        inventory::Entity::update_many()
            .col_expr(
                inventory::Column::QuantityReserved,
                Expr::col(inventory::Column::QuantityReserved).add(allocation.quantity),
            )
            .col_expr(
                inventory::Column::QuantityAvailable,
                Expr::col(inventory::Column::QuantityAvailable).sub(allocation.quantity),
            )
            .col_expr(inventory::Column::UpdatedAt, Expr::value(now))
            .filter(inventory::Column::ProductId.eq(product_id.into_inner()))
            .filter(inventory::Column::WarehouseId.eq(allocation.warehouse_id))
            .exec(conn)
            .await?;
    }
    Ok(())
}

/// Inventory repository.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    db: DatabaseConnection,
}

impl InventoryRepository {
    /// Creates a new inventory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a stock movement and updates the affected stock row.
    ///
    /// The row is created on first use and locked for the rest of the
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the product or warehouse does not exist, the
    /// movement is invalid, or it would leave negative stock on hand.
    pub async fn record_transaction(
        &self,
        input: NewInventoryTransaction,
    ) -> Result<MovementResult, InventoryRepoError> {
        InventoryService::validate_transaction(&input)?;
        self.ensure_product(input.product_id).await?;
        let warehouse = self.find_warehouse(input.warehouse_id).await?;

        let txn = self.db.begin().await?;
        let row = lock_or_create_row(&txn, input.product_id, input.warehouse_id).await?;
        let mut stock = row.clone().into_stock_level(warehouse.name);
        InventoryService::apply_transaction(&mut stock, &input)?;

        let now = Utc::now();
        let mut active: inventory::ActiveModel = row.into();
        active.quantity_on_hand = Set(stock.quantity_on_hand);
        active.quantity_available = Set(stock.quantity_available);
        active.updated_at = Set(now.into());
        active.update(&txn).await?;

        let transaction = inventory_transactions::ActiveModel {
            id: Set(Uuid::now_v7()),
            product_id: Set(input.product_id.into_inner()),
            warehouse_id: Set(input.warehouse_id),
            transaction_type: Set(InventoryTransactionType::from(input.transaction_type)),
            quantity: Set(input.quantity),
            unit_cost: Set(input.unit_cost),
            total_cost: Set(input.total_cost()),
            reference_type: Set(input.reference_type),
            reference_id: Set(input.reference_id),
            notes: Set(input.notes),
            created_by: Set(input.created_by.map(|u| u.into_inner())),
            created_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        tracing::info!(
            product_id = %stock.product_id,
            warehouse_id = stock.warehouse_id,
            transaction_type = %input.transaction_type.as_str(),
            on_hand = stock.quantity_on_hand,
            "inventory movement recorded"
        );
        if stock.is_low_stock() {
            tracing::warn!(
                product_id = %stock.product_id,
                warehouse_id = stock.warehouse_id,
                available = stock.quantity_available,
                reorder_point = stock.reorder_point,
                "stock at or below reorder point"
            );
        }

        Ok(MovementResult { transaction, stock })
    }

    /// Stock rows of a product in warehouse-name order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn stock_levels(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<StockLevel>, InventoryRepoError> {
        let rows = stock_query()
            .filter(inventory::Column::ProductId.eq(product_id.into_inner()))
            .into_model::<StockRow>()
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(StockLevel::from).collect())
    }

    /// Checks whether `quantity` units are available in one warehouse, or
    /// across all warehouses when none is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn check_availability(
        &self,
        product_id: ProductId,
        warehouse_id: Option<i32>,
        quantity: i32,
    ) -> Result<Availability, InventoryRepoError> {
        let stocks = self.stock_levels(product_id).await?;
        let (available_quantity, is_available) = match warehouse_id {
            Some(id) => {
                let stock = stocks.iter().find(|s| s.warehouse_id == id);
                (
                    stock.map_or(0, |s| s.quantity_available),
                    InventoryService::check_stock_availability(stock, quantity),
                )
            }
            None => {
                let total: i32 = stocks.iter().map(|s| s.quantity_available.max(0)).sum();
                (total, total >= quantity)
            }
        };
        Ok(Availability {
            requested: quantity,
            available_quantity,
            is_available,
        })
    }

    /// Stock rows whose available quantity is at or below the reorder point.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn low_stock(&self) -> Result<Vec<StockLevel>, InventoryRepoError> {
        let rows = stock_query()
            .filter(
                Expr::col((inventory::Entity, inventory::Column::QuantityAvailable))
                    .lte(Expr::col((inventory::Entity, inventory::Column::ReorderPoint))),
            )
            .into_model::<StockRow>()
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(StockLevel::from).collect())
    }

    /// Sets the reorder point and quantity of a stock row, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is negative or the product or warehouse
    /// does not exist.
    pub async fn set_reorder_settings(
        &self,
        product_id: ProductId,
        warehouse_id: i32,
        reorder_point: i32,
        reorder_quantity: i32,
    ) -> Result<StockLevel, InventoryRepoError> {
        InventoryService::validate_reorder_settings(reorder_point, reorder_quantity)?;
        self.ensure_product(product_id).await?;
        let warehouse = self.find_warehouse(warehouse_id).await?;

        let txn = self.db.begin().await?;
        let row = lock_or_create_row(&txn, product_id, warehouse_id).await?;
        let mut active: inventory::ActiveModel = row.into();
        active.reorder_point = Set(reorder_point);
        active.reorder_quantity = Set(reorder_quantity);
        active.updated_at = Set(Utc::now().into());
        let row = active.update(&txn).await?;
        txn.commit().await?;

        Ok(row.into_stock_level(warehouse.name))
    }

    async fn ensure_product(&self, product_id: ProductId) -> Result<(), InventoryRepoError> {
        products::Entity::find_by_id(product_id.into_inner())
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(InventoryRepoError::ProductNotFound(product_id))
    }

    async fn find_warehouse(&self, id: i32) -> Result<warehouses::Model, InventoryRepoError> {
        warehouses::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(InventoryRepoError::WarehouseNotFound(id))
    }
}

/// Inserts an empty stock row if none exists, then locks it.
async fn lock_or_create_row<C: ConnectionTrait>(
    conn: &C,
    product_id: ProductId,
    warehouse_id: i32,
) -> Result<inventory::Model, DbErr> {
    let empty = inventory::ActiveModel {
        product_id: Set(product_id.into_inner()),
        warehouse_id: Set(warehouse_id),
        quantity_on_hand: Set(0),
        quantity_reserved: Set(0),
        quantity_available: Set(0),
        reorder_point: Set(0),
        reorder_quantity: Set(0),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    };
    inventory::Entity::insert(empty)
        .on_conflict(
            OnConflict::columns([inventory::Column::ProductId, inventory::Column::WarehouseId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    inventory::Entity::find()
        .filter(inventory::Column::ProductId.eq(product_id.into_inner()))
        .filter(inventory::Column::WarehouseId.eq(warehouse_id))
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("inventory {product_id}/{warehouse_id}")))
}
