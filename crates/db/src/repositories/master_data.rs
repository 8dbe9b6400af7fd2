//! Customers, vendors, products and warehouses.
//!
//! Codes are generated from the creation month through the sequence table:
//! customers `CYYMM####`, vendors `VYYMM####`, products `CCYYMM####`.

use chrono::Utc;
use orbis_core::numbering::SequenceScope;
use orbis_shared::AppError;
use orbis_shared::types::{CustomerId, PageRequest, PageResponse, ProductId, VendorId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{fetch_page, sequence};
use crate::entities::{customers, products, vendors, warehouses};
use crate::error;

/// Error types for master data operations.
#[derive(Debug, thiserror::Error)]
pub enum MasterDataError {
    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// Vendor not found.
    #[error("Vendor not found: {0}")]
    VendorNotFound(VendorId),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Warehouse not found.
    #[error("Warehouse not found: {0}")]
    WarehouseNotFound(i32),

    /// Name is blank.
    #[error("Name is required")]
    MissingName,

    /// Prices cannot be negative.
    #[error("Prices cannot be negative")]
    NegativePrice,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<MasterDataError> for AppError {
    fn from(err: MasterDataError) -> Self {
        match &err {
            MasterDataError::CustomerNotFound(_)
            | MasterDataError::VendorNotFound(_)
            | MasterDataError::ProductNotFound(_)
            | MasterDataError::WarehouseNotFound(_) => Self::NotFound(err.to_string()),
            MasterDataError::MissingName | MasterDataError::NegativePrice => {
                Self::Validation(err.to_string())
            }
            MasterDataError::Database(e) => error::database(e),
        }
    }
}

/// Input for creating a customer or vendor.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePartyInput {
    /// Display name.
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    /// Display name.
    pub name: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Category; its first two letters prefix the SKU.
    #[serde(default)]
    pub category: Option<String>,
    /// Selling price per unit.
    #[serde(default)]
    pub unit_price: Decimal,
    /// Purchase cost per unit.
    #[serde(default)]
    pub cost_price: Decimal,
}

/// Input for creating a warehouse.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWarehouseInput {
    /// Unique name; reservations walk warehouses in name order.
    pub name: String,
    /// Free-form location.
    #[serde(default)]
    pub location: Option<String>,
}

/// Repository for master data.
#[derive(Debug, Clone)]
pub struct MasterDataRepository {
    db: DatabaseConnection,
}

impl MasterDataRepository {
    /// Creates a new master data repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // Customers
    // ========================================================================

    /// Creates a customer with the next code of the current month.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the insert fails.
    pub async fn create_customer(
        &self,
        input: CreatePartyInput,
    ) -> Result<customers::Model, MasterDataError> {
        let name = required_name(&input.name)?;
        let now = Utc::now();

        let txn = self.db.begin().await?;
        let code = sequence::next_number(&txn, &SequenceScope::customer(now.date_naive())).await?;
        let customer = customers::ActiveModel {
            id: Set(Uuid::now_v7()),
            customer_code: Set(code),
            name: Set(name),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        tracing::info!(customer_code = %customer.customer_code, "customer created");
        Ok(customer)
    }

    /// Finds a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer does not exist.
    pub async fn get_customer(&self, id: CustomerId) -> Result<customers::Model, MasterDataError> {
        customers::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(MasterDataError::CustomerNotFound(id))
    }

    /// Lists customers by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_customers(
        &self,
        page: &PageRequest,
    ) -> Result<PageResponse<customers::Model>, MasterDataError> {
        let query = customers::Entity::find().order_by_asc(customers::Column::CustomerCode);
        Ok(fetch_page(&self.db, query, page).await?)
    }

    // ========================================================================
    // Vendors
    // ========================================================================

    /// Creates a vendor with the next code of the current month.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the insert fails.
    pub async fn create_vendor(
        &self,
        input: CreatePartyInput,
    ) -> Result<vendors::Model, MasterDataError> {
        let name = required_name(&input.name)?;
        let now = Utc::now();

        let txn = self.db.begin().await?;
        let code = sequence::next_number(&txn, &SequenceScope::vendor(now.date_naive())).await?;
        let vendor = vendors::ActiveModel {
            id: Set(Uuid::now_v7()),
            vendor_code: Set(code),
            name: Set(name),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        tracing::info!(vendor_code = %vendor.vendor_code, "vendor created");
        Ok(vendor)
    }

    /// Finds a vendor by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the vendor does not exist.
    pub async fn get_vendor(&self, id: VendorId) -> Result<vendors::Model, MasterDataError> {
        vendors::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(MasterDataError::VendorNotFound(id))
    }

    /// Lists vendors by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_vendors(
        &self,
        page: &PageRequest,
    ) -> Result<PageResponse<vendors::Model>, MasterDataError> {
        let query = vendors::Entity::find().order_by_asc(vendors::Column::VendorCode);
        Ok(fetch_page(&self.db, query, page).await?)
    }

    // ========================================================================
    // Products
    // ========================================================================

    /// Creates a product with the next SKU for its category and month.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, a price is negative, or the
    /// insert fails.
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<products::Model, MasterDataError> {
        let name = required_name(&input.name)?;
        if input.unit_price < Decimal::ZERO || input.cost_price < Decimal::ZERO {
            return Err(MasterDataError::NegativePrice);
        }
        let now = Utc::now();
        let scope = SequenceScope::product(input.category.as_deref(), now.date_naive());

        let txn = self.db.begin().await?;
        let sku = sequence::next_number(&txn, &scope).await?;
        let product = products::ActiveModel {
            id: Set(Uuid::now_v7()),
            sku: Set(sku),
            name: Set(name),
            description: Set(input.description),
            category: Set(input.category),
            unit_price: Set(input.unit_price),
            cost_price: Set(input.cost_price),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        tracing::info!(sku = %product.sku, "product created");
        Ok(product)
    }

    /// Finds a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist.
    pub async fn get_product(&self, id: ProductId) -> Result<products::Model, MasterDataError> {
        products::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(MasterDataError::ProductNotFound(id))
    }

    /// Lists products by SKU.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_products(
        &self,
        page: &PageRequest,
    ) -> Result<PageResponse<products::Model>, MasterDataError> {
        let query = products::Entity::find().order_by_asc(products::Column::Sku);
        Ok(fetch_page(&self.db, query, page).await?)
    }

    // ========================================================================
    // Warehouses
    // ========================================================================

    /// Creates a warehouse.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or already taken.
    pub async fn create_warehouse(
        &self,
        input: CreateWarehouseInput,
    ) -> Result<warehouses::Model, MasterDataError> {
        let name = required_name(&input.name)?;
        let warehouse = warehouses::ActiveModel {
            name: Set(name),
            location: Set(input.location),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(warehouse)
    }

    /// Finds a warehouse by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the warehouse does not exist.
    pub async fn get_warehouse(&self, id: i32) -> Result<warehouses::Model, MasterDataError> {
        warehouses::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(MasterDataError::WarehouseNotFound(id))
    }

    /// Lists active warehouses by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_warehouses(&self) -> Result<Vec<warehouses::Model>, MasterDataError> {
        Ok(warehouses::Entity::find()
            .filter(warehouses::Column::IsActive.eq(true))
            .order_by_asc(warehouses::Column::Name)
            .all(&self.db)
            .await?)
    }
}

fn required_name(name: &str) -> Result<String, MasterDataError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MasterDataError::MissingName);
    }
    Ok(name.to_string())
}
