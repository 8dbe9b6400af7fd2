//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Each one executes decisions made by `orbis-core` inside a single database
//! transaction.

pub mod account;
pub mod inventory;
pub mod invoice;
pub mod journal;
pub mod master_data;
pub mod order;
pub mod payment;
pub mod report;
pub mod sequence;

pub use account::{AccountRepoError, AccountRepository, AccountWithBalance};
pub use inventory::{Availability, InventoryRepoError, InventoryRepository, MovementResult};
pub use invoice::{InvoiceDetail, InvoiceFilter, InvoiceRepoError, InvoiceRepository, InvoiceView};
pub use journal::{JournalEntryWithLines, JournalFilter, JournalRepoError, JournalRepository};
pub use master_data::{
    CreatePartyInput, CreateProductInput, CreateWarehouseInput, MasterDataError,
    MasterDataRepository,
};
pub use order::{
    AddItemResult, OrderFilter, OrderRepoError, OrderRepository, OrderWithItems,
    StatusChangeResult,
};
pub use payment::{PaymentFilter, PaymentRepoError, PaymentRepository};
pub use report::{ReportRepoError, ReportRepository};

use orbis_shared::types::{PageRequest, PageResponse};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QuerySelect, Select};

/// Runs `query` for one page and counts all matching rows.
pub(crate) async fn fetch_page<C, E>(
    conn: &C,
    query: Select<E>,
    page: &PageRequest,
) -> Result<PageResponse<E::Model>, DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Send + Sync,
{
    let page = page.normalized();
    let total = query.clone().count(conn).await?;
    let data = query
        .offset(page.offset())
        .limit(page.limit())
        .all(conn)
        .await?;
    Ok(PageResponse::new(data, page.page, page.per_page, total))
}
