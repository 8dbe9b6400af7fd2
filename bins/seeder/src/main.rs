//! Deployment-time bootstrap for Orbis.
//!
//! Always installs the starter chart of accounts when the chart is empty.
//! With `--samples` it also creates reference master data and posts six
//! demonstration journal entries dated relative to today.
//!
//! Usage: `seeder [--samples]`

use std::collections::HashMap;

use anyhow::{Context, bail};
use chrono::{Days, NaiveDate, Utc};
use orbis_core::ledger::{JournalEntryType, JournalLineInput, NewJournalEntry};
use orbis_db::repositories::{
    CreatePartyInput, CreateProductInput, CreateWarehouseInput, JournalFilter,
};
use orbis_db::{AccountRepository, JournalRepository, MasterDataRepository};
use orbis_shared::AppConfig;
use orbis_shared::types::PageRequest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use tracing::info;

/// One demonstration entry: days before today, description, debit and
/// credit account codes, amount.
struct SampleEntry {
    days_ago: u64,
    description: &'static str,
    entry_type: JournalEntryType,
    debit: &'static str,
    credit: &'static str,
    amount: Decimal,
}

const SAMPLE_ENTRIES: [SampleEntry; 6] = [
    SampleEntry {
        days_ago: 30,
        description: "Owner capital contribution",
        entry_type: JournalEntryType::Manual,
        debit: "100",
        credit: "300",
        amount: dec!(50000.00),
    },
    SampleEntry {
        days_ago: 25,
        description: "Purchase of office equipment",
        entry_type: JournalEntryType::Purchase,
        debit: "150",
        credit: "100",
        amount: dec!(10000.00),
    },
    SampleEntry {
        days_ago: 20,
        description: "Inventory purchased on credit",
        entry_type: JournalEntryType::Purchase,
        debit: "120",
        credit: "200",
        amount: dec!(15000.00),
    },
    SampleEntry {
        days_ago: 15,
        description: "Credit sale to customer",
        entry_type: JournalEntryType::Sales,
        debit: "110",
        credit: "400",
        amount: dec!(8000.00),
    },
    SampleEntry {
        days_ago: 15,
        description: "Cost of goods sold",
        entry_type: JournalEntryType::Sales,
        debit: "500",
        credit: "120",
        amount: dec!(4800.00),
    },
    SampleEntry {
        days_ago: 10,
        description: "Payment to supplier",
        entry_type: JournalEntryType::Payment,
        debit: "200",
        credit: "100",
        amount: dec!(5000.00),
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orbis=info".into()),
        )
        .init();

    let with_samples = std::env::args().skip(1).any(|arg| arg == "--samples");

    let config = AppConfig::load().context("failed to load configuration")?;
    let db = orbis_db::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    let created = AccountRepository::new(db.clone())
        .bootstrap_default_chart()
        .await?;
    info!(accounts = created, "chart of accounts ready");

    if with_samples {
        seed_reference_data(&db).await?;
        seed_sample_entries(&db, Utc::now().date_naive()).await?;
    }

    info!("seeding complete");
    Ok(())
}

/// Creates a warehouse, customer, vendor and product when none exist.
async fn seed_reference_data(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = MasterDataRepository::new(db.clone());
    let page = PageRequest::default();

    if repo.list_warehouses().await?.is_empty() {
        let warehouse = repo
            .create_warehouse(CreateWarehouseInput {
                name: "Main Warehouse".to_string(),
                location: Some("Head office".to_string()),
            })
            .await?;
        info!(warehouse = %warehouse.name, "created warehouse");
    }

    if repo.list_customers(&page).await?.meta.total == 0 {
        let customer = repo
            .create_customer(CreatePartyInput {
                name: "Acme Retail".to_string(),
                email: Some("orders@acme-retail.test".to_string()),
                phone: None,
                address: None,
            })
            .await?;
        info!(customer_code = %customer.customer_code, "created customer");
    }

    if repo.list_vendors(&page).await?.meta.total == 0 {
        let vendor = repo
            .create_vendor(CreatePartyInput {
                name: "Globex Supply".to_string(),
                email: Some("sales@globex-supply.test".to_string()),
                phone: None,
                address: None,
            })
            .await?;
        info!(vendor_code = %vendor.vendor_code, "created vendor");
    }

    if repo.list_products(&page).await?.meta.total == 0 {
        let product = repo
            .create_product(CreateProductInput {
                name: "Office Chair".to_string(),
                description: None,
                category: Some("Furniture".to_string()),
                unit_price: dec!(149.00),
                cost_price: dec!(90.00),
            })
            .await?;
        info!(sku = %product.sku, "created product");
    }

    Ok(())
}

/// Posts the demonstration entries unless the journal already has entries.
async fn seed_sample_entries(db: &DatabaseConnection, today: NaiveDate) -> anyhow::Result<()> {
    let journal = JournalRepository::new(db.clone());
    let existing = journal
        .list_entries(&JournalFilter::default(), &PageRequest::default())
        .await?;
    if existing.meta.total > 0 {
        info!(entries = existing.meta.total, "journal not empty, skipping samples");
        return Ok(());
    }

    let accounts: HashMap<String, i32> = AccountRepository::new(db.clone())
        .list_accounts(today)
        .await?
        .into_iter()
        .map(|a| (a.account.code, a.account.id))
        .collect();
    let account_id = |code: &str| -> anyhow::Result<i32> {
        match accounts.get(code) {
            Some(id) => Ok(*id),
            None => bail!("account {code} is missing from the chart"),
        }
    };

    for sample in &SAMPLE_ENTRIES {
        let date = today
            .checked_sub_days(Days::new(sample.days_ago))
            .context("sample date out of range")?;
        let entry = journal
            .create_entry(NewJournalEntry {
                date,
                description: sample.description.to_string(),
                entry_type: sample.entry_type,
                reference: None,
                lines: vec![
                    JournalLineInput::debit(account_id(sample.debit)?, sample.amount)
                        .with_description(sample.description),
                    JournalLineInput::credit(account_id(sample.credit)?, sample.amount)
                        .with_description(sample.description),
                ],
                created_by: None,
            })
            .await?;
        info!(entry_number = %entry.entry.entry_number, "posted sample entry");
    }

    Ok(())
}
