//! Database enum types and their domain counterparts.

use orbis_core::billing::{
    InvoiceStatus as DomainInvoiceStatus, InvoiceType as DomainInvoiceType,
    PaymentMethod as DomainPaymentMethod, PaymentType as DomainPaymentType,
};
use orbis_core::inventory::InventoryTransactionType as DomainInventoryTransactionType;
use orbis_core::ledger::{AccountType as DomainAccountType, JournalEntryType as DomainJournalEntryType};
use orbis_core::orders::{OrderKind as DomainOrderKind, OrderStatus as DomainOrderStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Maps a database enum onto the domain enum with the same variant names.
macro_rules! domain_enum {
    ($db:ident <=> $domain:ident { $($variant:ident),+ $(,)? }) => {
        impl From<$db> for $domain {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$domain> for $db {
            fn from(value: $domain) -> Self {
                match value {
                    $($domain::$variant => Self::$variant,)+
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "expense")]
    Expense,
}

domain_enum!(AccountType <=> DomainAccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_entry_type")]
pub enum JournalEntryType {
    #[sea_orm(string_value = "manual")]
    Manual,
    #[sea_orm(string_value = "sales")]
    Sales,
    #[sea_orm(string_value = "purchase")]
    Purchase,
    #[sea_orm(string_value = "payment")]
    Payment,
    #[sea_orm(string_value = "receipt")]
    Receipt,
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

domain_enum!(JournalEntryType <=> DomainJournalEntryType {
    Manual,
    Sales,
    Purchase,
    Payment,
    Receipt,
    Adjustment,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_kind")]
pub enum OrderKind {
    #[sea_orm(string_value = "sales")]
    Sales,
    #[sea_orm(string_value = "purchase")]
    Purchase,
}

domain_enum!(OrderKind <=> DomainOrderKind { Sales, Purchase });

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_status")]
pub enum OrderStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "shipped")]
    Shipped,
    #[sea_orm(string_value = "received")]
    Received,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

domain_enum!(OrderStatus <=> DomainOrderStatus {
    Draft,
    Pending,
    Confirmed,
    Shipped,
    Received,
    Delivered,
    Completed,
    Cancelled,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_type")]
pub enum InvoiceType {
    #[sea_orm(string_value = "sales")]
    Sales,
    #[sea_orm(string_value = "purchase")]
    Purchase,
}

domain_enum!(InvoiceType <=> DomainInvoiceType { Sales, Purchase });

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "overdue")]
    Overdue,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

domain_enum!(InvoiceStatus <=> DomainInvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_type")]
pub enum PaymentType {
    #[sea_orm(string_value = "receipt")]
    Receipt,
    #[sea_orm(string_value = "payment")]
    Payment,
}

domain_enum!(PaymentType <=> DomainPaymentType { Receipt, Payment });

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "check")]
    Check,
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    #[sea_orm(string_value = "credit_card")]
    CreditCard,
    #[sea_orm(string_value = "other")]
    Other,
}

domain_enum!(PaymentMethod <=> DomainPaymentMethod {
    Cash,
    Check,
    BankTransfer,
    CreditCard,
    Other,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "inventory_transaction_type"
)]
pub enum InventoryTransactionType {
    #[sea_orm(string_value = "in")]
    In,
    #[sea_orm(string_value = "out")]
    Out,
    #[sea_orm(string_value = "transfer")]
    Transfer,
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
    #[sea_orm(string_value = "return")]
    Return,
}

domain_enum!(InventoryTransactionType <=> DomainInventoryTransactionType {
    In,
    Out,
    Transfer,
    Adjustment,
    Return,
});

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_account_types_round_trip() {
        for db in AccountType::iter() {
            let domain = DomainAccountType::from(db);
            assert_eq!(AccountType::from(domain), db);
            assert_eq!(db.to_value(), domain.as_str());
        }
    }

    #[test]
    fn test_order_statuses_match_domain_names() {
        for db in OrderStatus::iter() {
            assert_eq!(db.to_value(), DomainOrderStatus::from(db).as_str());
        }
    }

    #[test]
    fn test_payment_methods_match_domain_names() {
        for db in PaymentMethod::iter() {
            assert_eq!(db.to_value(), DomainPaymentMethod::from(db).as_str());
        }
    }

    #[test]
    fn test_inventory_types_match_domain_names() {
        for db in InventoryTransactionType::iter() {
            assert_eq!(db.to_value(), DomainInventoryTransactionType::from(db).as_str());
        }
    }
}
