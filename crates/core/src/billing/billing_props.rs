//! Property tests for invoice settlement.

use chrono::{NaiveDate, TimeZone, Utc};
use orbis_shared::types::{CustomerId, InvoiceId, PaymentId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn invoice(total: Decimal) -> Invoice {
    Invoice {
        id: InvoiceId::new(),
        invoice_number: "SI-20260101-0001".into(),
        invoice_type: InvoiceType::Sales,
        status: InvoiceStatus::Sent,
        invoice_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        due_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        subtotal: total,
        tax_rate: Decimal::ZERO,
        tax_amount: Decimal::ZERO,
        discount_amount: Decimal::ZERO,
        total_amount: total,
        paid_amount: Decimal::ZERO,
        customer_id: Some(CustomerId::new()),
        vendor_id: None,
        order_id: None,
        notes: None,
        terms_and_conditions: None,
        created_by: None,
    }
}

fn receipt(invoice: &Invoice, amount: Decimal) -> Payment {
    Payment {
        id: PaymentId::new(),
        payment_number: "PAY000001".into(),
        payment_type: PaymentType::Receipt,
        amount,
        payment_method: PaymentMethod::BankTransfer,
        payment_date: Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap(),
        reference_number: None,
        notes: None,
        created_by: None,
        receipt_number: Some("RCPT000001".into()),
        customer_id: invoice.customer_id,
        vendor_id: None,
        order_id: None,
        invoice_id: Some(invoice.id),
        applied_to_invoice: false,
    }
}

fn cents() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000).prop_map(|c| Decimal::new(c, 2))
}

// ============================================================================
// Examples
// ============================================================================

#[test]
fn test_partial_then_full_settlement() {
    let mut inv = invoice(dec!(1000));

    let mut first = receipt(&inv, dec!(300));
    BillingService::apply_payment(&mut inv, &mut first).unwrap();
    assert_eq!(inv.paid_amount, dec!(300));
    assert_eq!(inv.status, InvoiceStatus::Sent);

    let mut second = receipt(&inv, dec!(700));
    BillingService::apply_payment(&mut inv, &mut second).unwrap();
    assert_eq!(inv.paid_amount, dec!(1000));
    assert_eq!(inv.status, InvoiceStatus::Paid);
    assert_eq!(inv.balance_due(), Decimal::ZERO);
}

#[test]
fn test_payment_applies_once() {
    let mut inv = invoice(dec!(1000));
    let mut pay = receipt(&inv, dec!(300));
    BillingService::apply_payment(&mut inv, &mut pay).unwrap();
    assert!(pay.applied_to_invoice);

    assert_eq!(
        BillingService::apply_payment(&mut inv, &mut pay),
        Err(BillingError::AlreadyApplied)
    );
    assert_eq!(inv.paid_amount, dec!(300));
}

#[test]
fn test_receipt_for_other_invoice_rejected() {
    let mut inv = invoice(dec!(1000));
    let other = invoice(dec!(1000));
    let mut pay = receipt(&other, dec!(300));
    assert_eq!(
        BillingService::apply_payment(&mut inv, &mut pay),
        Err(BillingError::InvoiceMismatch)
    );
}

#[test]
fn test_vendor_payment_never_settles() {
    let mut inv = invoice(dec!(1000));
    let mut pay = receipt(&inv, dec!(300));
    pay.payment_type = PaymentType::Payment;
    assert_eq!(
        BillingService::apply_payment(&mut inv, &mut pay),
        Err(BillingError::NotAReceipt)
    );
    assert_eq!(inv.paid_amount, Decimal::ZERO);
}

#[test]
fn test_purchase_and_cancelled_invoices_rejected() {
    let mut purchase = invoice(dec!(1000));
    purchase.invoice_type = InvoiceType::Purchase;
    let mut pay = receipt(&purchase, dec!(10));
    assert_eq!(
        BillingService::apply_payment(&mut purchase, &mut pay),
        Err(BillingError::InvoiceTypeMismatch)
    );

    let mut cancelled = invoice(dec!(1000));
    cancelled.status = InvoiceStatus::Cancelled;
    let mut pay = receipt(&cancelled, dec!(10));
    assert_eq!(
        BillingService::apply_payment(&mut cancelled, &mut pay),
        Err(BillingError::InvoiceCancelled)
    );
    assert!(!pay.applied_to_invoice);
}

#[test]
fn test_overpayment_is_paid() {
    let mut inv = invoice(dec!(100));
    let mut pay = receipt(&inv, dec!(150));
    BillingService::apply_payment(&mut inv, &mut pay).unwrap();
    assert_eq!(inv.status, InvoiceStatus::Paid);
    assert_eq!(inv.balance_due(), dec!(-50));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_balance_due_tracks_applied_receipts(
        total in cents(),
        amounts in prop::collection::vec(cents(), 1..8),
    ) {
        let mut inv = invoice(total);
        let mut applied = Decimal::ZERO;
        for amount in amounts {
            let mut pay = receipt(&inv, amount);
            BillingService::apply_payment(&mut inv, &mut pay).unwrap();
            applied += amount;

            prop_assert_eq!(inv.paid_amount, applied);
            prop_assert_eq!(inv.balance_due(), total - applied);
            let expected = if applied >= total { InvoiceStatus::Paid } else { InvoiceStatus::Sent };
            prop_assert_eq!(inv.status, expected);
        }
    }

    #[test]
    fn prop_mark_as_paid_matches_settlement(total in cents(), paid in cents()) {
        let mut inv = invoice(total);
        inv.mark_as_paid(Some(paid)).unwrap();
        prop_assert_eq!(inv.paid_amount, paid);
        prop_assert_eq!(inv.status == InvoiceStatus::Paid, paid >= total);
    }

    #[test]
    fn prop_overdue_only_after_due_date(offset in -60i64..60) {
        let inv = invoice(dec!(100));
        let today = inv.due_date + chrono::Duration::days(offset);
        prop_assert_eq!(inv.is_overdue(today), offset > 0);
        prop_assert_eq!(inv.days_overdue(today), offset.max(0));
    }
}
