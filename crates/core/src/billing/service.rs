//! Billing service: invoice preparation, editing and payment application.

use chrono::{Days, NaiveDate};
use orbis_shared::types::{ProductId, validate_percent};
use rust_decimal::Decimal;

use super::error::BillingError;
use super::invoice::{
    CreateInvoice, Invoice, InvoiceStatus, InvoiceTotals, InvoiceType, InvoiceUpdate, NewInvoice,
    NewInvoiceItem, PricedInvoiceItem, invoice_line_total,
};
use super::payment::{NewPayment, Payment, PaymentType};
use crate::orders::{Order, OrderItem, OrderKind};

/// Billing service.
pub struct BillingService;

impl BillingService {
    /// Validates a direct invoice request and fills in defaults.
    ///
    /// The invoice date defaults to `today`, the due date to the invoice
    /// date plus `due_days`, the status to draft. The party that does not
    /// belong to the invoice type is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the required party is missing, a rate or amount
    /// is out of range, the due date precedes the invoice date, or an item
    /// is invalid.
    pub fn prepare_invoice(
        input: CreateInvoice,
        today: NaiveDate,
        due_days: u32,
    ) -> Result<NewInvoice, BillingError> {
        let (customer_id, vendor_id) = match input.invoice_type {
            InvoiceType::Sales => (
                Some(input.customer_id.ok_or(BillingError::MissingInvoiceParty(input.invoice_type))?),
                None,
            ),
            InvoiceType::Purchase => (
                None,
                Some(input.vendor_id.ok_or(BillingError::MissingInvoiceParty(input.invoice_type))?),
            ),
        };
        validate_charges(input.tax_rate, input.discount_amount)?;

        let invoice_date = input.invoice_date.unwrap_or(today);
        let due_date = match input.due_date {
            Some(due) => due,
            None => due_from(invoice_date, due_days),
        };
        if due_date < invoice_date {
            return Err(BillingError::DueBeforeIssue);
        }

        let items = input
            .items
            .iter()
            .map(Self::price_invoice_item)
            .collect::<Result<Vec<_>, _>>()?;
        let totals = InvoiceTotals::recompute(
            items.iter().map(|i| i.line_total),
            input.tax_rate,
            input.discount_amount,
        )?;

        Ok(NewInvoice {
            invoice_type: input.invoice_type,
            status: input.status.unwrap_or_default(),
            invoice_date,
            due_date,
            tax_rate: input.tax_rate,
            discount_amount: input.discount_amount,
            totals,
            customer_id,
            vendor_id,
            order_id: None,
            notes: input.notes,
            terms_and_conditions: input.terms_and_conditions,
            items,
            created_by: input.created_by,
        })
    }

    /// Builds the invoice issued for an order.
    ///
    /// The invoice is already sent and carries the order's totals and rates.
    /// Each order item becomes an invoice line at its net line total, so the
    /// lines always sum to the order subtotal and a later rate edit
    /// recomputes from the amount that was billed. `product_name` supplies
    /// line descriptions.
    #[must_use]
    pub fn invoice_from_order(
        order: &Order,
        items: &[OrderItem],
        product_name: impl Fn(ProductId) -> Option<String>,
        issue_date: NaiveDate,
        due_days: u32,
    ) -> NewInvoice {
        let origin = match order.kind {
            OrderKind::Sales => "Sales Order",
            OrderKind::Purchase => "Purchase Order",
        };
        NewInvoice {
            invoice_type: InvoiceType::from(order.kind),
            status: InvoiceStatus::Sent,
            invoice_date: issue_date,
            due_date: due_from(issue_date, due_days),
            tax_rate: order.tax_rate,
            discount_amount: order.discount_amount,
            totals: InvoiceTotals {
                subtotal: order.subtotal,
                tax_amount: order.tax_amount,
                total_amount: order.total_amount,
            },
            customer_id: order.party.customer_id(),
            vendor_id: order.party.vendor_id(),
            order_id: Some(order.id),
            notes: Some(format!("Auto-generated from {origin} {}", order.order_number)),
            terms_and_conditions: None,
            items: items
                .iter()
                .map(|item| invoice_line_from(item, product_name(item.product_id)))
                .collect(),
            created_by: order.created_by,
        }
    }

    /// Validates an invoice line and computes its total.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty description, a quantity of zero or
    /// less, a negative price, or a line total out of range.
    pub fn price_invoice_item(input: &NewInvoiceItem) -> Result<PricedInvoiceItem, BillingError> {
        let description = input.description.trim();
        if description.is_empty() {
            return Err(BillingError::MissingDescription);
        }
        if input.quantity <= Decimal::ZERO {
            return Err(BillingError::InvalidQuantity(input.quantity));
        }
        if input.unit_price < Decimal::ZERO {
            return Err(BillingError::NegativeUnitPrice);
        }
        Ok(PricedInvoiceItem {
            product_id: input.product_id,
            description: description.to_string(),
            quantity: input.quantity,
            unit_price: input.unit_price,
            line_total: invoice_line_total(input.quantity, input.unit_price)?,
        })
    }

    /// Applies a partial update.
    ///
    /// Returns true if the tax rate or discount changed, in which case the
    /// caller must recompute totals from the current items.
    ///
    /// # Errors
    ///
    /// Returns an error if a charge is out of range or the resulting due
    /// date precedes the invoice date.
    pub fn apply_update(invoice: &mut Invoice, update: &InvoiceUpdate) -> Result<bool, BillingError> {
        let tax_rate = update.tax_rate.unwrap_or(invoice.tax_rate);
        let discount_amount = update.discount_amount.unwrap_or(invoice.discount_amount);
        validate_charges(tax_rate, discount_amount)?;

        let invoice_date = update.invoice_date.unwrap_or(invoice.invoice_date);
        let due_date = update.due_date.unwrap_or(invoice.due_date);
        if due_date < invoice_date {
            return Err(BillingError::DueBeforeIssue);
        }

        let rates_changed =
            tax_rate != invoice.tax_rate || discount_amount != invoice.discount_amount;
        invoice.tax_rate = tax_rate;
        invoice.discount_amount = discount_amount;
        invoice.invoice_date = invoice_date;
        invoice.due_date = due_date;
        if let Some(status) = update.status {
            invoice.status = status;
        }
        match invoice.invoice_type {
            InvoiceType::Sales => {
                if let Some(customer_id) = update.customer_id {
                    invoice.customer_id = Some(customer_id);
                }
            }
            InvoiceType::Purchase => {
                if let Some(vendor_id) = update.vendor_id {
                    invoice.vendor_id = Some(vendor_id);
                }
            }
        }
        if let Some(notes) = &update.notes {
            invoice.notes = Some(notes.clone());
        }
        if let Some(terms) = &update.terms_and_conditions {
            invoice.terms_and_conditions = Some(terms.clone());
        }
        Ok(rates_changed)
    }

    /// Validates a payment before it is numbered and stored.
    ///
    /// A receipt names a customer and no vendor; a payment names a vendor
    /// and no customer. Either may reference an invoice; only receipts
    /// settle one.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive amount or a wrong party.
    pub fn validate_payment(input: &NewPayment) -> Result<(), BillingError> {
        if input.amount <= Decimal::ZERO {
            return Err(BillingError::InvalidPaymentAmount(input.amount));
        }
        let party_ok = match input.payment_type {
            PaymentType::Receipt => input.customer_id.is_some() && input.vendor_id.is_none(),
            PaymentType::Payment => input.vendor_id.is_some() && input.customer_id.is_none(),
        };
        if !party_ok {
            return Err(BillingError::InvalidPaymentParty(input.payment_type));
        }
        Ok(())
    }

    /// Checks the order and invoice a payment references.
    ///
    /// A receipt may reference sales records of its customer only, a vendor
    /// payment purchase records of its vendor only.
    ///
    /// # Errors
    ///
    /// Returns an error if the order kind or invoice type does not match the
    /// payment type, a linked record names a different party, or the invoice
    /// belongs to another order than the one referenced.
    pub fn validate_payment_links(
        input: &NewPayment,
        order: Option<&Order>,
        invoice: Option<&Invoice>,
    ) -> Result<(), BillingError> {
        let mismatch = BillingError::LinkedPartyMismatch(input.payment_type);
        if let Some(order) = order {
            if order.kind != input.payment_type.order_kind() {
                return Err(BillingError::OrderKindMismatch);
            }
            let same_party = match input.payment_type {
                PaymentType::Receipt => order.party.customer_id() == input.customer_id,
                PaymentType::Payment => order.party.vendor_id() == input.vendor_id,
            };
            if !same_party {
                return Err(mismatch);
            }
        }
        if let Some(invoice) = invoice {
            if invoice.invoice_type != input.payment_type.invoice_type() {
                return Err(BillingError::InvoiceTypeMismatch);
            }
            let same_party = match input.payment_type {
                PaymentType::Receipt => invoice.customer_id == input.customer_id,
                PaymentType::Payment => invoice.vendor_id == input.vendor_id,
            };
            if !same_party {
                return Err(mismatch);
            }
            if let (Some(order), Some(linked)) = (order, invoice.order_id)
                && order.id != linked
            {
                return Err(BillingError::InvoiceMismatch);
            }
        }
        Ok(())
    }

    /// Settles `invoice` with `payment`, exactly once.
    ///
    /// Adds the amount to `paid_amount`, derives the status and marks the
    /// payment applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment is not a receipt, is linked to a
    /// different invoice, was already applied, the invoice is not an open
    /// sales invoice, or the paid amount would overflow.
    pub fn apply_payment(invoice: &mut Invoice, payment: &mut Payment) -> Result<(), BillingError> {
        if payment.payment_type != PaymentType::Receipt {
            return Err(BillingError::NotAReceipt);
        }
        if payment.invoice_id != Some(invoice.id) {
            return Err(BillingError::InvoiceMismatch);
        }
        if payment.applied_to_invoice {
            return Err(BillingError::AlreadyApplied);
        }
        if invoice.invoice_type != InvoiceType::Sales {
            return Err(BillingError::InvoiceTypeMismatch);
        }
        if invoice.status == InvoiceStatus::Cancelled {
            return Err(BillingError::InvoiceCancelled);
        }

        invoice.paid_amount = invoice
            .paid_amount
            .checked_add(payment.amount)
            .ok_or(BillingError::AmountOutOfRange)?;
        invoice.status = InvoiceStatus::from_settlement(invoice.paid_amount, invoice.total_amount);
        payment.applied_to_invoice = true;
        Ok(())
    }

    /// Rejects deletion of an invoice that has money settled against it.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::InvoiceHasPayments` if `paid_amount` is not zero.
    pub fn ensure_deletable(invoice: &Invoice) -> Result<(), BillingError> {
        if invoice.paid_amount != Decimal::ZERO {
            return Err(BillingError::InvoiceHasPayments);
        }
        Ok(())
    }
}

fn validate_charges(tax_rate: Decimal, discount_amount: Decimal) -> Result<(), BillingError> {
    validate_percent(tax_rate).map_err(BillingError::InvalidTaxRate)?;
    if discount_amount < Decimal::ZERO {
        return Err(BillingError::NegativeDiscount);
    }
    Ok(())
}

fn invoice_line_from(item: &OrderItem, name: Option<String>) -> PricedInvoiceItem {
    let name = name.unwrap_or_else(|| format!("Product {}", item.product_id));
    let description = if item.discount_percent > Decimal::ZERO {
        format!("{name} (less {}% discount)", item.discount_percent.normalize())
    } else {
        name
    };
    PricedInvoiceItem {
        product_id: Some(item.product_id),
        description,
        quantity: Decimal::from(item.quantity),
        unit_price: item.unit_price,
        line_total: item.line_total,
    }
}

fn due_from(issue_date: NaiveDate, due_days: u32) -> NaiveDate {
    issue_date
        .checked_add_days(Days::new(u64::from(due_days)))
        .unwrap_or(NaiveDate::MAX)
}
