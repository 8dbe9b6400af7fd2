//! Order service: validation and planning of order mutations.
//!
//! The service decides; the persistence layer executes the decision and then
//! calls [`Order::recompute`] with the order's current items.

use orbis_shared::types::{ProductId, validate_percent};
use rust_decimal::Decimal;
use serde::Serialize;

use super::error::OrderError;
use super::status::{OrderKind, OrderStatus};
use super::totals::line_total;
use super::types::{NewOrder, NewOrderItem, Order, OrderItem, OrderItemUpdate, OrderUpdate};
use crate::inventory::{InventoryService, ReservationPlan, StockLevel, StockWarning};

/// A validated item ready to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedItem {
    /// Product ordered.
    pub product_id: ProductId,
    /// Quantity, at least 1.
    pub quantity: i32,
    /// Effective unit price.
    pub unit_price: Decimal,
    /// Item-level discount, percent.
    pub discount_percent: Decimal,
    /// Derived line total.
    pub line_total: Decimal,
}

/// Everything the caller must do to add an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddItemPlan {
    /// The item to insert.
    pub item: PricedItem,
    /// Stock to reserve, when the order is in a committed status.
    pub reservation: Option<ReservationPlan>,
    /// Stock condition to report; never blocks the add.
    pub warning: Option<StockWarning>,
}

/// Order service.
pub struct OrderService;

impl OrderService {
    /// Validates a new order header.
    ///
    /// # Errors
    ///
    /// Returns an error if the party does not match `kind` or a rate is out
    /// of range.
    pub fn validate_new_order(kind: OrderKind, input: &NewOrder) -> Result<(), OrderError> {
        if input.party.kind() != kind {
            return Err(OrderError::PartyMismatch(kind));
        }
        validate_rates(input.tax_rate, input.discount_percent)
    }

    /// Rejects changes to cancelled orders.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::OrderClosed` if the order is cancelled.
    pub fn ensure_open(order: &Order) -> Result<(), OrderError> {
        if order.status == OrderStatus::Cancelled {
            return Err(OrderError::OrderClosed);
        }
        Ok(())
    }

    /// Validates an item and fills in its price and line total.
    ///
    /// # Errors
    ///
    /// Returns an error for a quantity below 1, a discount outside 0-100, a
    /// negative price, or a line total out of range.
    pub fn price_item(
        input: &NewOrderItem,
        product_unit_price: Decimal,
    ) -> Result<PricedItem, OrderError> {
        let unit_price = input.unit_price.unwrap_or(product_unit_price);
        validate_item(input.quantity, unit_price, input.discount_percent)?;

        Ok(PricedItem {
            product_id: input.product_id,
            quantity: input.quantity,
            unit_price,
            discount_percent: input.discount_percent,
            line_total: line_total(unit_price, input.quantity, input.discount_percent)?,
        })
    }

    /// Plans adding an item to `order`.
    ///
    /// `stocks` are the product's stock rows in reservation order. Sales
    /// orders get an availability warning when stock is short and, in a
    /// committed status, a reservation across those rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is cancelled or the item is invalid.
    pub fn plan_add_item(
        order: &Order,
        input: &NewOrderItem,
        product_unit_price: Decimal,
        stocks: &[StockLevel],
    ) -> Result<AddItemPlan, OrderError> {
        Self::ensure_open(order)?;
        let item = Self::price_item(input, product_unit_price)?;

        let (warning, reservation) = match order.kind {
            OrderKind::Sales => (
                InventoryService::availability_warning(item.product_id, stocks, item.quantity),
                order
                    .status
                    .reserves_stock(order.kind)
                    .then(|| InventoryService::plan_reservation(stocks, item.quantity)),
            ),
            OrderKind::Purchase => (None, None),
        };

        Ok(AddItemPlan {
            item,
            reservation,
            warning,
        })
    }

    /// Applies a partial update to an item and recomputes its line total.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is cancelled or the updated item is
    /// invalid. The item is left unchanged on error.
    pub fn apply_item_update(
        order: &Order,
        item: &mut OrderItem,
        update: &OrderItemUpdate,
    ) -> Result<(), OrderError> {
        Self::ensure_open(order)?;

        let quantity = update.quantity.unwrap_or(item.quantity);
        let unit_price = update.unit_price.unwrap_or(item.unit_price);
        let discount_percent = update.discount_percent.unwrap_or(item.discount_percent);
        validate_item(quantity, unit_price, discount_percent)?;

        let received_quantity = match (order.kind, update.received_quantity) {
            (OrderKind::Purchase, Some(received)) if received < 0 => {
                return Err(OrderError::NegativeReceivedQuantity);
            }
            (OrderKind::Purchase, Some(received)) => received,
            _ => item.received_quantity,
        };

        let total = line_total(unit_price, quantity, discount_percent)?;
        item.quantity = quantity;
        item.unit_price = unit_price;
        item.discount_percent = discount_percent;
        item.received_quantity = received_quantity;
        item.line_total = total;
        Ok(())
    }

    /// Applies a partial header update.
    ///
    /// Purchase-only fields are ignored on sales orders. Returns true if a
    /// rate changed, in which case totals must be recomputed.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is cancelled or a rate is out of range.
    pub fn apply_header_update(order: &mut Order, update: &OrderUpdate) -> Result<bool, OrderError> {
        Self::ensure_open(order)?;

        let tax_rate = update.tax_rate.unwrap_or(order.tax_rate);
        let discount_percent = update.discount_percent.unwrap_or(order.discount_percent);
        validate_rates(tax_rate, discount_percent)?;

        let rates_changed = tax_rate != order.tax_rate || discount_percent != order.discount_percent;
        order.tax_rate = tax_rate;
        order.discount_percent = discount_percent;

        if let Some(delivery_date) = update.delivery_date {
            order.delivery_date = Some(delivery_date);
        }
        if let Some(notes) = &update.notes {
            order.notes = Some(notes.clone());
        }
        if order.kind == OrderKind::Purchase {
            if let Some(warehouse_id) = update.warehouse_id {
                order.warehouse_id = Some(warehouse_id);
            }
            if let Some(due) = update.payment_due_date {
                order.payment_due_date = Some(due);
            }
            if let Some(reference) = &update.reference_number {
                order.reference_number = Some(reference.clone());
            }
        }

        Ok(rates_changed)
    }
}

fn validate_item(quantity: i32, unit_price: Decimal, discount_percent: Decimal) -> Result<(), OrderError> {
    if quantity < 1 {
        return Err(OrderError::InvalidQuantity(quantity));
    }
    if unit_price < Decimal::ZERO {
        return Err(OrderError::NegativeUnitPrice);
    }
    validate_percent(discount_percent).map_err(OrderError::InvalidDiscount)?;
    Ok(())
}

fn validate_rates(tax_rate: Decimal, discount_percent: Decimal) -> Result<(), OrderError> {
    validate_percent(tax_rate).map_err(OrderError::InvalidTaxRate)?;
    validate_percent(discount_percent).map_err(OrderError::InvalidDiscount)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::types::OrderParty;
    use chrono::Utc;
    use orbis_shared::types::{CustomerId, OrderId, VendorId};
    use rust_decimal_macros::dec;

    fn order(party: OrderParty, status: OrderStatus) -> Order {
        let mut order = Order::new(OrderId::new(), "SO2026010001".into(), party, Utc::now());
        order.status = status;
        order
    }

    fn sales(status: OrderStatus) -> Order {
        order(OrderParty::Customer(CustomerId::new()), status)
    }

    fn purchase(status: OrderStatus) -> Order {
        order(OrderParty::Vendor(VendorId::new()), status)
    }

    fn item_input(product_id: ProductId, quantity: i32) -> NewOrderItem {
        NewOrderItem {
            product_id,
            quantity,
            unit_price: None,
            discount_percent: Decimal::ZERO,
        }
    }

    fn stock(product_id: ProductId, warehouse_id: i32, on_hand: i32) -> StockLevel {
        let mut s = StockLevel::new(product_id, warehouse_id, format!("WH-{warehouse_id}"));
        s.quantity_on_hand = on_hand;
        s.recompute_available();
        s
    }

    // ========================================================================
    // Item pricing
    // ========================================================================

    #[test]
    fn test_price_defaults_to_product_price() {
        let input = item_input(ProductId::new(), 4);
        let priced = OrderService::price_item(&input, dec!(12.50)).unwrap();
        assert_eq!(priced.unit_price, dec!(12.50));
        assert_eq!(priced.line_total, dec!(50.00));
    }

    #[test]
    fn test_explicit_price_wins() {
        let mut input = item_input(ProductId::new(), 2);
        input.unit_price = Some(dec!(9.00));
        input.discount_percent = dec!(50);
        let priced = OrderService::price_item(&input, dec!(12.50)).unwrap();
        assert_eq!(priced.line_total, dec!(9.00));
    }

    #[test]
    fn test_quantity_below_one_is_rejected() {
        let input = item_input(ProductId::new(), 0);
        assert_eq!(
            OrderService::price_item(&input, dec!(1)),
            Err(OrderError::InvalidQuantity(0))
        );
    }

    #[test]
    fn test_discount_out_of_range_is_rejected() {
        let mut input = item_input(ProductId::new(), 1);
        input.discount_percent = dec!(100.01);
        assert_eq!(
            OrderService::price_item(&input, dec!(1)),
            Err(OrderError::InvalidDiscount(dec!(100.01)))
        );
    }

    #[test]
    fn test_out_of_range_line_is_rejected() {
        let mut input = item_input(ProductId::new(), i32::MAX);
        input.unit_price = Some(Decimal::MAX);
        assert_eq!(
            OrderService::price_item(&input, dec!(1)),
            Err(OrderError::AmountOutOfRange)
        );
    }

    // ========================================================================
    // Add item planning
    // ========================================================================

    #[test]
    fn test_draft_sales_order_warns_but_does_not_reserve() {
        let product_id = ProductId::new();
        let stocks = vec![stock(product_id, 1, 2)];
        let plan = OrderService::plan_add_item(
            &sales(OrderStatus::Draft),
            &item_input(product_id, 5),
            dec!(10),
            &stocks,
        )
        .unwrap();

        assert!(plan.reservation.is_none());
        assert_eq!(
            plan.warning,
            Some(StockWarning::InsufficientStock {
                product_id,
                requested: 5,
                available: 2,
            })
        );
    }

    #[test]
    fn test_confirmed_sales_order_reserves() {
        let product_id = ProductId::new();
        let stocks = vec![stock(product_id, 1, 3), stock(product_id, 2, 10)];
        let plan = OrderService::plan_add_item(
            &sales(OrderStatus::Confirmed),
            &item_input(product_id, 5),
            dec!(10),
            &stocks,
        )
        .unwrap();

        let reservation = plan.reservation.unwrap();
        assert_eq!(reservation.reserved(), 5);
        assert_eq!(reservation.allocations.len(), 2);
        assert!(plan.warning.is_none());
    }

    #[test]
    fn test_missing_inventory_still_adds_item() {
        let product_id = ProductId::new();
        let plan = OrderService::plan_add_item(
            &sales(OrderStatus::Shipped),
            &item_input(product_id, 5),
            dec!(10),
            &[],
        )
        .unwrap();

        assert_eq!(plan.item.quantity, 5);
        assert_eq!(plan.warning, Some(StockWarning::NoInventoryRecord { product_id }));
        assert_eq!(plan.reservation.unwrap().shortfall, 5);
    }

    #[test]
    fn test_purchase_order_ignores_stock() {
        let plan = OrderService::plan_add_item(
            &purchase(OrderStatus::Confirmed),
            &item_input(ProductId::new(), 5),
            dec!(10),
            &[],
        )
        .unwrap();
        assert!(plan.warning.is_none());
        assert!(plan.reservation.is_none());
    }

    #[test]
    fn test_cancelled_order_rejects_items() {
        let result = OrderService::plan_add_item(
            &sales(OrderStatus::Cancelled),
            &item_input(ProductId::new(), 1),
            dec!(10),
            &[],
        );
        assert_eq!(result, Err(OrderError::OrderClosed));
    }

    // ========================================================================
    // Updates
    // ========================================================================

    fn existing_item(order: &Order) -> OrderItem {
        OrderItem {
            id: 1,
            order_id: order.id,
            product_id: ProductId::new(),
            quantity: 2,
            unit_price: dec!(10),
            discount_percent: Decimal::ZERO,
            line_total: dec!(20),
            received_quantity: 0,
        }
    }

    #[test]
    fn test_item_update_recomputes_line_total() {
        let order = purchase(OrderStatus::Confirmed);
        let mut item = existing_item(&order);
        let update = OrderItemUpdate {
            quantity: Some(5),
            received_quantity: Some(3),
            ..OrderItemUpdate::default()
        };
        OrderService::apply_item_update(&order, &mut item, &update).unwrap();
        assert_eq!(item.line_total, dec!(50));
        assert_eq!(item.received_quantity, 3);
    }

    #[test]
    fn test_invalid_item_update_leaves_item_unchanged() {
        let order = sales(OrderStatus::Draft);
        let mut item = existing_item(&order);
        let before = item.clone();
        let update = OrderItemUpdate {
            quantity: Some(0),
            ..OrderItemUpdate::default()
        };
        assert!(OrderService::apply_item_update(&order, &mut item, &update).is_err());
        assert_eq!(item, before);
    }

    #[test]
    fn test_overflowing_item_update_leaves_item_unchanged() {
        let order = sales(OrderStatus::Draft);
        let mut item = existing_item(&order);
        let before = item.clone();
        let update = OrderItemUpdate {
            quantity: Some(i32::MAX),
            unit_price: Some(Decimal::MAX),
            ..OrderItemUpdate::default()
        };
        assert_eq!(
            OrderService::apply_item_update(&order, &mut item, &update),
            Err(OrderError::AmountOutOfRange)
        );
        assert_eq!(item, before);
    }

    #[test]
    fn test_header_update_reports_rate_change() {
        let mut order = sales(OrderStatus::Draft);
        let changed = OrderService::apply_header_update(
            &mut order,
            &OrderUpdate {
                tax_rate: Some(dec!(8)),
                reference_number: Some("ignored".into()),
                ..OrderUpdate::default()
            },
        )
        .unwrap();
        assert!(changed);
        assert_eq!(order.tax_rate, dec!(8));
        assert_eq!(order.reference_number, None);

        let unchanged = OrderService::apply_header_update(
            &mut order,
            &OrderUpdate {
                notes: Some("call first".into()),
                ..OrderUpdate::default()
            },
        )
        .unwrap();
        assert!(!unchanged);
    }

    #[test]
    fn test_header_update_rejects_bad_tax_rate() {
        let mut order = sales(OrderStatus::Draft);
        let result = OrderService::apply_header_update(
            &mut order,
            &OrderUpdate {
                tax_rate: Some(dec!(-1)),
                ..OrderUpdate::default()
            },
        );
        assert_eq!(result, Err(OrderError::InvalidTaxRate(dec!(-1))));
    }

    #[test]
    fn test_new_order_party_must_match_kind() {
        let input = NewOrder {
            party: OrderParty::Vendor(VendorId::new()),
            delivery_date: None,
            tax_rate: Decimal::ZERO,
            discount_percent: Decimal::ZERO,
            warehouse_id: None,
            payment_due_date: None,
            reference_number: None,
            notes: None,
            created_by: None,
        };
        assert_eq!(
            OrderService::validate_new_order(OrderKind::Sales, &input),
            Err(OrderError::PartyMismatch(OrderKind::Sales))
        );
        assert!(OrderService::validate_new_order(OrderKind::Purchase, &input).is_ok());
    }
}
