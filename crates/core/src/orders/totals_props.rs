//! Property-based tests for order total recomputation.

use chrono::Utc;
use orbis_shared::types::{CustomerId, OrderId, ProductId, round_money};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::OrderService;
use super::status::OrderStatus;
use super::totals::OrderTotals;
use super::types::{NewOrderItem, Order, OrderItem, OrderItemUpdate, OrderParty};

fn price() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn percent() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000).prop_map(|bp| Decimal::new(bp, 2))
}

#[derive(Debug, Clone)]
enum Op {
    Add { quantity: i32, unit_price: Decimal, discount: Decimal },
    Edit { index: usize, quantity: i32 },
    Delete { index: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1i32..50, price(), percent()).prop_map(|(quantity, unit_price, discount)| Op::Add {
            quantity,
            unit_price,
            discount,
        }),
        (any::<usize>(), 1i32..50).prop_map(|(index, quantity)| Op::Edit { index, quantity }),
        any::<usize>().prop_map(|index| Op::Delete { index }),
    ]
}

/// Totals computed straight from the formula, independently of `OrderTotals`.
fn expected_total(items: &[OrderItem], discount_percent: Decimal, tax_rate: Decimal) -> Decimal {
    let subtotal: Decimal = items
        .iter()
        .map(|i| {
            let gross = i.unit_price * Decimal::from(i.quantity);
            round_money(gross * (Decimal::ONE_HUNDRED - i.discount_percent) / Decimal::ONE_HUNDRED)
        })
        .sum();
    let discount = round_money(subtotal * discount_percent / Decimal::ONE_HUNDRED);
    let tax = round_money((subtotal - discount) * tax_rate / Decimal::ONE_HUNDRED);
    subtotal - discount + tax
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* sequence of item add/edit/delete operations, the order total
    /// SHALL equal the formula applied to the current item set, to the cent.
    #[test]
    fn prop_total_matches_formula_after_any_sequence(
        ops in prop::collection::vec(op(), 0..25),
        discount_percent in percent(),
        tax_rate in percent(),
    ) {
        let mut order = Order::new(
            OrderId::new(),
            "SO2026010001".into(),
            OrderParty::Customer(CustomerId::new()),
            Utc::now(),
        );
        order.discount_percent = discount_percent;
        order.tax_rate = tax_rate;
        let mut items: Vec<OrderItem> = Vec::new();
        let mut next_id = 1i64;

        for op in ops {
            match op {
                Op::Add { quantity, unit_price, discount } => {
                    let input = NewOrderItem {
                        product_id: ProductId::new(),
                        quantity,
                        unit_price: Some(unit_price),
                        discount_percent: discount,
                    };
                    let plan = OrderService::plan_add_item(&order, &input, Decimal::ZERO, &[]).unwrap();
                    items.push(OrderItem {
                        id: next_id,
                        order_id: order.id,
                        product_id: plan.item.product_id,
                        quantity: plan.item.quantity,
                        unit_price: plan.item.unit_price,
                        discount_percent: plan.item.discount_percent,
                        line_total: plan.item.line_total,
                        received_quantity: 0,
                    });
                    next_id += 1;
                }
                Op::Edit { index, quantity } if !items.is_empty() => {
                    let i = index % items.len();
                    let update = OrderItemUpdate { quantity: Some(quantity), ..OrderItemUpdate::default() };
                    OrderService::apply_item_update(&order, &mut items[i], &update).unwrap();
                }
                Op::Delete { index } if !items.is_empty() => {
                    let i = index % items.len();
                    items.remove(i);
                }
                _ => {}
            }
            order.recompute(&items).unwrap();
        }

        prop_assert_eq!(order.total_amount, expected_total(&items, discount_percent, tax_rate));
        prop_assert_eq!(
            order.total_amount,
            order.subtotal - order.discount_amount + order.tax_amount
        );
    }

    /// *For any* inputs, recomputing twice SHALL give the same totals.
    #[test]
    fn prop_recompute_is_idempotent(
        lines in prop::collection::vec(price(), 0..20),
        discount_percent in percent(),
        tax_rate in percent(),
    ) {
        let first = OrderTotals::recompute(lines.iter().copied(), discount_percent, tax_rate);
        let second = OrderTotals::recompute(lines.iter().copied(), discount_percent, tax_rate);
        prop_assert_eq!(first, second);
    }

    /// *For any* order status, a total that is not positive SHALL never
    /// request an invoice.
    #[test]
    fn prop_no_invoice_without_positive_total(has_invoice in any::<bool>()) {
        let order = Order::new(
            OrderId::new(),
            "SO2026010001".into(),
            OrderParty::Customer(CustomerId::new()),
            Utc::now(),
        );
        for status in [OrderStatus::Confirmed, OrderStatus::Shipped] {
            let t = super::status::transition(&order, status, has_invoice).unwrap();
            prop_assert!(t.events.is_empty());
        }
    }
}
