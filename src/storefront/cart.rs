//! Storefront cart.
//!
//! Lines are keyed by menu item id. The item count shown on the cart badge is
//! cached and recomputed by every mutation; subtotal and checkout amounts
//! are always derived from the lines.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

use crate::models::order::OrderItem;

/// Tax applied at checkout
pub const TAX_RATE: Decimal = dec!(0.05);

/// Flat delivery charge added to every order
pub const DELIVERY_FEE: Decimal = dec!(50);

/// What `decrease_qty` does to a line at quantity one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QtyFloor {
    /// Quantity may reach zero, which removes the line
    RemoveLine,
    /// Quantity stops at one; removal needs `remove_item`
    #[default]
    KeepOne,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub name: String,
    pub unit_price: Decimal,
    pub qty: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: BTreeMap<String, CartLine>,
    floor: QtyFloor,
    count: u32,
}

impl Cart {
    pub fn new(floor: QtyFloor) -> Self {
        Self {
            lines: BTreeMap::new(),
            floor,
            count: 0,
        }
    }

    /// Add `qty` of an item, merging with an existing line.
    pub fn add_item(&mut self, id: &str, name: &str, unit_price: Decimal, qty: u32) {
        if qty == 0 {
            return;
        }

        self.lines
            .entry(id.to_string())
            .and_modify(|line| line.qty = line.qty.saturating_add(qty))
            .or_insert_with(|| CartLine {
                name: name.to_string(),
                unit_price,
                qty,
            });
        self.recount();
    }

    pub fn remove_item(&mut self, id: &str) {
        self.lines.remove(id);
        self.recount();
    }

    pub fn increase_qty(&mut self, id: &str) {
        if let Some(line) = self.lines.get_mut(id) {
            line.qty = line.qty.saturating_add(1);
        }
        self.recount();
    }

    pub fn decrease_qty(&mut self, id: &str) {
        let remove = match self.lines.get_mut(id) {
            Some(line) => match self.floor {
                QtyFloor::KeepOne => {
                    line.qty = line.qty.saturating_sub(1).max(1);
                    false
                }
                QtyFloor::RemoveLine => {
                    line.qty = line.qty.saturating_sub(1);
                    line.qty == 0
                }
            },
            None => false,
        };

        if remove {
            self.lines.remove(id);
        }
        self.recount();
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.recount();
    }

    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Badge count: total quantity across lines
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn subtotal(&self) -> Decimal {
        self.lines
            .values()
            .map(|l| l.unit_price * Decimal::from(l.qty))
            .sum()
    }

    pub fn checkout_summary(&self) -> CheckoutSummary {
        let subtotal = self.subtotal();
        let tax = (subtotal * TAX_RATE).round_dp(2);

        CheckoutSummary {
            subtotal,
            tax,
            delivery_fee: DELIVERY_FEE,
            total: subtotal + tax + DELIVERY_FEE,
        }
    }

    /// Line items as submitted with the order, ordered by item id.
    pub fn order_items(&self) -> Vec<OrderItem> {
        self.lines
            .iter()
            .map(|(id, line)| OrderItem {
                id: Some(id.clone()),
                name: line.name.clone(),
                price: line.unit_price,
                qty: line.qty,
            })
            .collect()
    }

    fn recount(&mut self) {
        self.count = self
            .lines
            .values()
            .fold(0u32, |count, l| count.saturating_add(l.qty));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantities_saturate_at_max() {
        let mut cart = Cart::default();
        cart.add_item("wings", "Chicken Wings", dec!(300), u32::MAX - 1);
        cart.add_item("wings", "Chicken Wings", dec!(300), 5);
        assert_eq!(cart.line("wings").unwrap().qty, u32::MAX);

        cart.increase_qty("wings");
        assert_eq!(cart.line("wings").unwrap().qty, u32::MAX);

        cart.add_item("ribs", "Ribs", dec!(900), 2);
        assert_eq!(cart.count(), u32::MAX);
    }

    #[test]
    fn test_add_item_merges_lines() {
        let mut cart = Cart::default();
        cart.add_item("wings", "Chicken Wings", dec!(300), 1);
        cart.add_item("wings", "Chicken Wings", dec!(300), 2);

        assert_eq!(cart.line("wings").unwrap().qty, 3);
        assert_eq!(cart.count(), 3);
        assert_eq!(cart.subtotal(), dec!(900));
    }

    #[test]
    fn test_add_zero_is_ignored() {
        let mut cart = Cart::default();
        cart.add_item("wings", "Chicken Wings", dec!(300), 0);
        assert!(cart.is_empty());
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_decrease_keep_one_floor() {
        let mut cart = Cart::new(QtyFloor::KeepOne);
        cart.add_item("poutine", "Poutine", dec!(450), 1);
        cart.decrease_qty("poutine");

        assert_eq!(cart.line("poutine").unwrap().qty, 1);
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_decrease_remove_line_floor() {
        let mut cart = Cart::new(QtyFloor::RemoveLine);
        cart.add_item("poutine", "Poutine", dec!(450), 2);
        cart.decrease_qty("poutine");
        assert_eq!(cart.count(), 1);

        cart.decrease_qty("poutine");
        assert!(cart.line("poutine").is_none());
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_unknown_ids_are_no_ops() {
        let mut cart = Cart::default();
        cart.add_item("ribs", "Giant Spare Ribs", dec!(2850), 1);
        cart.increase_qty("nope");
        cart.decrease_qty("nope");
        cart.remove_item("nope");
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_clear_resets_badge() {
        let mut cart = Cart::default();
        cart.add_item("ribs", "Giant Spare Ribs", dec!(2850), 2);
        cart.increase_qty("ribs");
        assert_eq!(cart.count(), 3);

        cart.clear();
        assert_eq!(cart.count(), 0);
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_checkout_summary_matches_storefront_pricing() {
        let mut cart = Cart::default();
        cart.add_item("a", "Item A", dec!(500), 2);
        cart.add_item("b", "Item B", dec!(300), 1);

        let summary = cart.checkout_summary();
        assert_eq!(summary.subtotal, dec!(1300));
        assert_eq!(summary.tax, dec!(65));
        assert_eq!(summary.delivery_fee, dec!(50));
        assert_eq!(summary.total, dec!(1415));
    }

    #[test]
    fn test_order_items_carry_ids() {
        let mut cart = Cart::default();
        cart.add_item("b", "Item B", dec!(300), 1);
        cart.add_item("a", "Item A", dec!(500), 2);

        let items = cart.order_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id.as_deref(), Some("a"));
        assert_eq!(items[0].line_total(), dec!(1000));
    }
}
