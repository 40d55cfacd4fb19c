//! Cart state and its transitions.
//!
//! All mutation goes through the `pub(super)` methods, which report whether
//! anything changed so the store only notifies on real changes.

use rust_decimal::Decimal;

use sweet_dreams_core::{Price, ProductId};

use crate::models::CartProduct;

/// One product in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub image_url: Option<String>,
    pub category: String,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLineItem {
    fn new(product: CartProduct) -> Self {
        Self {
            product_id: product.id,
            name: product.name,
            unit_price: product.price,
            image_url: product.image_url,
            category: product.category,
            quantity: 1,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.times(self.quantity)
    }
}

/// Line items in first-added order plus the panel visibility flag.
///
/// Totals are computed on demand from the line items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    items: Vec<CartLineItem>,
    is_open: bool,
}

impl CartState {
    /// Line items in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// The line item for `product_id`, if present.
    #[must_use]
    pub fn item(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| &item.product_id == product_id)
    }

    /// Whether the cart panel is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of unit price times quantity over all items. Saturates at
    /// `Decimal::MAX`.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items
            .iter()
            .map(CartLineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub(super) fn add(&mut self, product: CartProduct) {
        match self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.id)
        {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.items.push(CartLineItem::new(product)),
        }
    }

    pub(super) fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(product_id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self
            .items
            .iter_mut()
            .find(|item| &item.product_id == product_id)
        {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    pub(super) fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.product_id != product_id);
        self.items.len() != before
    }

    pub(super) fn clear(&mut self) -> bool {
        let changed = !self.items.is_empty();
        self.items.clear();
        changed
    }

    pub(super) fn set_open(&mut self, open: bool) -> bool {
        let changed = self.is_open != open;
        self.is_open = open;
        changed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, cents: u32) -> CartProduct {
        CartProduct {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::from_whole_cents(cents),
            image_url: None,
            category: "Macarons".to_string(),
        }
    }

    #[test]
    fn test_add_preserves_first_added_order() {
        let mut state = CartState::default();
        state.add(product("b", 100));
        state.add(product("a", 100));
        state.add(product("b", 100));

        let ids: Vec<_> = state.items().iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(state.item(&ProductId::new("b")).unwrap().quantity, 2);
    }

    #[test]
    fn test_set_quantity_clamps_large_values() {
        let mut state = CartState::default();
        state.add(product("a", 100));
        assert!(state.set_quantity(&ProductId::new("a"), i64::MAX));
        assert_eq!(state.total_items(), u64::from(u32::MAX));
    }

    #[test]
    fn test_set_quantity_same_value_is_unchanged() {
        let mut state = CartState::default();
        state.add(product("a", 100));
        assert!(!state.set_quantity(&ProductId::new("a"), 1));
        assert!(!state.set_quantity(&ProductId::new("missing"), 3));
    }

    #[test]
    fn test_negative_quantity_removes() {
        let mut state = CartState::default();
        state.add(product("a", 100));
        assert!(state.set_quantity(&ProductId::new("a"), -4));
        assert!(state.is_empty());
    }

    #[test]
    fn test_line_total() {
        let mut state = CartState::default();
        state.add(product("a", 3499));
        state.add(product("a", 3499));
        assert_eq!(state.items()[0].line_total(), Decimal::new(6998, 2));
    }
}
