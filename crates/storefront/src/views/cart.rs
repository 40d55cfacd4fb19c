//! Cart panel.
//!
//! Reads the shared [`CartStore`]; every button maps onto one store
//! operation.

use sweet_dreams_core::{ProductId, format_amount};

use super::SectionView;
use crate::cart::{CartLineItem, CartState, CartStore, CheckoutReceipt};

/// Cart item display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image_url: Option<String>,
}

impl From<&CartLineItem> for CartItemView {
    fn from(item: &CartLineItem) -> Self {
        Self {
            id: item.product_id.to_string(),
            name: item.name.clone(),
            category: item.category.clone(),
            quantity: item.quantity,
            price: item.unit_price.display(),
            line_price: format_amount(item.line_total()),
            image_url: item.image_url.clone(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
    pub is_open: bool,
}

impl CartView {
    /// An empty, closed cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: "$0.00".to_string(),
            item_count: 0,
            is_open: false,
        }
    }
}

impl From<&CartState> for CartView {
    fn from(state: &CartState) -> Self {
        Self {
            items: state.items().iter().map(CartItemView::from).collect(),
            total: format_amount(state.total_price()),
            item_count: state.total_items(),
            is_open: state.is_open(),
        }
    }
}

/// The slide-out cart.
#[derive(Clone)]
pub struct CartPanel {
    cart: CartStore,
}

impl CartPanel {
    #[must_use]
    pub const fn new(cart: CartStore) -> Self {
        Self { cart }
    }

    #[must_use]
    pub fn view(&self) -> CartView {
        CartView::from(&self.cart.snapshot())
    }

    /// The "+" button.
    pub fn increment(&self, product_id: &ProductId) {
        if let Some(quantity) = self.quantity(product_id) {
            self.cart
                .update_quantity(product_id, i64::from(quantity) + 1);
        }
    }

    /// The "-" button. Going below one removes the line.
    pub fn decrement(&self, product_id: &ProductId) {
        if let Some(quantity) = self.quantity(product_id) {
            self.cart
                .update_quantity(product_id, i64::from(quantity) - 1);
        }
    }

    pub fn remove(&self, product_id: &ProductId) {
        self.cart.remove_item(product_id);
    }

    /// "Continue Shopping".
    pub fn close(&self) {
        self.cart.close_cart();
    }

    /// "Checkout Now". `None` when the cart is empty.
    pub fn checkout(&self) -> Option<CheckoutReceipt> {
        self.cart.checkout()
    }

    fn quantity(&self, product_id: &ProductId) -> Option<u32> {
        self.cart.snapshot().item(product_id).map(|item| item.quantity)
    }

    #[must_use]
    pub fn render(&self) -> SectionView {
        let view = self.view();
        if view.items.is_empty() {
            return SectionView::new(
                "Your Cart",
                vec![
                    "Your cart is empty".to_string(),
                    "Add some sweet treats to get started!".to_string(),
                ],
            );
        }

        let mut lines: Vec<String> = view
            .items
            .iter()
            .map(|item| {
                format!(
                    "{} x{} @ {} = {}",
                    item.name, item.quantity, item.price, item.line_price
                )
            })
            .collect();
        lines.push(format!("Total: {}", view.total));
        SectionView::new("Your Cart", lines)
    }
}
