//! Shopping cart store.
//!
//! A single [`CartStore`] is shared by every view that touches the cart (the
//! catalog's add buttons, the cart panel, the navigation badge). Clones share
//! one state. Mutations are synchronous and serialized by
//! `tokio::sync::watch::Sender::send_if_modified`, so every subscriber sees
//! the same sequence of states and no update is lost.
//!
//! None of the operations can fail. Prices are validated when products are
//! decoded, before they can reach the cart.

mod state;

pub use state::{CartLineItem, CartState};

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::debug;

use sweet_dreams_core::{ProductId, format_amount};

use crate::models::CartProduct;

/// Result of a simulated checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    /// Number of units ordered.
    pub item_count: u64,
    /// Order total.
    pub total: Decimal,
    /// Confirmation shown to the customer.
    pub message: String,
}

/// Shared handle to the cart.
#[derive(Clone, Default)]
pub struct CartStore {
    sender: Arc<watch::Sender<CartState>>,
}

impl CartStore {
    /// Create an empty, closed cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.sender.borrow().clone()
    }

    /// Receive every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.sender.subscribe()
    }

    /// Add one unit of `product`.
    ///
    /// Increments the quantity when the product is already in the cart,
    /// otherwise appends a new line with quantity 1.
    pub fn add_item(&self, product: CartProduct) {
        debug!(product_id = %product.id, "Adding to cart");
        self.sender.send_modify(|state| state.add(product));
    }

    /// Set the quantity of a line exactly.
    ///
    /// Zero or less removes the line. Unknown products are ignored.
    pub fn update_quantity(&self, product_id: &ProductId, quantity: i64) {
        self.sender
            .send_if_modified(|state| state.set_quantity(product_id, quantity));
    }

    /// Remove a line. Unknown products are ignored.
    pub fn remove_item(&self, product_id: &ProductId) {
        self.sender
            .send_if_modified(|state| state.remove(product_id));
    }

    /// Remove every line. The panel stays open or closed as it was.
    pub fn clear_cart(&self) {
        self.sender.send_if_modified(CartState::clear);
    }

    /// Show the cart panel.
    pub fn open_cart(&self) {
        self.sender.send_if_modified(|state| state.set_open(true));
    }

    /// Hide the cart panel.
    pub fn close_cart(&self) {
        self.sender.send_if_modified(|state| state.set_open(false));
    }

    /// Flip the cart panel's visibility.
    pub fn toggle_cart(&self) {
        self.sender.send_modify(|state| {
            let open = !state.is_open();
            state.set_open(open);
        });
    }

    /// Whether the cart panel is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.sender.borrow().is_open()
    }

    /// Sum of all quantities (0 for an empty cart).
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.sender.borrow().total_items()
    }

    /// Sum of unit price times quantity. Formatting is left to the views.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.sender.borrow().total_price()
    }

    /// Simulate placing the order.
    ///
    /// An empty cart does nothing and returns `None`. Otherwise the cart is
    /// emptied and closed in one step and a receipt is returned.
    pub fn checkout(&self) -> Option<CheckoutReceipt> {
        let mut receipt = None;
        self.sender.send_if_modified(|state| {
            if state.is_empty() {
                return false;
            }
            let total = state.total_price();
            receipt = Some(CheckoutReceipt {
                item_count: state.total_items(),
                total,
                message: format!(
                    "Thank you for your order of {}. We'll prepare your sweets with love!",
                    format_amount(total)
                ),
            });
            state.clear();
            state.set_open(false);
            true
        });

        if let Some(receipt) = &receipt {
            tracing::info!(items = receipt.item_count, total = %receipt.total, "Checkout completed");
        }
        receipt
    }
}
