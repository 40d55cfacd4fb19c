//! Integration tests for the Sweet Dreams storefront.
//!
//! Every test drives the storefront through its public API against the
//! in-memory gateway, so no backend or network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sweet-dreams-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Catalog to cart to checkout
//! - `content_sync` - Fetch once per mount, fall back on failure or timeout
//! - `accounts` - Sessions, reviews and the account page
//! - `forms` - Validation and write failures

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use serde_json::{Value, json};

use sweet_dreams_core::Email;
use sweet_dreams_storefront::Storefront;
use sweet_dreams_storefront::gateway::MemoryGateway;
use sweet_dreams_storefront::models::SessionIdentity;

/// Fetch timeout for tests. Hanging tables resolve to their fallback after
/// this long.
pub const FAST: Duration = Duration::from_millis(50);

/// Password of every fixture account.
pub const PASSWORD: &str = "sugar-rush";

/// One `products` row.
#[must_use]
pub fn product_row(id: &str, name: &str, price: &str, category: &str, day: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name}, made this morning."),
        "price": price,
        "image_url": format!("/assets/{id}.jpg"),
        "category": category,
        "stock_quantity": 10,
        "created_at": format!("2024-05-{day:02}T08:00:00Z"),
    })
}

/// Eight products, oldest first. "Macarons" holds `m1` and `m2`.
#[must_use]
pub fn catalog_rows() -> Vec<Value> {
    vec![
        product_row("c1", "Hazelnut Pralines", "34.99", "Chocolates", 1),
        product_row("m1", "Pistachio Macarons", "24.99", "Macarons", 2),
        product_row("k1", "Lemon Cupcakes", "18.50", "Cupcakes", 3),
        product_row("g1", "Anniversary Box", "59.00", "Gift Boxes", 4),
        product_row("c2", "Sea Salt Caramels", "21.00", "Chocolates", 5),
        product_row("k2", "Red Velvet Cupcakes", "19.99", "Cupcakes", 6),
        product_row("m2", "Lavender Macarons", "26.00", "Macarons", 7),
        product_row("g2", "Thank You Box", "39.99", "Gift Boxes", 8),
    ]
}

/// A gateway holding [`catalog_rows`] and a row for every content section.
#[must_use]
pub fn seeded_gateway() -> MemoryGateway {
    MemoryGateway::new()
        .with_rows("products", catalog_rows())
        .with_rows(
            "site_content",
            vec![
                json!({
                    "section": "hero",
                    "title": "Fresh From the Oven",
                    "subtitle": "Spring Collection",
                    "content": "Seasonal sweets, baked daily."
                }),
                json!({
                    "section": "about",
                    "title": "Our Kitchen",
                    "content": "We bake.\n\nYou enjoy.",
                    "metadata": {"mission": "Sweeten every day."}
                }),
            ],
        )
        .with_rows(
            "store_info",
            vec![json!({
                "address": "9 Sugar Row",
                "phone": "555-0199",
                "email": "shop@example.com",
                "hours": [{"day": "Every day", "time": "9:00 AM - 5:00 PM"}]
            })],
        )
        .with_rows(
            "social_links",
            vec![
                json!({"platform": "Instagram", "url": "https://instagram.com/sugarrow", "sort_order": 2}),
                json!({"platform": "Facebook", "url": "https://facebook.com/sugarrow", "sort_order": 1}),
            ],
        )
}

/// A storefront session over `gateway` using [`FAST`].
pub async fn storefront(gateway: &MemoryGateway) -> Storefront {
    Storefront::in_memory(gateway.clone(), FAST).await
}

/// Register a confirmed account with [`PASSWORD`].
///
/// # Panics
///
/// Panics if the email is malformed or already registered.
#[must_use]
pub fn create_account(gateway: &MemoryGateway, email: &str, full_name: &str) -> SessionIdentity {
    let email = Email::parse(email).expect("fixture email is valid");
    gateway
        .create_account(email, PASSWORD, full_name)
        .expect("fixture account is created")
}
