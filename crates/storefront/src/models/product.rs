//! Catalog products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sweet_dreams_core::{Price, ProductId};

/// A product row from the `products` table.
///
/// `price` and `stock_quantity` reject negative values while decoding, so an
/// invalid row never becomes a `Product`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default, alias = "image")]
    pub image_url: Option<String>,
    pub category: String,
    /// Informational only; the cart never consults or decrements it.
    #[serde(default, alias = "stock")]
    pub stock_quantity: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// The projection of this product that the cart stores.
    #[must_use]
    pub fn cart_product(&self) -> CartProduct {
        CartProduct {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image_url: self.image_url.clone(),
            category: self.category.clone(),
        }
    }
}

/// Cart-shaped projection of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image_url: Option<String>,
    pub category: String,
}
