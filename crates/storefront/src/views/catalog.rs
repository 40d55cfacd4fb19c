//! Product catalog.
//!
//! The product list is fetched once on mount. Category filtering happens
//! locally over that list, so switching categories never refetches.

use std::time::Duration;

use tracing::{debug, warn};

use sweet_dreams_core::{Price, ProductId};

use super::SectionView;
use crate::cart::CartStore;
use crate::content::{ContentSlice, ContentView, LoadState};
use crate::gateway::{Direction, Gateway, GatewayError, Query, Row, decode_rows};
use crate::models::Product;

/// The implicit category that matches every product.
pub const ALL_CATEGORIES: &str = "All";

/// Every product, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductList(pub Vec<Product>);

impl ContentSlice for ProductList {
    const SECTION: &'static str = "products";

    fn query() -> Query {
        Query::table("products").order("created_at", Direction::Ascending)
    }

    fn decode(rows: Vec<Row>) -> Result<Option<Self>, GatewayError> {
        let products: Vec<Product> = decode_rows(Self::SECTION, rows);
        Ok((!products.is_empty()).then_some(Self(products)))
    }

    fn fallback() -> Self {
        Self(house_collection())
    }

    fn render(&self) -> SectionView {
        SectionView::new(
            "Our Sweet Collection",
            self.0
                .iter()
                .map(|p| ProductCardView::from(p).summary())
                .collect(),
        )
    }
}

/// The eight products shown when the catalog cannot be fetched.
fn house_collection() -> Vec<Product> {
    let product = |id: &str, name: &str, cents: u32, category: &str, image: &str, description: &str| {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: Some(description.to_string()),
            price: Price::from_whole_cents(cents),
            image_url: Some(format!("/assets/{image}.jpg")),
            category: category.to_string(),
            stock_quantity: 0,
            created_at: None,
        }
    };

    vec![
        product(
            "1",
            "French Macarons Set",
            2499,
            "Macarons",
            "macarons",
            "Delicate almond cookies with silky ganache filling in assorted flavors.",
        ),
        product(
            "2",
            "Artisanal Chocolate Box",
            3499,
            "Chocolates",
            "chocolates",
            "Premium Belgian chocolates with unique fillings and elegant presentation.",
        ),
        product(
            "3",
            "Vanilla Dream Cupcakes",
            1899,
            "Cupcakes",
            "cupcakes",
            "Fluffy vanilla cupcakes topped with buttercream and edible flowers.",
        ),
        product(
            "4",
            "Festive Gift Collection",
            4999,
            "Gift Boxes",
            "gift-boxes",
            "Elegant gift boxes with assorted confections perfect for special occasions.",
        ),
        product(
            "5",
            "Rose Petal Macarons",
            2899,
            "Macarons",
            "macarons",
            "Delicate rose-flavored macarons with real rose petals and pink buttercream.",
        ),
        product(
            "6",
            "Dark Chocolate Truffles",
            2699,
            "Chocolates",
            "chocolates",
            "Rich dark chocolate truffles dusted with cocoa powder and sea salt.",
        ),
        product(
            "7",
            "Birthday Celebration Set",
            3999,
            "Cupcakes",
            "cupcakes",
            "Colorful birthday cupcakes with rainbow sprinkles and candles included.",
        ),
        product(
            "8",
            "Premium Holiday Box",
            6499,
            "Gift Boxes",
            "gift-boxes",
            "Luxury holiday collection with seasonal treats and premium packaging.",
        ),
    ]
}

/// Product card display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub category: String,
    pub image_url: Option<String>,
}

impl ProductCardView {
    /// One-line rendering: name, category and price.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} ({}) {}", self.name, self.category, self.price)
    }
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            category: product.category.clone(),
            image_url: product.image_url.clone(),
        }
    }
}

/// The catalog section with its category filter.
#[derive(Debug)]
pub struct Catalog {
    view: ContentView<ProductList>,
    selected: String,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            view: ContentView::new(),
            selected: ALL_CATEGORIES.to_string(),
        }
    }
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the product list. Only the first call fetches.
    pub async fn mount(&mut self, gateway: &dyn Gateway, timeout: Duration) {
        self.view.mount(gateway, timeout).await;
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState<ProductList> {
        self.view.state()
    }

    /// Every product, fetched or fallback. Empty while loading.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        self.view
            .value()
            .map(|list| list.0.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn product(&self, product_id: &ProductId) -> Option<&Product> {
        self.products().iter().find(|p| &p.id == product_id)
    }

    /// "All" followed by each category in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories = vec![ALL_CATEGORIES];
        for product in self.products() {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// Set the active filter. [`ALL_CATEGORIES`] clears it.
    pub fn select_category(&mut self, category: &str) {
        debug!(category, "Category selected");
        category.clone_into(&mut self.selected);
    }

    #[must_use]
    pub fn selected_category(&self) -> &str {
        &self.selected
    }

    /// Products in the active category, in catalog order.
    #[must_use]
    pub fn filtered_products(&self) -> Vec<&Product> {
        self.products()
            .iter()
            .filter(|p| self.selected == ALL_CATEGORIES || p.category == self.selected)
            .collect()
    }

    /// How many products `category` holds; every product for "All".
    #[must_use]
    pub fn product_count(&self, category: &str) -> usize {
        if category == ALL_CATEGORIES {
            return self.products().len();
        }
        self.products()
            .iter()
            .filter(|p| p.category == category)
            .count()
    }

    /// Put one unit of a product in the cart.
    ///
    /// Returns the confirmation to show, or `None` for an unknown product.
    /// Stock is not checked.
    pub fn add_to_cart(&self, cart: &CartStore, product_id: &ProductId) -> Option<String> {
        let Some(product) = self.product(product_id) else {
            warn!(%product_id, "Add to cart for unknown product ignored");
            return None;
        };
        cart.add_item(product.cart_product());
        Some(format!("{} has been added to your cart.", product.name))
    }

    /// Category chips with counts, then the filtered product cards.
    #[must_use]
    pub fn render(&self) -> SectionView {
        if self.state().is_loading() {
            return SectionView::loading(ProductList::SECTION);
        }

        let chips = self
            .categories()
            .into_iter()
            .map(|category| {
                let marker = if category == self.selected { "*" } else { "" };
                if category == ALL_CATEGORIES {
                    format!("{marker}{category}")
                } else {
                    format!("{marker}{category} ({})", self.product_count(category))
                }
            })
            .collect::<Vec<_>>()
            .join(" | ");

        let mut lines = vec![chips];
        lines.extend(
            self.filtered_products()
                .into_iter()
                .map(|p| ProductCardView::from(p).summary()),
        );
        SectionView::new("Our Sweet Collection", lines)
    }
}
