//! Read-only storefront listings.

use std::io::Write;

use tracing::{info, warn};

use sweet_dreams_storefront::Storefront;
use sweet_dreams_storefront::views::{Catalog, ProductCardView, ReviewView, ReviewsView};

/// List catalog products, optionally limited to one category.
///
/// # Errors
///
/// Returns an error for a category the catalog does not carry, or if stdout
/// cannot be written.
pub async fn products(
    storefront: &Storefront,
    category: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut catalog = Catalog::new();
    catalog
        .mount(storefront.gateway(), storefront.fetch_timeout())
        .await;

    if catalog.state().is_fallback() {
        warn!("Catalog unavailable, listing the house collection");
    }

    if let Some(category) = category {
        if !catalog.categories().contains(&category) {
            return Err(format!("Unknown category: {category}").into());
        }
        catalog.select_category(category);
    }

    let products = catalog.filtered_products();
    let mut out = std::io::stdout().lock();
    for product in &products {
        let card = ProductCardView::from(*product);
        writeln!(out, "{:>4}  {}", card.id, card.summary())?;
    }

    info!(
        count = products.len(),
        category = catalog.selected_category(),
        "Listed products"
    );
    Ok(())
}

/// List the latest store reviews.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub async fn reviews(storefront: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = ReviewsView::new();
    view.mount(storefront.gateway(), storefront.fetch_timeout())
        .await;

    let mut out = std::io::stdout().lock();
    if view.reviews().is_empty() {
        writeln!(out, "{}", view.render())?;
    }
    for review in view.reviews() {
        writeln!(out, "{}", ReviewView::from(review).summary())?;
    }

    info!(count = view.reviews().len(), "Listed reviews");
    Ok(())
}
