//! Each section fetches once per mount and falls back on its own.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use serde_json::json;

use sweet_dreams_integration_tests::{FAST, catalog_rows, product_row, seeded_gateway, storefront};
use sweet_dreams_storefront::content::{About, ContentSlice, Hero, LoadState, SocialLinks, StoreInfo};
use sweet_dreams_storefront::gateway::MemoryGateway;
use sweet_dreams_storefront::views::{Catalog, HomePage, LOADING_TEXT};

const SECTION_TABLES: [&str; 5] = ["products", "site_content", "store_info", "social_links", "reviews"];

// ============================================================================
// Fetched content
// ============================================================================

#[tokio::test]
async fn test_seeded_sections_render_fetched_content() {
    let gateway = seeded_gateway();
    let mut page = HomePage::new(storefront(&gateway).await);

    page.mount().await;

    assert_eq!(page.hero().value().unwrap().title, "Fresh From the Oven");
    assert_eq!(page.about().value().unwrap().paragraphs, ["We bake.", "You enjoy."]);
    assert_eq!(page.contact().store_info().value().unwrap().address, "9 Sugar Row");
    let platforms: Vec<_> = page
        .contact()
        .social_links()
        .value()
        .unwrap()
        .links
        .iter()
        .map(|link| link.platform.as_str())
        .collect();
    assert_eq!(platforms, ["Facebook", "Instagram"]);
    assert_eq!(page.catalog().products().len(), 8);
}

#[tokio::test]
async fn test_null_metadata_keeps_fetched_hero() {
    let gateway = MemoryGateway::new().with_rows(
        "site_content",
        vec![json!({
            "section": "hero",
            "title": "Spring Sale",
            "subtitle": null,
            "content": "Everything half off.",
            "metadata": null
        })],
    );
    let mut page = HomePage::new(storefront(&gateway).await);

    page.mount().await;

    assert!(!page.hero().state().is_fallback());
    assert_eq!(page.hero().value().unwrap().title, "Spring Sale");
}

#[tokio::test]
async fn test_one_fetch_per_mount() {
    let gateway = seeded_gateway();
    let mut page = HomePage::new(storefront(&gateway).await);

    page.mount().await;
    page.mount().await;

    for table in SECTION_TABLES {
        let expected = if table == "site_content" { 2 } else { 1 };
        assert_eq!(gateway.select_count(table), expected, "{table}");
    }
}

#[tokio::test]
async fn test_unmounted_page_shows_placeholders() {
    let gateway = seeded_gateway();
    let page = HomePage::new(storefront(&gateway).await);

    let sections = page.render();

    assert!(sections.iter().skip(1).all(|section| section.is_loading()));
    assert_eq!(sections[1].lines, [LOADING_TEXT]);
    assert_eq!(gateway.select_count("products"), 0);
}

// ============================================================================
// Fallbacks
// ============================================================================

#[tokio::test]
async fn test_failing_tables_fall_back_exactly() {
    let gateway = seeded_gateway();
    for table in SECTION_TABLES {
        gateway.fail_table(table);
    }
    let mut page = HomePage::new(storefront(&gateway).await);

    page.mount().await;

    assert_eq!(page.hero().state(), &LoadState::Fallback(Hero::fallback()));
    assert_eq!(page.about().state(), &LoadState::Fallback(About::fallback()));
    assert_eq!(
        page.contact().store_info().state(),
        &LoadState::Fallback(StoreInfo::fallback())
    );
    assert_eq!(
        page.contact().social_links().state(),
        &LoadState::Fallback(SocialLinks::fallback())
    );
    assert_eq!(page.hero().render(), Hero::fallback().render());
    assert!(page.catalog().state().is_fallback());
    assert_eq!(page.catalog().products()[0].name, "French Macarons Set");
    assert!(page.reviews().reviews().is_empty());
}

#[tokio::test]
async fn test_hanging_table_times_out_to_fallback() {
    let gateway = seeded_gateway();
    gateway.hang_table("site_content");
    let mut page = HomePage::new(storefront(&gateway).await);

    tokio::time::timeout(Duration::from_secs(5), page.mount())
        .await
        .unwrap();

    assert_eq!(page.hero().state(), &LoadState::Fallback(Hero::fallback()));
    assert_eq!(page.about().state(), &LoadState::Fallback(About::fallback()));
    // The other sections are unaffected.
    assert!(matches!(page.catalog().state(), LoadState::Loaded(_)));
    assert!(matches!(page.contact().store_info().state(), LoadState::Loaded(_)));
}

#[tokio::test]
async fn test_empty_tables_fall_back() {
    let gateway = MemoryGateway::new();
    let mut page = HomePage::new(storefront(&gateway).await);

    page.mount().await;

    assert_eq!(page.hero().value(), Some(&Hero::fallback()));
    assert_eq!(page.catalog().products().len(), 8);
    assert!(page.render().iter().all(|section| !section.is_loading()));
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_category_filter_keeps_catalog_order() {
    let gateway = seeded_gateway();
    let mut catalog = Catalog::new();
    catalog.mount(&gateway, FAST).await;

    catalog.select_category("Macarons");

    let ids: Vec<_> = catalog
        .filtered_products()
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(ids, ["m1", "m2"]);
    assert_eq!(
        catalog.categories(),
        ["All", "Chocolates", "Macarons", "Cupcakes", "Gift Boxes"]
    );
    assert_eq!(catalog.product_count("All"), 8);

    catalog.select_category("All");
    assert_eq!(catalog.filtered_products().len(), 8);
}

#[tokio::test]
async fn test_invalid_product_rows_dropped() {
    let mut rows = catalog_rows();
    rows.push(product_row("bad", "Negative Nougat", "-3.00", "Chocolates", 9));
    rows.push(json!({"id": "nameless", "price": "4.00"}));
    let gateway = MemoryGateway::new().with_rows("products", rows);

    let mut catalog = Catalog::new();
    catalog.mount(&gateway, FAST).await;

    assert!(matches!(catalog.state(), LoadState::Loaded(_)));
    assert_eq!(catalog.products().len(), 8);
    assert!(catalog.products().iter().all(|p| p.id.as_str() != "bad"));
}

#[tokio::test]
async fn test_products_newest_last() {
    let mut rows = catalog_rows();
    rows.reverse();
    let gateway = MemoryGateway::new().with_rows("products", rows);

    let mut catalog = Catalog::new();
    catalog.mount(&gateway, FAST).await;

    assert_eq!(catalog.products().first().unwrap().id.as_str(), "c1");
    assert_eq!(catalog.products().last().unwrap().id.as_str(), "g2");
}
