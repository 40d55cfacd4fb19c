//! The landing page: every section of the storefront.

use sweet_dreams_core::ProductId;

use super::{Catalog, CartPanel, ContactView, NavigationView, ReviewsView, SectionView};
use crate::content::{About, ContentView, Hero};
use crate::forms::SubmitOutcome;
use crate::state::Storefront;

/// All sections of the landing page.
///
/// Each section fetches its own content when mounted. The fetches run
/// concurrently and do not wait on each other.
pub struct HomePage {
    storefront: Storefront,
    hero: ContentView<Hero>,
    about: ContentView<About>,
    catalog: Catalog,
    reviews: ReviewsView,
    contact: ContactView,
}

impl HomePage {
    #[must_use]
    pub fn new(storefront: Storefront) -> Self {
        Self {
            storefront,
            hero: ContentView::new(),
            about: ContentView::new(),
            catalog: Catalog::new(),
            reviews: ReviewsView::new(),
            contact: ContactView::new(),
        }
    }

    /// Mount every section.
    pub async fn mount(&mut self) {
        let gateway = self.storefront.gateway();
        let timeout = self.storefront.fetch_timeout();

        tokio::join!(
            self.hero.mount(gateway, timeout),
            self.about.mount(gateway, timeout),
            self.catalog.mount(gateway, timeout),
            self.reviews.mount(gateway, timeout),
            self.contact.mount(gateway, timeout),
        );
        tracing::debug!("Home page mounted");
    }

    #[must_use]
    pub const fn storefront(&self) -> &Storefront {
        &self.storefront
    }

    #[must_use]
    pub const fn hero(&self) -> &ContentView<Hero> {
        &self.hero
    }

    #[must_use]
    pub const fn about(&self) -> &ContentView<About> {
        &self.about
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    #[must_use]
    pub const fn reviews(&self) -> &ReviewsView {
        &self.reviews
    }

    pub fn reviews_mut(&mut self) -> &mut ReviewsView {
        &mut self.reviews
    }

    #[must_use]
    pub const fn contact(&self) -> &ContactView {
        &self.contact
    }

    pub fn contact_mut(&mut self) -> &mut ContactView {
        &mut self.contact
    }

    #[must_use]
    pub fn cart_panel(&self) -> CartPanel {
        CartPanel::new(self.storefront.cart().clone())
    }

    #[must_use]
    pub fn navigation(&self) -> NavigationView {
        NavigationView::new(self.storefront.cart(), self.storefront.session())
    }

    /// A product card's "Add to Cart" button.
    pub fn add_to_cart(&self, product_id: &ProductId) -> Option<String> {
        self.catalog.add_to_cart(self.storefront.cart(), product_id)
    }

    pub async fn submit_review(&mut self) -> SubmitOutcome {
        let storefront = self.storefront.clone();
        self.reviews
            .submit_review(
                storefront.gateway(),
                storefront.session(),
                storefront.fetch_timeout(),
            )
            .await
    }

    pub async fn submit_custom_order(&mut self) -> SubmitOutcome {
        self.contact
            .submit_custom_order(self.storefront.gateway())
            .await
    }

    /// Every section in page order. The cart panel is included while open.
    #[must_use]
    pub fn render(&self) -> Vec<SectionView> {
        let mut sections = vec![
            self.navigation().render(),
            self.hero.render(),
            self.catalog.render(),
            self.about.render(),
            self.reviews.render(),
        ];
        sections.extend(self.contact.render());
        if self.storefront.cart().is_open() {
            sections.push(self.cart_panel().render());
        }
        sections
    }
}
