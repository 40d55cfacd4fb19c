//! Content synchronization for the marketing sections.
//!
//! Every content-bearing view loads its slice the same way:
//!
//! 1. Mounting issues exactly one read for the slice
//! 2. While it is outstanding the view renders a loading placeholder
//! 3. A non-empty result is rendered as fetched
//! 4. An error, an empty result or a timeout is logged and the static
//!    fallback is rendered instead
//!
//! There is no retry, polling or shared cache. [`ContentView::reload`] is the
//! only way to fetch again.

mod sections;

pub use sections::{About, Feature, Hero, OpeningHours, SocialLink, SocialLinks, StoreInfo};

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::add_breadcrumb;
use crate::gateway::{Gateway, GatewayError, Query, Row};
use crate::views::SectionView;

/// Fetch timeout used when none is configured.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(8);

/// Where a view's content came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    /// The fetch is still outstanding.
    Loading,
    /// The fetch returned content.
    Loaded(T),
    /// The fetch failed, came back empty or timed out.
    Fallback(T),
}

impl<T> LoadState<T> {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// The content to show, fetched or fallback.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Loading => None,
            Self::Loaded(value) | Self::Fallback(value) => Some(value),
        }
    }

    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Loading => None,
            Self::Loaded(value) | Self::Fallback(value) => Some(value),
        }
    }
}

/// Run `fetch` with a deadline, substituting `fallback` on any failure.
///
/// `Ok(None)` means the fetch succeeded but found nothing to show. Failures
/// are logged and left as a Sentry breadcrumb; they are never returned.
pub async fn load_or_fallback<T, Fut>(
    section: &str,
    timeout: Duration,
    fetch: Fut,
    fallback: impl FnOnce() -> T,
) -> LoadState<T>
where
    Fut: Future<Output = Result<Option<T>, GatewayError>>,
{
    let reason = match tokio::time::timeout(timeout, fetch).await {
        Ok(Ok(Some(value))) => {
            debug!(section, "Content loaded");
            return LoadState::Loaded(value);
        }
        Ok(Ok(None)) => "empty result".to_string(),
        Ok(Err(e)) => e.to_string(),
        Err(_) => format!("timed out after {}ms", timeout.as_millis()),
    };

    warn!(section, reason = %reason, "Content fetch failed, using fallback");
    add_breadcrumb(
        "content",
        "Using fallback content",
        Some(&[("section", section), ("reason", &reason)]),
    );
    LoadState::Fallback(fallback())
}

/// One independently fetched piece of page content.
#[async_trait]
pub trait ContentSlice: Sized + Send + Sync + 'static {
    /// Name used in logs and as the loading heading.
    const SECTION: &'static str;

    /// The read that fetches this slice.
    fn query() -> Query;

    /// Turn the fetched rows into content. `Ok(None)` means nothing usable.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Parse` when a required row does not decode.
    fn decode(rows: Vec<Row>) -> Result<Option<Self>, GatewayError>;

    /// Fetch and decode the slice.
    ///
    /// # Errors
    ///
    /// Returns the gateway or decode failure.
    async fn fetch(gateway: &dyn Gateway) -> Result<Option<Self>, GatewayError> {
        let rows = gateway.select(&Self::query()).await?;
        Self::decode(rows)
    }

    /// Static content shown when the fetch fails.
    fn fallback() -> Self;

    /// Display-ready rendering.
    fn render(&self) -> SectionView;
}

/// A view over one [`ContentSlice`] with its load state.
#[derive(Debug)]
pub struct ContentView<S> {
    state: LoadState<S>,
    mounted: bool,
}

impl<S> Default for ContentView<S> {
    fn default() -> Self {
        Self {
            state: LoadState::Loading,
            mounted: false,
        }
    }
}

impl<S: ContentSlice> ContentView<S> {
    /// An unmounted view in the loading state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the slice. Only the first call fetches; later calls are no-ops.
    pub async fn mount(&mut self, gateway: &dyn Gateway, timeout: Duration) -> &LoadState<S> {
        if self.mounted {
            debug!(section = S::SECTION, "View already mounted, skipping fetch");
            return &self.state;
        }
        self.mounted = true;
        self.load(gateway, timeout).await
    }

    /// Fetch the slice again, showing the placeholder meanwhile.
    pub async fn reload(&mut self, gateway: &dyn Gateway, timeout: Duration) -> &LoadState<S> {
        self.mounted = true;
        self.load(gateway, timeout).await
    }

    async fn load(&mut self, gateway: &dyn Gateway, timeout: Duration) -> &LoadState<S> {
        self.state = LoadState::Loading;
        self.state = load_or_fallback(S::SECTION, timeout, S::fetch(gateway), S::fallback).await;
        &self.state
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState<S> {
        &self.state
    }

    #[must_use]
    pub const fn value(&self) -> Option<&S> {
        self.state.value()
    }

    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Render the content, or a placeholder while loading.
    #[must_use]
    pub fn render(&self) -> SectionView {
        self.state
            .value()
            .map_or_else(|| SectionView::loading(S::SECTION), ContentSlice::render)
    }
}
