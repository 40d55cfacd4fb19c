//! Client state shared across views.

use std::sync::Arc;
use std::time::Duration;

use crate::cart::CartStore;
use crate::config::StorefrontConfig;
use crate::gateway::{AuthGateway, Gateway, MemoryGateway, RestGateway};
use crate::services::auth::SessionStore;

/// Everything a client session shares: the gateway, the cart and the
/// session.
///
/// This struct is cheaply cloneable via `Arc`. Every clone sees the same
/// cart and the same signed-in identity.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    gateway: Arc<dyn Gateway>,
    cart: CartStore,
    session: SessionStore,
    fetch_timeout: Duration,
}

impl Storefront {
    /// Start a client session over the given backends.
    ///
    /// Looks up any session the auth backend already has open.
    pub async fn start(
        gateway: Arc<dyn Gateway>,
        auth: Arc<dyn AuthGateway>,
        fetch_timeout: Duration,
    ) -> Self {
        let session = SessionStore::start(auth).await;
        Self {
            inner: Arc::new(StorefrontInner {
                gateway,
                cart: CartStore::new(),
                session,
                fetch_timeout,
            }),
        }
    }

    /// Start against the hosted backend described by `config`.
    pub async fn connect(config: &StorefrontConfig) -> Self {
        let rest = RestGateway::new(&config.gateway);
        tracing::info!(url = %config.gateway.url, "Connecting to gateway");
        Self::start(Arc::new(rest.clone()), Arc::new(rest), config.fetch_timeout).await
    }

    /// Start against an in-process gateway.
    pub async fn in_memory(gateway: MemoryGateway, fetch_timeout: Duration) -> Self {
        Self::start(Arc::new(gateway.clone()), Arc::new(gateway), fetch_timeout).await
    }

    #[must_use]
    pub fn gateway(&self) -> &dyn Gateway {
        self.inner.gateway.as_ref()
    }

    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Upper bound for each content fetch.
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        self.inner.fetch_timeout
    }

    /// End the client session. The cart is left as it is.
    pub fn shutdown(&self) {
        self.inner.session.shutdown();
    }
}
