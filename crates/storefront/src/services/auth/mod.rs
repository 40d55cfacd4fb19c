//! Session store.
//!
//! Holds the signed-in identity and publishes every change over a
//! `tokio::sync::watch` channel. Views read [`SessionStore::current`] or keep a
//! receiver from [`SessionStore::subscribe`]. The store has an explicit
//! lifecycle: [`SessionStore::start`] looks up the existing session once and
//! [`SessionStore::shutdown`] closes the channel.

mod error;

pub use error::AuthError;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use secrecy::ExposeSecret;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::gateway::AuthGateway;
use crate::models::{Credentials, Registration, SessionIdentity, SignUpOutcome};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

type IdentitySender = watch::Sender<Option<SessionIdentity>>;

/// Observable holder of the current identity.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    auth: Arc<dyn AuthGateway>,
    sender: Mutex<Option<IdentitySender>>,
    receiver: watch::Receiver<Option<SessionIdentity>>,
}

impl SessionStore {
    /// Start the store, picking up a session the backend already has open.
    ///
    /// A failed lookup is logged and the store starts signed out.
    pub async fn start(auth: Arc<dyn AuthGateway>) -> Self {
        let initial = match auth.current_session().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Session lookup failed, starting signed out");
                None
            }
        };

        if let Some(identity) = &initial {
            set_sentry_user(&identity.id, Some(identity.email.as_str()));
            info!(user_id = %identity.id, "Resumed session");
        }

        let (sender, receiver) = watch::channel(initial);
        Self {
            inner: Arc::new(SessionStoreInner {
                auth,
                sender: Mutex::new(Some(sender)),
                receiver,
            }),
        }
    }

    /// The signed-in identity, if any.
    #[must_use]
    pub fn current(&self) -> Option<SessionIdentity> {
        self.inner.receiver.borrow().clone()
    }

    /// Whether someone is signed in.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.inner.receiver.borrow().is_some()
    }

    /// Receive every identity change.
    ///
    /// After [`shutdown`](Self::shutdown), `changed()` on the receiver
    /// returns an error.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionIdentity>> {
        self.inner.receiver.clone()
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender().is_none()
    }

    /// Sign in and publish the identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` with the backend's reason when the
    /// credentials are refused, `AuthError::Gateway` when the backend cannot
    /// be reached, and `AuthError::SessionClosed` after shutdown.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<SessionIdentity, AuthError> {
        self.ensure_open()?;
        let identity = self.inner.auth.sign_in(credentials).await?;

        self.publish(Some(identity.clone()))?;
        set_sentry_user(&identity.id, Some(identity.email.as_str()));
        add_breadcrumb("auth", "Signed in", None);
        info!(user_id = %identity.id, "Signed in");
        Ok(identity)
    }

    /// Create an account.
    ///
    /// When the backend opens a session right away the identity is published.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password is too short,
    /// `AuthError::Rejected` with the backend's reason (e.g. the email is
    /// already registered), `AuthError::Gateway` when the backend cannot be
    /// reached, and `AuthError::SessionClosed` after shutdown.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn sign_up(&self, registration: &Registration) -> Result<SignUpOutcome, AuthError> {
        self.ensure_open()?;
        validate_password(registration.password.expose_secret())?;

        let outcome = self.inner.auth.sign_up(registration).await?;
        match &outcome {
            SignUpOutcome::SignedIn(identity) => {
                self.publish(Some(identity.clone()))?;
                set_sentry_user(&identity.id, Some(identity.email.as_str()));
                info!(user_id = %identity.id, "Signed up and signed in");
            }
            SignUpOutcome::PendingVerification { .. } => {
                info!("Signed up, waiting for email confirmation");
            }
        }
        add_breadcrumb("auth", "Signed up", None);
        Ok(outcome)
    }

    /// Sign out.
    ///
    /// The local identity is cleared even when the backend call fails; that
    /// failure is returned afterwards.
    ///
    /// # Errors
    ///
    /// Returns the backend failure, or `AuthError::SessionClosed` after
    /// shutdown.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.ensure_open()?;
        let result = self.inner.auth.sign_out().await;

        self.publish(None)?;
        clear_sentry_user();
        add_breadcrumb("auth", "Signed out", None);

        result.map_err(|e| {
            warn!(error = %e, "Backend sign-out failed; local session cleared");
            AuthError::from(e)
        })
    }

    /// Tear the store down.
    ///
    /// Publishes a signed-out state, then closes the channel. Later
    /// operations fail with `AuthError::SessionClosed`.
    pub fn shutdown(&self) {
        if let Some(sender) = self.sender().take() {
            sender.send_replace(None);
            clear_sentry_user();
            info!("Session store shut down");
        }
    }

    fn sender(&self) -> MutexGuard<'_, Option<IdentitySender>> {
        self.inner
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_open(&self) -> Result<(), AuthError> {
        if self.is_closed() {
            return Err(AuthError::SessionClosed);
        }
        Ok(())
    }

    fn publish(&self, identity: Option<SessionIdentity>) -> Result<(), AuthError> {
        let sender = self.sender();
        let sender = sender.as_ref().ok_or(AuthError::SessionClosed)?;
        sender.send_replace(identity);
        Ok(())
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}
