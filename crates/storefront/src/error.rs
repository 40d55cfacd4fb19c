//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for the binaries. Gateway and internal
//! errors are captured to Sentry when reported; the text shown to people comes
//! from [`AppError::user_message`], which never exposes internal details.

use thiserror::Error;

use crate::config::ConfigError;
use crate::gateway::GatewayError;
use crate::services::auth::AuthError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Gateway operation failed.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Whether this error should be reported to Sentry.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        matches!(
            self,
            Self::Gateway(_) | Self::Io(_) | Self::Auth(AuthError::Gateway(_))
        )
    }

    /// Capture reportable errors to Sentry and log them.
    pub fn report(&self) {
        if self.is_reportable() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Operation failed"
            );
        } else {
            tracing::warn!(error = %self, "Operation rejected");
        }
    }

    /// Message safe to show to a customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(_) | Self::Io(_) => {
                "Something went wrong on our side. Please try again.".to_string()
            }
            Self::Gateway(_) => {
                "We couldn't reach the shop right now. Please try again.".to_string()
            }
            Self::Auth(err) => err.user_message(),
        }
    }
}

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on sign-out to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions and degraded content.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Auth(AuthError::SessionClosed);
        assert!(err.to_string().starts_with("Auth error: "));

        let err = AppError::Io(std::io::Error::other("broken pipe"));
        assert_eq!(err.to_string(), "I/O error: broken pipe");
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = AppError::Gateway(GatewayError::Unavailable(
            "connection refused 10.0.0.4:5432".to_string(),
        ));
        assert!(!err.user_message().contains("10.0.0.4"));

        let err = AppError::Io(std::io::Error::other("stdout closed"));
        assert!(!err.user_message().contains("stdout"));
    }

    #[test]
    fn test_user_message_keeps_auth_text() {
        let err = AppError::Auth(AuthError::SessionClosed);
        assert_eq!(err.user_message(), AuthError::SessionClosed.user_message());
    }

    #[test]
    fn test_reportable() {
        assert!(AppError::Io(std::io::Error::other("x")).is_reportable());
        assert!(
            AppError::Gateway(GatewayError::Unavailable("down".to_string())).is_reportable()
        );
        assert!(!AppError::Auth(AuthError::SessionClosed).is_reportable());
    }
}
