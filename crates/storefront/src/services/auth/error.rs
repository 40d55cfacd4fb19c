//! Authentication error types.

use thiserror::Error;

use crate::gateway::GatewayError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] sweet_dreams_core::EmailError),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// The backend refused the request; the text is the backend's reason.
    #[error("{0}")]
    Rejected(String),

    /// The backend could not be reached.
    #[error("gateway error: {0}")]
    Gateway(GatewayError),

    /// The session store has been shut down.
    #[error("session store is shut down")]
    SessionClosed,
}

impl From<GatewayError> for AuthError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Api { message, .. } => Self::Rejected(message),
            other => Self::Gateway(other),
        }
    }
}

impl AuthError {
    /// Message safe to show to the person signing in.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidEmail(_) => "Invalid email address".to_string(),
            Self::WeakPassword(msg) | Self::Rejected(msg) => msg.clone(),
            Self::Gateway(_) => {
                "We couldn't reach the sign-in service. Please try again.".to_string()
            }
            Self::SessionClosed => "Your session has ended. Please reload.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_rejection_keeps_backend_text() {
        let err = AuthError::from(GatewayError::Api {
            status: 400,
            message: "Invalid login credentials".to_string(),
        });
        assert!(matches!(err, AuthError::Rejected(_)));
        assert_eq!(err.user_message(), "Invalid login credentials");
    }

    #[test]
    fn test_transport_failure_is_generic() {
        let err = AuthError::from(GatewayError::Unavailable("timeout".to_string()));
        assert!(matches!(err, AuthError::Gateway(_)));
        assert!(!err.user_message().contains("timeout"));
    }
}
