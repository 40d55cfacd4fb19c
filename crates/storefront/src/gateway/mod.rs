//! Remote data gateway: table reads and writes plus authentication.
//!
//! # Architecture
//!
//! - The backend is a hosted `PostgREST` / `GoTrue` service; this crate owns no
//!   storage and no protocol of its own
//! - [`Gateway`] covers table access, [`AuthGateway`] covers accounts
//! - [`RestGateway`] speaks HTTP via `reqwest`, [`MemoryGateway`] keeps
//!   everything in process for tests and offline runs
//!
//! # Example
//!
//! ```rust,ignore
//! use sweet_dreams_storefront::gateway::{Direction, Gateway, Query};
//!
//! let rows = gateway
//!     .select(&Query::table("reviews").is_null("product_id").order("created_at", Direction::Descending).limit(10))
//!     .await?;
//! ```

mod memory;
mod query;
mod rest;

pub use memory::MemoryGateway;
pub use query::{Direction, Filter, Order, Query};
pub use rest::RestGateway;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{Credentials, Registration, SessionIdentity, SignUpOutcome};

/// A row as returned by the gateway: a JSON object keyed by column.
pub type Row = serde_json::Value;

/// Errors that can occur when talking to the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    ///
    /// `message` is the backend's own reason text when it sent one.
    #[error("gateway returned {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid gateway URL.
    #[error("invalid gateway URL: {0}")]
    Url(#[from] url::ParseError),

    /// The backend could not be reached or refused the table.
    #[error("gateway unavailable: {0}")]
    Unavailable(String),

    /// Unexpected internal failure.
    #[error("internal gateway error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// The backend's reason text for rejected requests.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Table-style access to the backend.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Fetch every row matching `query`.
    async fn select(&self, query: &Query) -> Result<Vec<Row>, GatewayError>;

    /// Fetch at most one row matching `query`.
    async fn select_maybe_single(&self, query: &Query) -> Result<Option<Row>, GatewayError> {
        let rows = self.select(&query.clone().limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    /// Insert rows into `table`. The insert is a single request.
    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<(), GatewayError>;
}

/// Account operations on the backend.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Sign in with email and password, opening a session.
    async fn sign_in(&self, credentials: &Credentials) -> Result<SessionIdentity, GatewayError>;

    /// Create an account. The full name goes into the user's profile.
    async fn sign_up(&self, registration: &Registration) -> Result<SignUpOutcome, GatewayError>;

    /// Close the current session on the backend.
    async fn sign_out(&self) -> Result<(), GatewayError>;

    /// Look up the session that is currently open, if any.
    async fn current_session(&self) -> Result<Option<SessionIdentity>, GatewayError>;
}

/// Decode rows one by one, dropping the ones that fail.
///
/// Each dropped row is logged with its position and the decode error.
pub fn decode_rows<T: DeserializeOwned>(table: &str, rows: Vec<Row>) -> Vec<T> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(table, index, error = %e, "Dropping invalid row");
                None
            }
        })
        .collect()
}

/// Decode a single row.
///
/// # Errors
///
/// Returns `GatewayError::Parse` if the row does not match `T`.
pub fn decode_row<T: DeserializeOwned>(row: Row) -> Result<T, GatewayError> {
    Ok(serde_json::from_value(row)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Stock {
        name: String,
        count: u32,
    }

    #[test]
    fn test_decode_rows_drops_invalid() {
        let rows = vec![
            json!({"name": "macarons", "count": 3}),
            json!({"name": "truffles", "count": -1}),
            json!({"name": "cupcakes", "count": 0}),
        ];

        let decoded: Vec<Stock> = decode_rows("stock", rows);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[1].name, "cupcakes");
    }

    #[test]
    fn test_backend_message() {
        let err = GatewayError::Api {
            status: 400,
            message: "Invalid login credentials".to_string(),
        };
        assert_eq!(err.backend_message(), Some("Invalid login credentials"));
        assert_eq!(
            GatewayError::Unavailable("down".to_string()).backend_message(),
            None
        );
    }
}
