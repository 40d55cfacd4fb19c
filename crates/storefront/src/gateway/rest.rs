//! HTTP gateway client.
//!
//! Talks to a hosted backend that exposes `PostgREST` under `/rest/v1` and
//! `GoTrue` under `/auth/v1`. Every request carries the anon key in the
//! `apikey` header; `Authorization` carries the user's access token once
//! signed in, and the anon key otherwise.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument};
use url::Url;

use sweet_dreams_core::{Email, UserId};

use super::{AuthGateway, Gateway, GatewayError, Query, Row};
use crate::config::GatewayConfig;
use crate::models::{Credentials, Registration, SessionIdentity, SignUpOutcome};

/// Client for the hosted data and auth APIs.
#[derive(Clone)]
pub struct RestGateway {
    inner: Arc<RestGatewayInner>,
}

struct RestGatewayInner {
    client: reqwest::Client,
    base_url: Url,
    anon_key: SecretString,
    access_token: RwLock<Option<SecretString>>,
}

/// `GoTrue` user object.
#[derive(Debug, Deserialize)]
struct UserResponse {
    id: UserId,
    email: Email,
    created_at: DateTime<Utc>,
}

impl From<UserResponse> for SessionIdentity {
    fn from(user: UserResponse) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// `GoTrue` session returned by the token endpoint (and by sign-up when
/// email confirmation is disabled).
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: UserResponse,
}

/// The fields different backends use for their error text.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
    }
}

impl RestGateway {
    /// Create a new gateway client.
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            inner: Arc::new(RestGatewayInner {
                client: reqwest::Client::new(),
                base_url: config.url.clone(),
                anon_key: config.anon_key.clone(),
                access_token: RwLock::new(None),
            }),
        }
    }

    /// Build `{base}/{segments...}`.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::Internal("gateway URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn bearer(&self) -> String {
        let token = self
            .inner
            .access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let value = token
            .as_ref()
            .map_or_else(|| self.inner.anon_key.expose_secret(), |t| t.expose_secret());
        format!("Bearer {value}")
    }

    fn set_access_token(&self, token: Option<String>) {
        *self
            .inner
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token.map(SecretString::from);
    }

    fn has_access_token(&self) -> bool {
        self.inner
            .access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.inner
            .client
            .request(method, url)
            .header("apikey", self.inner.anon_key.expose_secret())
            .header("Authorization", self.bearer())
    }

    /// Send a request and return the response body for success statuses.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, GatewayError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(ErrorBody::into_message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            tracing::debug!(status = %status, message = %message, "Gateway returned non-success status");
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    /// Send a request and parse the JSON response.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, GatewayError> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse gateway response"
            );
            GatewayError::Parse(e)
        })
    }
}

#[async_trait]
impl Gateway for RestGateway {
    #[instrument(skip(self), fields(table = %query.table_name()))]
    async fn select(&self, query: &Query) -> Result<Vec<Row>, GatewayError> {
        let mut url = self.endpoint(&["rest", "v1", query.table_name()])?;
        url.query_pairs_mut().extend_pairs(query.to_pairs());

        let rows: Vec<Row> = self
            .send_json(self.request(reqwest::Method::GET, url))
            .await?;
        debug!(rows = rows.len(), "Fetched rows");
        Ok(rows)
    }

    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<(), GatewayError> {
        let url = self.endpoint(&["rest", "v1", table])?;
        self.send(
            self.request(reqwest::Method::POST, url)
                .header("Prefer", "return=minimal")
                .json(&rows),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for RestGateway {
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn sign_in(&self, credentials: &Credentials) -> Result<SessionIdentity, GatewayError> {
        let mut url = self.endpoint(&["auth", "v1", "token"])?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let session: TokenResponse = self
            .send_json(self.request(reqwest::Method::POST, url).json(&json!({
                "email": credentials.email.as_str(),
                "password": credentials.password.expose_secret(),
            })))
            .await?;

        self.set_access_token(Some(session.access_token));
        Ok(session.user.into())
    }

    #[instrument(skip(self, registration), fields(email = %registration.email))]
    async fn sign_up(&self, registration: &Registration) -> Result<SignUpOutcome, GatewayError> {
        let url = self.endpoint(&["auth", "v1", "signup"])?;
        let body: Row = self
            .send_json(self.request(reqwest::Method::POST, url).json(&json!({
                "email": registration.email.as_str(),
                "password": registration.password.expose_secret(),
                "data": { "full_name": registration.full_name },
            })))
            .await?;

        // With email confirmation enabled the backend returns the bare user;
        // otherwise it returns a full session.
        if body.get("access_token").is_some() {
            let session: TokenResponse = serde_json::from_value(body)?;
            self.set_access_token(Some(session.access_token));
            Ok(SignUpOutcome::SignedIn(session.user.into()))
        } else {
            let user: UserResponse = serde_json::from_value(body)?;
            Ok(SignUpOutcome::PendingVerification { email: user.email })
        }
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<(), GatewayError> {
        if !self.has_access_token() {
            return Ok(());
        }
        let url = self.endpoint(&["auth", "v1", "logout"])?;
        let result = self.send(self.request(reqwest::Method::POST, url)).await;
        // The local token is dropped whether or not the backend accepted it.
        self.set_access_token(None);
        result.map(|_| ())
    }

    #[instrument(skip(self))]
    async fn current_session(&self) -> Result<Option<SessionIdentity>, GatewayError> {
        if !self.has_access_token() {
            return Ok(None);
        }
        let url = self.endpoint(&["auth", "v1", "user"])?;
        match self
            .send_json::<UserResponse>(self.request(reqwest::Method::GET, url))
            .await
        {
            Ok(user) => Ok(Some(user.into())),
            Err(GatewayError::Api { status: 401, .. }) => {
                self.set_access_token(None);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn gateway(base: &str) -> RestGateway {
        RestGateway::new(&GatewayConfig {
            url: Url::parse(base).unwrap(),
            anon_key: SecretString::from("anon-key"),
        })
    }

    #[test]
    fn test_endpoint_with_and_without_trailing_slash() {
        for base in ["https://db.example.com", "https://db.example.com/"] {
            let url = gateway(base).endpoint(&["rest", "v1", "products"]).unwrap();
            assert_eq!(url.as_str(), "https://db.example.com/rest/v1/products");
        }
    }

    #[test]
    fn test_bearer_prefers_access_token() {
        let gateway = gateway("https://db.example.com");
        assert_eq!(gateway.bearer(), "Bearer anon-key");

        gateway.set_access_token(Some("user-token".to_string()));
        assert_eq!(gateway.bearer(), "Bearer user-token");

        gateway.set_access_token(None);
        assert!(!gateway.has_access_token());
    }

    #[test]
    fn test_error_body_message_precedence() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        )
        .unwrap();
        assert_eq!(
            body.into_message().as_deref(),
            Some("Invalid login credentials")
        );

        let body: ErrorBody =
            serde_json::from_str(r#"{"code":422,"msg":"User already registered"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("User already registered"));
    }

    #[tokio::test]
    async fn test_sign_out_without_session_is_local() {
        let gateway = gateway("https://db.example.com");
        assert!(gateway.sign_out().await.is_ok());
        assert!(gateway.current_session().await.unwrap().is_none());
    }
}
