//! In-process gateway.
//!
//! Holds tables as JSON rows and accounts with argon2 password hashes. Used by
//! the test suites and by `sd-cli --offline`. Tables can be made to fail or to
//! hang so the fallback paths can be exercised.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use chrono::Utc;
use secrecy::ExposeSecret;
use serde_json::json;
use uuid::Uuid;

use sweet_dreams_core::{Email, UserId};

use super::{AuthGateway, Gateway, GatewayError, Query, Row};
use crate::models::{Credentials, Registration, SessionIdentity, SignUpOutcome};

/// Backend messages, matching what the hosted auth service sends.
const INVALID_LOGIN: &str = "Invalid login credentials";
const ALREADY_REGISTERED: &str = "User already registered";
const EMAIL_NOT_CONFIRMED: &str = "Email not confirmed";

/// In-memory gateway.
///
/// Cloning shares the same tables and accounts.
#[derive(Clone, Default)]
pub struct MemoryGateway {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    tables: HashMap<String, Vec<Row>>,
    failing: HashSet<String>,
    hanging: HashSet<String>,
    select_counts: HashMap<String, usize>,
    accounts: HashMap<Email, Account>,
    session: Option<SessionIdentity>,
    auto_confirm: bool,
    auth_failing: bool,
}

struct Account {
    identity: SessionIdentity,
    password_hash: String,
    confirmed: bool,
}

/// What a select should do once the lock is released.
enum SelectPlan {
    Rows(Vec<Row>),
    Fail,
    Hang,
}

impl MemoryGateway {
    /// Create an empty gateway. New accounts need email confirmation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append rows to a table, creating it if needed.
    pub fn seed(&self, table: &str, rows: impl IntoIterator<Item = Row>) {
        self.state()
            .tables
            .entry(table.to_string())
            .or_default()
            .extend(rows);
    }

    /// Builder form of [`seed`](Self::seed).
    #[must_use]
    pub fn with_rows(self, table: &str, rows: impl IntoIterator<Item = Row>) -> Self {
        self.seed(table, rows);
        self
    }

    /// Every row currently in `table`, in insertion order.
    #[must_use]
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.state().tables.get(table).cloned().unwrap_or_default()
    }

    /// Make reads and writes on `table` fail.
    pub fn fail_table(&self, table: &str) {
        self.state().failing.insert(table.to_string());
    }

    /// Make reads on `table` never complete.
    pub fn hang_table(&self, table: &str) {
        self.state().hanging.insert(table.to_string());
    }

    /// Undo [`fail_table`](Self::fail_table) and [`hang_table`](Self::hang_table).
    pub fn restore_table(&self, table: &str) {
        let mut state = self.state();
        state.failing.remove(table);
        state.hanging.remove(table);
    }

    /// Number of selects issued against `table`.
    #[must_use]
    pub fn select_count(&self, table: &str) -> usize {
        self.state().select_counts.get(table).copied().unwrap_or(0)
    }

    /// Confirm new accounts immediately and open a session on sign-up.
    pub fn set_auto_confirm(&self, auto_confirm: bool) {
        self.state().auto_confirm = auto_confirm;
    }

    /// Make every auth call fail as if the backend were down.
    pub fn set_auth_failing(&self, failing: bool) {
        self.state().auth_failing = failing;
    }

    /// Mark an account's email as confirmed. Returns false for unknown emails.
    pub fn confirm_email(&self, email: &Email) -> bool {
        match self.state().accounts.get_mut(email) {
            Some(account) => {
                account.confirmed = true;
                true
            }
            None => false,
        }
    }

    /// Register a confirmed account directly, bypassing sign-up.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Internal` if the password cannot be hashed.
    pub fn create_account(
        &self,
        email: Email,
        password: &str,
        full_name: &str,
    ) -> Result<SessionIdentity, GatewayError> {
        let identity = SessionIdentity {
            id: UserId::new(Uuid::new_v4().to_string()),
            email,
            created_at: Utc::now(),
        };
        let password_hash = hash_password(password)?;

        let mut state = self.state();
        insert_profile(&mut state, &identity, full_name);
        state.accounts.insert(
            identity.email.clone(),
            Account {
                identity: identity.clone(),
                password_hash,
                confirmed: true,
            },
        );
        Ok(identity)
    }

    fn check_auth(&self) -> Result<(), GatewayError> {
        if self.state().auth_failing {
            return Err(GatewayError::Unavailable("auth service unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn select(&self, query: &Query) -> Result<Vec<Row>, GatewayError> {
        let table = query.table_name();
        let plan = {
            let mut state = self.state();
            *state.select_counts.entry(table.to_string()).or_insert(0) += 1;
            if state.hanging.contains(table) {
                SelectPlan::Hang
            } else if state.failing.contains(table) {
                SelectPlan::Fail
            } else {
                let rows = state.tables.get(table).map(Vec::as_slice).unwrap_or_default();
                SelectPlan::Rows(query.apply(rows))
            }
        };

        match plan {
            SelectPlan::Rows(rows) => Ok(rows),
            SelectPlan::Fail => Err(GatewayError::Unavailable(format!(
                "table {table} is unavailable"
            ))),
            SelectPlan::Hang => {
                std::future::pending::<()>().await;
                Err(GatewayError::Internal("pending future resolved".to_string()))
            }
        }
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<(), GatewayError> {
        let mut state = self.state();
        if state.failing.contains(table) {
            return Err(GatewayError::Unavailable(format!(
                "table {table} is unavailable"
            )));
        }

        let stored = rows
            .into_iter()
            .map(|row| match row {
                Row::Object(mut fields) => {
                    fields
                        .entry("id")
                        .or_insert_with(|| json!(Uuid::new_v4().to_string()));
                    fields
                        .entry("created_at")
                        .or_insert_with(|| json!(Utc::now().to_rfc3339()));
                    Ok(Row::Object(fields))
                }
                other => Err(GatewayError::Api {
                    status: 400,
                    message: format!("expected a JSON object, got {other}"),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Every row is checked before the table is touched.
        state
            .tables
            .entry(table.to_string())
            .or_default()
            .extend(stored);
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for MemoryGateway {
    async fn sign_in(&self, credentials: &Credentials) -> Result<SessionIdentity, GatewayError> {
        self.check_auth()?;
        let mut state = self.state();
        let account = state
            .accounts
            .get(&credentials.email)
            .ok_or_else(|| rejected(INVALID_LOGIN))?;

        if !verify_password(credentials.password.expose_secret(), &account.password_hash) {
            return Err(rejected(INVALID_LOGIN));
        }
        if !account.confirmed {
            return Err(rejected(EMAIL_NOT_CONFIRMED));
        }

        let identity = account.identity.clone();
        state.session = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_up(&self, registration: &Registration) -> Result<SignUpOutcome, GatewayError> {
        self.check_auth()?;
        if self.state().accounts.contains_key(&registration.email) {
            return Err(GatewayError::Api {
                status: 422,
                message: ALREADY_REGISTERED.to_string(),
            });
        }

        // Hash outside the lock.
        let password_hash = hash_password(registration.password.expose_secret())?;
        let identity = SessionIdentity {
            id: UserId::new(Uuid::new_v4().to_string()),
            email: registration.email.clone(),
            created_at: Utc::now(),
        };

        let mut state = self.state();
        if state.accounts.contains_key(&registration.email) {
            return Err(GatewayError::Api {
                status: 422,
                message: ALREADY_REGISTERED.to_string(),
            });
        }
        let confirmed = state.auto_confirm;
        // The hosted backend creates the profile row from sign-up metadata.
        insert_profile(&mut state, &identity, &registration.full_name);
        state.accounts.insert(
            identity.email.clone(),
            Account {
                identity: identity.clone(),
                password_hash,
                confirmed,
            },
        );

        if confirmed {
            state.session = Some(identity.clone());
            Ok(SignUpOutcome::SignedIn(identity))
        } else {
            Ok(SignUpOutcome::PendingVerification {
                email: identity.email,
            })
        }
    }

    async fn sign_out(&self) -> Result<(), GatewayError> {
        self.check_auth()?;
        self.state().session = None;
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<SessionIdentity>, GatewayError> {
        self.check_auth()?;
        Ok(self.state().session.clone())
    }
}

fn rejected(message: &str) -> GatewayError {
    GatewayError::Api {
        status: 400,
        message: message.to_string(),
    }
}

fn insert_profile(state: &mut MemoryState, identity: &SessionIdentity, full_name: &str) {
    state
        .tables
        .entry("profiles".to_string())
        .or_default()
        .push(json!({
            "id": Uuid::new_v4().to_string(),
            "user_id": identity.id.as_str(),
            "full_name": full_name,
            "created_at": identity.created_at.to_rfc3339(),
        }));
}

/// Argon2id with small parameters; these hashes never leave the process.
fn hasher() -> Result<Argon2<'static>, GatewayError> {
    let params = Params::new(1024, 1, 1, None)
        .map_err(|e| GatewayError::Internal(format!("argon2 params: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn hash_password(password: &str) -> Result<String, GatewayError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| GatewayError::Internal(format!("password hashing failed: {e}")))
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    hasher().is_ok_and(|argon2| argon2.verify_password(password.as_bytes(), &parsed).is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;
    use crate::gateway::Direction;

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: Email::parse(email).unwrap(),
            password: SecretString::from(password),
        }
    }

    fn registration(email: &str) -> Registration {
        Registration {
            full_name: "Rose Baker".to_string(),
            email: Email::parse(email).unwrap(),
            password: SecretString::from("sugar-rush"),
        }
    }

    #[tokio::test]
    async fn test_select_applies_query_and_counts() {
        let gateway = MemoryGateway::new().with_rows(
            "social_links",
            [
                json!({"platform": "Instagram", "sort_order": 2}),
                json!({"platform": "Facebook", "sort_order": 1}),
            ],
        );

        let rows = gateway
            .select(&Query::table("social_links").order("sort_order", Direction::Ascending))
            .await
            .unwrap();
        assert_eq!(rows[0]["platform"], "Facebook");
        assert_eq!(gateway.select_count("social_links"), 1);
        assert_eq!(gateway.select_count("products"), 0);
    }

    #[tokio::test]
    async fn test_failing_table() {
        let gateway = MemoryGateway::new();
        gateway.fail_table("products");
        assert!(gateway.select(&Query::table("products")).await.is_err());
        assert!(gateway.insert("products", vec![json!({})]).await.is_err());

        gateway.restore_table("products");
        assert!(gateway.select(&Query::table("products")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hanging_table_never_resolves() {
        let gateway = MemoryGateway::new();
        gateway.hang_table("site_content");
        let result = tokio::time::timeout(
            Duration::from_millis(20),
            gateway.select(&Query::table("site_content")),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_insert_fills_id_and_timestamp() {
        let gateway = MemoryGateway::new();
        gateway
            .insert("custom_orders", vec![json!({"name": "Rose"})])
            .await
            .unwrap();

        let rows = gateway.rows("custom_orders");
        assert_eq!(rows.len(), 1);
        assert!(rows[0]["id"].is_string());
        assert!(rows[0]["created_at"].is_string());
    }

    #[tokio::test]
    async fn test_insert_is_all_or_nothing() {
        let gateway = MemoryGateway::new();
        let result = gateway
            .insert("reviews", vec![json!({"rating": 5}), json!("not a row")])
            .await;
        assert!(result.is_err());
        assert!(gateway.rows("reviews").is_empty());
    }

    #[tokio::test]
    async fn test_sign_up_requires_confirmation() {
        let gateway = MemoryGateway::new();
        let outcome = gateway.sign_up(&registration("rose@example.com")).await.unwrap();
        assert!(matches!(outcome, SignUpOutcome::PendingVerification { .. }));

        let err = gateway
            .sign_in(&credentials("rose@example.com", "sugar-rush"))
            .await
            .unwrap_err();
        assert_eq!(err.backend_message(), Some(EMAIL_NOT_CONFIRMED));

        assert!(gateway.confirm_email(&Email::parse("rose@example.com").unwrap()));
        let identity = gateway
            .sign_in(&credentials("rose@example.com", "sugar-rush"))
            .await
            .unwrap();
        assert_eq!(gateway.current_session().await.unwrap(), Some(identity));
    }

    #[tokio::test]
    async fn test_sign_up_creates_profile() {
        let gateway = MemoryGateway::new();
        gateway.set_auto_confirm(true);
        let SignUpOutcome::SignedIn(identity) =
            gateway.sign_up(&registration("rose@example.com")).await.unwrap()
        else {
            panic!("expected an open session");
        };

        let profiles = gateway.rows("profiles");
        assert_eq!(profiles[0]["user_id"], identity.id.as_str());
        assert_eq!(profiles[0]["full_name"], "Rose Baker");
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_rejected() {
        let gateway = MemoryGateway::new();
        gateway.sign_up(&registration("rose@example.com")).await.unwrap();
        let err = gateway
            .sign_up(&registration("rose@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.backend_message(), Some(ALREADY_REGISTERED));
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let gateway = MemoryGateway::new();
        gateway
            .create_account(Email::parse("rose@example.com").unwrap(), "sugar-rush", "Rose")
            .unwrap();
        let err = gateway
            .sign_in(&credentials("rose@example.com", "salt-rush"))
            .await
            .unwrap_err();
        assert_eq!(err.backend_message(), Some(INVALID_LOGIN));
    }
}
