//! Sign-in and registration pages.

use crate::forms::{FormState, SignInInput, SignUpInput, SubmitOutcome};
use crate::models::SignUpOutcome;
use crate::services::auth::SessionStore;

const WELCOME_BACK: &str = "Welcome back!";
const VERIFY_EMAIL: &str = "Please check your email to verify your account, then you can log in.";
const WELCOME: &str = "Welcome to Sweet Dreams!";

#[derive(Debug, Default)]
pub struct SignInPage {
    form: FormState<SignInInput>,
}

impl SignInPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn form(&self) -> &FormState<SignInInput> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState<SignInInput> {
        &mut self.form
    }

    /// Sign in with the form's credentials.
    ///
    /// A rejection shows the backend's reason.
    pub async fn submit(&mut self, session: &SessionStore) -> SubmitOutcome {
        self.form
            .submit(|credentials| async move {
                session
                    .sign_in(&credentials)
                    .await
                    .map(|_| WELCOME_BACK.to_string())
                    .map_err(|e| e.user_message())
            })
            .await
            .clone()
    }
}

#[derive(Debug, Default)]
pub struct SignUpPage {
    form: FormState<SignUpInput>,
}

impl SignUpPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn form(&self) -> &FormState<SignUpInput> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState<SignUpInput> {
        &mut self.form
    }

    /// Create the account.
    ///
    /// Most backends ask for email confirmation first; the confirmation
    /// message says so.
    pub async fn submit(&mut self, session: &SessionStore) -> SubmitOutcome {
        self.form
            .submit(|registration| async move {
                match session.sign_up(&registration).await {
                    Ok(SignUpOutcome::PendingVerification { .. }) => Ok(VERIFY_EMAIL.to_string()),
                    Ok(SignUpOutcome::SignedIn(_)) => Ok(WELCOME.to_string()),
                    Err(e) => Err(e.user_message()),
                }
            })
            .await
            .clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use sweet_dreams_core::Email;

    use super::*;
    use crate::gateway::MemoryGateway;

    async fn session() -> (MemoryGateway, SessionStore) {
        let gateway = MemoryGateway::new();
        gateway
            .create_account(Email::parse("rose@example.com").unwrap(), "sugar-rush", "Rose")
            .unwrap();
        let session = SessionStore::start(Arc::new(gateway.clone())).await;
        (gateway, session)
    }

    fn sign_up_input(email: &str) -> SignUpInput {
        SignUpInput {
            full_name: "Lily".to_string(),
            email: email.to_string(),
            password: "petals!".to_string(),
            confirm_password: "petals!".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_welcomes_back() {
        let (_, session) = session().await;
        let mut page = SignInPage::new();
        *page.form_mut().input_mut() = SignInInput {
            email: "rose@example.com".to_string(),
            password: "sugar-rush".to_string(),
        };

        let outcome = page.submit(&session).await;

        assert_eq!(outcome, SubmitOutcome::Submitted(WELCOME_BACK.to_string()));
        assert!(session.is_signed_in());
    }

    #[tokio::test]
    async fn test_sign_in_shows_backend_reason() {
        let (_, session) = session().await;
        let mut page = SignInPage::new();
        *page.form_mut().input_mut() = SignInInput {
            email: "rose@example.com".to_string(),
            password: "not-my-password".to_string(),
        };

        let outcome = page.submit(&session).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed("Invalid login credentials".to_string())
        );
        assert_eq!(page.form().input().email, "rose@example.com");
    }

    #[tokio::test]
    async fn test_sign_up_pending_verification() {
        let (_, session) = session().await;
        let mut page = SignUpPage::new();
        *page.form_mut().input_mut() = sign_up_input("lily@example.com");

        let outcome = page.submit(&session).await;

        assert_eq!(outcome, SubmitOutcome::Submitted(VERIFY_EMAIL.to_string()));
        assert!(!session.is_signed_in());
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email() {
        let (_, session) = session().await;
        let mut page = SignUpPage::new();
        *page.form_mut().input_mut() = sign_up_input("rose@example.com");

        let outcome = page.submit(&session).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed("User already registered".to_string())
        );
    }
}
