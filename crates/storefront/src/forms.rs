//! Form input, validation and submission.
//!
//! Each form has a raw input struct holding what the customer typed. Its
//! [`FormInput::validate`] either produces the validated payload or the list
//! of violated constraints. [`FormState::submit`] runs validation, hands the
//! payload to a writer and keeps the outcome for display:
//!
//! - invalid input: the first violation's message, nothing written
//! - failed write: the writer's message, input kept for another try
//! - success: the writer's confirmation, input reset

use std::fmt;
use std::future::Future;

use secrecy::SecretString;

use sweet_dreams_core::{Email, Rating};

use crate::models::{Credentials, NewCustomOrder, Registration};
use crate::services::auth::MIN_PASSWORD_LENGTH;

/// Longest accepted customer name.
pub const MAX_NAME_LENGTH: usize = 100;
/// Longest accepted phone number.
pub const MAX_PHONE_LENGTH: usize = 30;
/// Longest accepted order message or review comment.
pub const MAX_MESSAGE_LENGTH: usize = 1000;
/// Shortest accepted full name on sign-up.
pub const MIN_FULL_NAME_LENGTH: usize = 2;

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Violations in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first violation, which is the one shown.
    #[must_use]
    pub fn first(&self) -> Option<&FieldError> {
        self.0.first()
    }

    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.first().map(|e| e.message.as_str())
    }

    /// Violations for one field.
    pub fn for_field(&self, field: &str) -> impl Iterator<Item = &FieldError> {
        self.0.iter().filter(move |e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(valid())` when nothing was violated, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` when it holds any violation.
    pub fn finish<T>(self, valid: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(valid())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.first_message().unwrap_or("invalid input"))
    }
}

impl std::error::Error for FieldErrors {}

/// Raw form input that can be validated into a payload.
pub trait FormInput: Default {
    type Valid;

    /// Check every constraint.
    ///
    /// # Errors
    ///
    /// Returns every violated constraint in field order.
    fn validate(&self) -> Result<Self::Valid, FieldErrors>;
}

/// What the last submission did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was written.
    Invalid(String),
    /// The write failed; the input was kept.
    Failed(String),
    /// The write succeeded; the input was reset.
    Submitted(String),
}

impl SubmitOutcome {
    /// Message to show the customer.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Invalid(msg) | Self::Failed(msg) | Self::Submitted(msg) => msg,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

/// A form's input plus the outcome of its last submission.
#[derive(Debug, Default)]
pub struct FormState<F> {
    input: F,
    outcome: Option<SubmitOutcome>,
}

impl<F: FormInput> FormState<F> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn input(&self) -> &F {
        &self.input
    }

    /// Edit the input. Clears the previous outcome.
    pub fn input_mut(&mut self) -> &mut F {
        self.outcome = None;
        &mut self.input
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<&SubmitOutcome> {
        self.outcome.as_ref()
    }

    /// Refuse the submission before validation, e.g. when a sign-in is
    /// required. The input is kept.
    pub fn reject(&mut self, message: impl Into<String>) -> &SubmitOutcome {
        self.outcome.insert(SubmitOutcome::Invalid(message.into()))
    }

    /// Validate, then write.
    ///
    /// `write` returns the confirmation to show on success, or the message to
    /// show on failure.
    pub async fn submit<W, Fut>(&mut self, write: W) -> &SubmitOutcome
    where
        W: FnOnce(F::Valid) -> Fut,
        Fut: Future<Output = Result<String, String>>,
    {
        let outcome = match self.input.validate() {
            Err(errors) => {
                tracing::debug!(error = %errors, "Form input rejected");
                SubmitOutcome::Invalid(errors.to_string())
            }
            Ok(valid) => match write(valid).await {
                Ok(confirmation) => {
                    self.input = F::default();
                    SubmitOutcome::Submitted(confirmation)
                }
                Err(message) => SubmitOutcome::Failed(message),
            },
        };
        self.outcome.insert(outcome)
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn check_email(errors: &mut FieldErrors, raw: &str) -> Option<Email> {
    match Email::parse(raw) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.push("email", "Invalid email address");
            None
        }
    }
}

fn check_password(errors: &mut FieldErrors, password: &str) {
    if char_len(password) < MIN_PASSWORD_LENGTH {
        errors.push(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        );
    }
}

// =============================================================================
// Custom order
// =============================================================================

/// The contact section's custom order request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomOrderInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl FormInput for CustomOrderInput {
    type Valid = NewCustomOrder;

    fn validate(&self) -> Result<NewCustomOrder, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("name", "Name is required");
        } else if char_len(name) > MAX_NAME_LENGTH {
            errors.push("name", "Name must be less than 100 characters");
        }

        let email = check_email(&mut errors, &self.email);

        let phone = self.phone.trim();
        if char_len(phone) > MAX_PHONE_LENGTH {
            errors.push("phone", "Phone must be less than 30 characters");
        }

        let message = self.message.trim();
        if message.is_empty() {
            errors.push("message", "Message is required");
        } else if char_len(message) > MAX_MESSAGE_LENGTH {
            errors.push("message", "Message must be less than 1000 characters");
        }

        match email {
            Some(email) => errors.finish(|| NewCustomOrder {
                name: name.to_string(),
                email,
                phone: (!phone.is_empty()).then(|| phone.to_string()),
                message: message.to_string(),
            }),
            None => Err(errors),
        }
    }
}

// =============================================================================
// Review
// =============================================================================

/// A validated review before the author is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub rating: Rating,
    pub comment: String,
}

/// The reviews section's submission form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewInput {
    pub rating: i64,
    pub comment: String,
}

impl Default for ReviewInput {
    fn default() -> Self {
        Self {
            rating: i64::from(Rating::default().stars()),
            comment: String::new(),
        }
    }
}

impl FormInput for ReviewInput {
    type Valid = ReviewDraft;

    fn validate(&self) -> Result<ReviewDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let rating = Rating::new(self.rating).ok();
        if rating.is_none() {
            errors.push("rating", "Rating must be between 1 and 5");
        }

        let comment = self.comment.trim();
        if comment.is_empty() {
            errors.push("comment", "Your review comment cannot be empty.");
        } else if char_len(comment) > MAX_MESSAGE_LENGTH {
            errors.push("comment", "Comment must be less than 1000 characters");
        }

        match rating {
            Some(rating) => errors.finish(|| ReviewDraft {
                rating,
                comment: comment.to_string(),
            }),
            None => Err(errors),
        }
    }
}

// =============================================================================
// Sign in / sign up
// =============================================================================

/// The login page form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

impl FormInput for SignInInput {
    type Valid = Credentials;

    fn validate(&self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);

        match email {
            Some(email) => errors.finish(|| Credentials {
                email,
                password: SecretString::from(self.password.clone()),
            }),
            None => Err(errors),
        }
    }
}

/// The registration page form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl FormInput for SignUpInput {
    type Valid = Registration;

    fn validate(&self) -> Result<Registration, FieldErrors> {
        let mut errors = FieldErrors::new();

        let full_name = self.full_name.trim();
        if char_len(full_name) < MIN_FULL_NAME_LENGTH {
            errors.push("full_name", "Full name must be at least 2 characters");
        }
        let email = check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);
        if self.password != self.confirm_password {
            errors.push("confirm_password", "Passwords don't match");
        }

        match email {
            Some(email) => errors.finish(|| Registration {
                full_name: full_name.to_string(),
                email,
                password: SecretString::from(self.password.clone()),
            }),
            None => Err(errors),
        }
    }
}
