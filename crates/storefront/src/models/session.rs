//! Session-related types.
//!
//! The signed-in identity published by the session store, and the inputs
//! handed to the auth gateway.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use sweet_dreams_core::{Email, UserId};

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// Gateway user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Validated sign-in input.
#[derive(Debug)]
pub struct Credentials {
    pub email: Email,
    pub password: SecretString,
}

/// Validated sign-up input.
#[derive(Debug)]
pub struct Registration {
    /// Trimmed full name, stored on the user's profile.
    pub full_name: String,
    pub email: Email,
    pub password: SecretString,
}

/// Result of a successful sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The account exists but the email must be confirmed before sign-in.
    PendingVerification { email: Email },
    /// The backend confirmed the account immediately and opened a session.
    SignedIn(SessionIdentity),
}
