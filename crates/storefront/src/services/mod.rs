//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Session store: sign in, sign up, sign out, observable identity

pub mod auth;
