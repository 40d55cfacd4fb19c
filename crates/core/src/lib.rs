//! Sweet Dreams Core - Shared value types.
//!
//! This crate provides the value types used across the Sweet Dreams components:
//! - `storefront` - Storefront client library (cart, content, catalog, accounts)
//! - `cli` - Operator command-line tools (seeding, listing, submissions)
//!
//! # Architecture
//!
//! The core crate contains only types and their validation rules - no I/O, no
//! gateway access, no HTTP clients. Anything that crosses the gateway boundary
//! is parsed into one of these types first, so invalid values (negative prices,
//! out-of-range ratings, malformed emails) never reach the cart or the views.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, ratings, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
