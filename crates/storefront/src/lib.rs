//! Sweet Dreams storefront library.
//!
//! Client-side logic for the confectionery storefront: the shopping cart,
//! the signed-in session, content sections that fall back to static copy,
//! the product catalog and the customer forms. Persistence and accounts
//! live behind the [`gateway`] traits.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod content;
pub mod error;
pub mod forms;
pub mod gateway;
pub mod models;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod views;

pub use cart::CartStore;
pub use services::auth::SessionStore;
pub use state::Storefront;
