//! Domain models for the storefront.
//!
//! Records decoded from gateway rows, and the payloads written back to it.

pub mod order;
pub mod product;
pub mod profile;
pub mod review;
pub mod session;

pub use order::{NewCustomOrder, Order, OrderItem};
pub use product::{CartProduct, Product};
pub use profile::Profile;
pub use review::{NewReview, Review};
pub use session::{Credentials, Registration, SessionIdentity, SignUpOutcome};
