//! Top navigation bar.

use crate::cart::CartStore;
use crate::services::auth::SessionStore;

use super::SectionView;

/// In-page anchors, in display order.
pub const NAV_LINKS: [(&str, &str); 4] = [
    ("Home", "#home"),
    ("Products", "#products"),
    ("About", "#about"),
    ("Contact", "#contact"),
];

/// What the account corner offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountLinks {
    /// Profile and sign-out.
    SignedIn { email: String },
    /// Sign-in and register.
    SignedOut,
}

/// Navigation display data, derived from the cart and the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationView {
    /// Hidden (`None`) when the cart is empty.
    pub cart_badge: Option<u64>,
    pub cart_open: bool,
    pub account: AccountLinks,
}

impl NavigationView {
    #[must_use]
    pub fn new(cart: &CartStore, session: &SessionStore) -> Self {
        let state = cart.snapshot();
        let count = state.total_items();
        Self {
            cart_badge: (count > 0).then_some(count),
            cart_open: state.is_open(),
            account: session.current().map_or(AccountLinks::SignedOut, |identity| {
                AccountLinks::SignedIn {
                    email: identity.email.into_inner(),
                }
            }),
        }
    }

    #[must_use]
    pub fn render(&self) -> SectionView {
        let mut links: Vec<String> = NAV_LINKS.iter().map(|(name, _)| (*name).to_string()).collect();
        links.push(match self.cart_badge {
            Some(count) => format!("Cart ({count})"),
            None => "Cart".to_string(),
        });
        match &self.account {
            AccountLinks::SignedIn { email } => {
                links.push(format!("Profile ({email})"));
                links.push("Sign Out".to_string());
            }
            AccountLinks::SignedOut => {
                links.push("Sign In".to_string());
                links.push("Register".to_string());
            }
        }
        SectionView::new("Sweet Dreams", vec![links.join(" | ")])
    }
}
