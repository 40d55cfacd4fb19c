//! Page views.
//!
//! Views own their load state and hand out plain view models with
//! display-ready strings. Everything a view renders ends up as a
//! [`SectionView`], which the binaries print as text.

pub mod account;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod contact;
pub mod home;
pub mod navigation;
pub mod reviews;

pub use account::AccountView;
pub use auth::{SignInPage, SignUpPage};
pub use cart::{CartItemView, CartPanel, CartView};
pub use catalog::{ALL_CATEGORIES, Catalog, ProductCardView, ProductList};
pub use contact::ContactView;
pub use home::HomePage;
pub use navigation::NavigationView;
pub use reviews::{ReviewList, ReviewView, ReviewsView};

use std::fmt;

/// Placeholder line shown while a section is loading.
pub const LOADING_TEXT: &str = "Loading...";

/// A rendered section: a heading and its lines of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub heading: String,
    pub lines: Vec<String>,
}

impl SectionView {
    #[must_use]
    pub fn new(heading: &str, lines: Vec<String>) -> Self {
        Self {
            heading: heading.to_string(),
            lines,
        }
    }

    /// The placeholder for a section whose content has not arrived.
    #[must_use]
    pub fn loading(section: &str) -> Self {
        Self::new(section, vec![LOADING_TEXT.to_string()])
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lines.len() == 1 && self.lines[0] == LOADING_TEXT
    }
}

impl fmt::Display for SectionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.heading)?;
        for line in &self.lines {
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let view = SectionView::new("Store Hours", vec!["Sunday: 10:00 AM - 6:00 PM".to_string()]);
        assert_eq!(
            view.to_string(),
            "== Store Hours ==\n  Sunday: 10:00 AM - 6:00 PM\n"
        );
    }

    #[test]
    fn test_loading() {
        assert!(SectionView::loading("hero").is_loading());
        assert!(!SectionView::new("hero", Vec::new()).is_loading());
    }
}
