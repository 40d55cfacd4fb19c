//! Account page: profile and order history of the signed-in user.

use std::time::Duration;

use tracing::{debug, warn};

use sweet_dreams_core::UserId;

use super::SectionView;
use crate::content::{LoadState, load_or_fallback};
use crate::gateway::{Direction, Gateway, GatewayError, Query, decode_row, decode_rows};
use crate::models::{Order, Profile, SessionIdentity};
use crate::services::auth::SessionStore;

const NOT_PROVIDED: &str = "Not provided";
const NO_ORDERS: &str = "No orders yet";
const START_SHOPPING: &str = "Start shopping to see your orders here!";
const SIGNED_OUT: &str = "Signed out successfully";
const SIGN_OUT_FAILED: &str = "Failed to sign out. Please try again.";

async fn fetch_profile(
    gateway: &dyn Gateway,
    user_id: &UserId,
) -> Result<Option<Option<Profile>>, GatewayError> {
    let query = Query::table("profiles").eq("user_id", user_id);
    let row = gateway.select_maybe_single(&query).await?;
    Ok(Some(row.map(decode_row).transpose()?))
}

async fn fetch_orders(
    gateway: &dyn Gateway,
    user_id: &UserId,
) -> Result<Option<Vec<Order>>, GatewayError> {
    let query = Query::table("orders")
        .eq("user_id", user_id)
        .order("created_at", Direction::Descending);
    let rows = gateway.select(&query).await?;
    Ok(Some(decode_rows("orders", rows)))
}

/// Order history row display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderView {
    pub order_number: String,
    pub date: String,
    pub status: String,
    pub total: String,
    pub items: Vec<String>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            order_number: order.order_number.clone(),
            date: order.created_at.format("%b %-d, %Y").to_string(),
            status: order.status.to_string(),
            total: order.total_amount.display(),
            items: order
                .items
                .iter()
                .map(|item| format!("{} x{} {}", item.name, item.quantity, item.price))
                .collect(),
        }
    }
}

/// The signed-in customer's profile and order history.
///
/// Nothing is fetched while signed out.
#[derive(Debug, Default)]
pub struct AccountView {
    identity: Option<SessionIdentity>,
    profile: Option<LoadState<Option<Profile>>>,
    orders: Option<LoadState<Vec<Order>>>,
}

impl AccountView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load profile and orders for whoever is signed in.
    ///
    /// Signed-out visitors get nothing fetched. Each load falls back on its
    /// own: no name, no orders.
    pub async fn mount(&mut self, gateway: &dyn Gateway, session: &SessionStore, timeout: Duration) {
        let Some(identity) = session.current() else {
            debug!("Account view mounted while signed out");
            *self = Self::default();
            return;
        };

        let (profile, orders) = tokio::join!(
            load_or_fallback("profile", timeout, fetch_profile(gateway, &identity.id), || None),
            load_or_fallback("orders", timeout, fetch_orders(gateway, &identity.id), Vec::new),
        );

        self.identity = Some(identity);
        self.profile = Some(profile);
        self.orders = Some(orders);
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.identity.is_some()
    }

    /// Profile name, or "Not provided".
    #[must_use]
    pub fn full_name(&self) -> &str {
        self.profile
            .as_ref()
            .and_then(LoadState::value)
            .and_then(Option::as_ref)
            .and_then(Profile::display_name)
            .unwrap_or(NOT_PROVIDED)
    }

    /// Orders, newest first.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        self.orders
            .as_ref()
            .and_then(LoadState::value)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Sign out and hide the page.
    ///
    /// The page is cleared even when the backend call fails.
    pub async fn sign_out(&mut self, session: &SessionStore) -> String {
        *self = Self::default();
        match session.sign_out().await {
            Ok(()) => SIGNED_OUT.to_string(),
            Err(e) => {
                warn!(error = %e, "Sign-out reported a failure");
                SIGN_OUT_FAILED.to_string()
            }
        }
    }

    #[must_use]
    pub fn render(&self) -> SectionView {
        let Some(identity) = &self.identity else {
            return SectionView::new(
                "My Account",
                vec!["Please log in to view your account.".to_string()],
            );
        };

        let mut lines = vec![
            format!("Full Name: {}", self.full_name()),
            format!("Email: {}", identity.email),
            format!("Member Since: {}", identity.created_at.format("%b %-d, %Y")),
        ];

        let orders = self.orders();
        if orders.is_empty() {
            lines.push(NO_ORDERS.to_string());
            lines.push(START_SHOPPING.to_string());
        } else {
            for order in orders.iter().map(OrderView::from) {
                lines.push(format!(
                    "Order {} ({}) {} {}",
                    order.order_number, order.date, order.status, order.total
                ));
                lines.extend(order.items.into_iter().map(|item| format!("  {item}")));
            }
        }
        SectionView::new("My Account", lines)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use sweet_dreams_core::Email;

    use super::*;
    use crate::gateway::{AuthGateway, MemoryGateway};
    use crate::models::Credentials;

    const SHORT: Duration = Duration::from_millis(50);

    async fn signed_in(gateway: &MemoryGateway, full_name: &str) -> (UserId, SessionStore) {
        let email = Email::parse("rose@example.com").unwrap();
        let identity = gateway
            .create_account(email.clone(), "sugar-rush", full_name)
            .unwrap();
        gateway
            .sign_in(&Credentials {
                email,
                password: "sugar-rush".into(),
            })
            .await
            .unwrap();
        let session = SessionStore::start(Arc::new(gateway.clone())).await;
        (identity.id, session)
    }

    fn order_row(user_id: &UserId, number: &str, created_at: &str) -> serde_json::Value {
        json!({
            "id": number,
            "user_id": user_id.as_str(),
            "order_number": number,
            "total_amount": 32.5,
            "status": "completed",
            "items": [{"name": "Vanilla Cupcakes", "quantity": 4, "price": 12}],
            "created_at": created_at
        })
    }

    #[tokio::test]
    async fn test_hidden_when_signed_out() {
        let gateway = MemoryGateway::new();
        let session = SessionStore::start(Arc::new(gateway.clone())).await;

        let mut view = AccountView::new();
        view.mount(&gateway, &session, SHORT).await;

        assert!(!view.is_visible());
        assert_eq!(gateway.select_count("orders"), 0);
    }

    #[tokio::test]
    async fn test_profile_and_orders_newest_first() {
        let gateway = MemoryGateway::new();
        let (user_id, session) = signed_in(&gateway, "Rose Petal").await;
        gateway.seed(
            "orders",
            vec![
                order_row(&user_id, "SW-2024-001", "2024-01-01T00:00:00Z"),
                order_row(&user_id, "SW-2024-002", "2024-02-01T00:00:00Z"),
                order_row(&UserId::new("someone-else"), "SW-2024-003", "2024-03-01T00:00:00Z"),
            ],
        );

        let mut view = AccountView::new();
        view.mount(&gateway, &session, SHORT).await;

        assert_eq!(view.full_name(), "Rose Petal");
        let numbers: Vec<_> = view.orders().iter().map(|o| o.order_number.as_str()).collect();
        assert_eq!(numbers, ["SW-2024-002", "SW-2024-001"]);
        assert!(view.render().lines.contains(&"  Vanilla Cupcakes x4 $12.00".to_string()));
    }

    #[tokio::test]
    async fn test_fallbacks_when_tables_fail() {
        let gateway = MemoryGateway::new();
        let (_, session) = signed_in(&gateway, "Rose").await;
        gateway.fail_table("profiles");
        gateway.fail_table("orders");

        let mut view = AccountView::new();
        view.mount(&gateway, &session, SHORT).await;

        assert_eq!(view.full_name(), NOT_PROVIDED);
        let lines = view.render().lines;
        assert!(lines.contains(&START_SHOPPING.to_string()));
    }

    #[tokio::test]
    async fn test_sign_out_hides_page() {
        let gateway = MemoryGateway::new();
        let (_, session) = signed_in(&gateway, "Rose").await;

        let mut view = AccountView::new();
        view.mount(&gateway, &session, SHORT).await;
        let message = view.sign_out(&session).await;

        assert_eq!(message, SIGNED_OUT);
        assert!(!view.is_visible());
        assert!(!session.is_signed_in());
    }
}
