//! Orders and custom order requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sweet_dreams_core::{Email, OrderId, OrderStatus, Price, UserId};

/// A row from the `orders` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub order_number: String,
    pub total_amount: Price,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub price: Price,
}

/// Payload inserted into `custom_orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCustomOrder {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_order_with_items() {
        let order: Order = serde_json::from_value(json!({
            "id": "o-1",
            "user_id": "u-1",
            "order_number": "SW-2024-042",
            "total_amount": 45.99,
            "status": "completed",
            "items": [
                { "name": "Chocolate Truffles", "quantity": 2, "price": 15.99 }
            ],
            "created_at": "2024-02-10T09:30:00Z"
        }))
        .unwrap();

        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.total_amount.display(), "$45.99");
    }

    #[test]
    fn test_custom_order_phone_serializes_null() {
        let payload = serde_json::to_value(NewCustomOrder {
            name: "Rose".to_string(),
            email: Email::parse("rose@example.com").unwrap(),
            phone: None,
            message: "A three-tier wedding cake".to_string(),
        })
        .unwrap();

        assert_eq!(payload["email"], "rose@example.com");
        assert!(payload["phone"].is_null());
    }
}
