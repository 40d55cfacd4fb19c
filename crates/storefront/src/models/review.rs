//! Customer reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sweet_dreams_core::{ProductId, Rating, ReviewId, UserId};

/// Author name shown when a review's profile is missing or has no name.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// A review row from the `reviews` table, joined with its author's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    pub rating: Rating,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    /// Filled in from `profiles` after the row is fetched.
    #[serde(skip_deserializing, default = "anonymous")]
    pub author_name: String,
}

fn anonymous() -> String {
    ANONYMOUS_AUTHOR.to_string()
}

/// Payload inserted into `reviews`.
///
/// `product_id` serializes as `null`, marking a general store review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewReview {
    pub user_id: UserId,
    pub rating: Rating,
    pub comment: String,
    pub product_id: Option<ProductId>,
}
