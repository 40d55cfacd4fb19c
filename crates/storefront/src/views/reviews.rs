//! Customer reviews section.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{error, warn};

use sweet_dreams_core::UserId;

use super::SectionView;
use crate::content::{ContentSlice, ContentView, LoadState};
use crate::forms::{FormState, ReviewInput, SubmitOutcome};
use crate::gateway::{Direction, Gateway, GatewayError, Query, Row, decode_row, decode_rows};
use crate::models::review::ANONYMOUS_AUTHOR;
use crate::models::{NewReview, Profile, Review};
use crate::services::auth::SessionStore;

/// Most reviews shown at once.
pub const REVIEW_LIMIT: usize = 10;

const NO_REVIEWS: &str = "No reviews yet. Be the first to share your experience!";
const LOGIN_REQUIRED: &str = "Please log in to submit a review.";
const REVIEW_THANKS: &str = "Thank you for your feedback!";
const REVIEW_FAILED: &str = "Failed to submit review. Please try again.";

/// Latest general store reviews, newest first, with author names resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewList(pub Vec<Review>);

/// The author's display name, or "Anonymous" when the profile is missing,
/// blank or cannot be read.
async fn author_name(gateway: &dyn Gateway, user_id: &UserId) -> String {
    let query = Query::table("profiles").eq("user_id", user_id);
    let profile = match gateway.select_maybe_single(&query).await {
        Ok(row) => row.map(decode_row::<Profile>).transpose(),
        Err(e) => Err(e),
    };

    match profile {
        Ok(profile) => profile
            .as_ref()
            .and_then(Profile::display_name)
            .unwrap_or(ANONYMOUS_AUTHOR)
            .to_string(),
        Err(e) => {
            warn!(%user_id, error = %e, "Profile lookup failed, showing review as anonymous");
            ANONYMOUS_AUTHOR.to_string()
        }
    }
}

#[async_trait]
impl ContentSlice for ReviewList {
    const SECTION: &'static str = "reviews";

    fn query() -> Query {
        Query::table("reviews")
            .is_null("product_id")
            .order("created_at", Direction::Descending)
            .limit(REVIEW_LIMIT)
    }

    /// No reviews is a valid answer, not a failure.
    fn decode(rows: Vec<Row>) -> Result<Option<Self>, GatewayError> {
        Ok(Some(Self(decode_rows(Self::SECTION, rows))))
    }

    async fn fetch(gateway: &dyn Gateway) -> Result<Option<Self>, GatewayError> {
        let rows = gateway.select(&Self::query()).await?;
        let Some(Self(mut reviews)) = Self::decode(rows)? else {
            return Ok(None);
        };
        let names = join_all(
            reviews
                .iter()
                .map(|review| author_name(gateway, &review.user_id)),
        )
        .await;
        for (review, name) in reviews.iter_mut().zip(names) {
            review.author_name = name;
        }
        Ok(Some(Self(reviews)))
    }

    fn fallback() -> Self {
        Self::default()
    }

    fn render(&self) -> SectionView {
        let lines = if self.0.is_empty() {
            vec![NO_REVIEWS.to_string()]
        } else {
            self.0
                .iter()
                .map(|review| ReviewView::from(review).summary())
                .collect()
        };
        SectionView::new("What Our Customers Say", lines)
    }
}

/// Review card display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewView {
    pub stars: String,
    pub comment: String,
    pub author: String,
    pub date: String,
}

impl ReviewView {
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} \"{}\" - {}, {}",
            self.stars, self.comment, self.author, self.date
        )
    }
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            stars: review.rating.as_stars(),
            comment: review.comment.clone(),
            author: review.author_name.clone(),
            date: review.created_at.format("%b %-d, %Y").to_string(),
        }
    }
}

/// The reviews list plus the submission form.
#[derive(Debug, Default)]
pub struct ReviewsView {
    list: ContentView<ReviewList>,
    form: FormState<ReviewInput>,
}

impl ReviewsView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mount(&mut self, gateway: &dyn Gateway, timeout: Duration) {
        self.list.mount(gateway, timeout).await;
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState<ReviewList> {
        self.list.state()
    }

    /// Reviews on screen. Empty while loading.
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        self.list
            .value()
            .map(|list| list.0.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub const fn form(&self) -> &FormState<ReviewInput> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState<ReviewInput> {
        &mut self.form
    }

    /// Write the form as a general review by the signed-in user.
    ///
    /// Signed-out visitors get a log-in prompt. On success the list is
    /// fetched again so the new review shows.
    pub async fn submit_review(
        &mut self,
        gateway: &dyn Gateway,
        session: &SessionStore,
        timeout: Duration,
    ) -> SubmitOutcome {
        let Some(identity) = session.current() else {
            return self.form.reject(LOGIN_REQUIRED).clone();
        };

        let outcome = self
            .form
            .submit(|draft| async move {
                let review = NewReview {
                    user_id: identity.id,
                    rating: draft.rating,
                    comment: draft.comment,
                    product_id: None,
                };
                write_review(gateway, &review)
                    .await
                    .map(|()| REVIEW_THANKS.to_string())
                    .map_err(|e| {
                        error!(error = %e, "Failed to submit review");
                        REVIEW_FAILED.to_string()
                    })
            })
            .await
            .clone();

        if outcome.is_success() {
            self.list.reload(gateway, timeout).await;
        }
        outcome
    }

    #[must_use]
    pub fn render(&self) -> SectionView {
        self.list.render()
    }
}

async fn write_review(gateway: &dyn Gateway, review: &NewReview) -> Result<(), GatewayError> {
    let row = serde_json::to_value(review)?;
    gateway.insert("reviews", vec![row]).await
}
