//! Contact section: store info, social links and the custom order form.

use std::time::Duration;

use tracing::{error, info};

use super::SectionView;
use crate::content::{ContentView, SocialLinks, StoreInfo};
use crate::forms::{CustomOrderInput, FormState, SubmitOutcome};
use crate::gateway::{Gateway, GatewayError};
use crate::models::NewCustomOrder;

const ORDER_SENT: &str = "Thank you! We'll be in touch about your custom order soon.";
const ORDER_FAILED: &str = "Failed to send your request. Please try again.";

/// Store info, social links and the custom order form.
#[derive(Debug, Default)]
pub struct ContactView {
    store_info: ContentView<StoreInfo>,
    social_links: ContentView<SocialLinks>,
    form: FormState<CustomOrderInput>,
}

impl ContactView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch store info and social links independently.
    pub async fn mount(&mut self, gateway: &dyn Gateway, timeout: Duration) {
        tokio::join!(
            self.store_info.mount(gateway, timeout),
            self.social_links.mount(gateway, timeout),
        );
    }

    #[must_use]
    pub const fn store_info(&self) -> &ContentView<StoreInfo> {
        &self.store_info
    }

    #[must_use]
    pub const fn social_links(&self) -> &ContentView<SocialLinks> {
        &self.social_links
    }

    #[must_use]
    pub const fn form(&self) -> &FormState<CustomOrderInput> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState<CustomOrderInput> {
        &mut self.form
    }

    /// Validate the form and write it to `custom_orders`.
    pub async fn submit_custom_order(&mut self, gateway: &dyn Gateway) -> SubmitOutcome {
        self.form
            .submit(|order| async move {
                match write_custom_order(gateway, &order).await {
                    Ok(()) => {
                        info!(email_domain = order.email.domain(), "Custom order received");
                        Ok(ORDER_SENT.to_string())
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to submit custom order");
                        Err(ORDER_FAILED.to_string())
                    }
                }
            })
            .await
            .clone()
    }

    /// Store info then social links.
    #[must_use]
    pub fn render(&self) -> Vec<SectionView> {
        vec![self.store_info.render(), self.social_links.render()]
    }
}

/// Insert one custom order request.
///
/// # Errors
///
/// Returns the gateway failure; nothing is written in that case.
pub async fn write_custom_order(
    gateway: &dyn Gateway,
    order: &NewCustomOrder,
) -> Result<(), GatewayError> {
    let row = serde_json::to_value(order)?;
    gateway.insert("custom_orders", vec![row]).await
}
