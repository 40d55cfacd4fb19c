//! Customer forms submitted from the command line.
//!
//! Input goes through the same validation as the storefront's forms.

use sweet_dreams_storefront::Storefront;
use sweet_dreams_storefront::forms::{CustomOrderInput, SignUpInput};
use sweet_dreams_storefront::views::{ContactView, SignUpPage};

use super::finish;

/// Register a customer account.
///
/// # Errors
///
/// Returns the validation or backend message if the account is not created.
pub async fn sign_up(
    storefront: &Storefront,
    email: String,
    full_name: String,
    password: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = SignUpPage::new();
    *page.form_mut().input_mut() = SignUpInput {
        full_name,
        email,
        confirm_password: password.clone(),
        password,
    };

    finish(&page.submit(storefront.session()).await)
}

/// Submit a custom order request.
///
/// # Errors
///
/// Returns the validation message, or the failure notice if the request
/// could not be stored.
pub async fn custom_order(
    storefront: &Storefront,
    name: String,
    email: String,
    phone: Option<String>,
    message: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut contact = ContactView::new();
    *contact.form_mut().input_mut() = CustomOrderInput {
        name,
        email,
        phone: phone.unwrap_or_default(),
        message,
    };

    finish(&contact.submit_custom_order(storefront.gateway()).await)
}
