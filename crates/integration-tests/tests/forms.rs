//! Form validation and write failures, end to end.

#![allow(clippy::unwrap_used)]

use sweet_dreams_integration_tests::{seeded_gateway, storefront};
use sweet_dreams_storefront::forms::{CustomOrderInput, FormInput, SignUpInput, SubmitOutcome};
use sweet_dreams_storefront::views::{HomePage, SignUpPage};

fn custom_order() -> CustomOrderInput {
    CustomOrderInput {
        name: "Daniel Okafor".to_string(),
        email: "daniel@example.com".to_string(),
        phone: "555-0142".to_string(),
        message: "A tiered macaron tower for sixty guests".to_string(),
    }
}

#[tokio::test]
async fn test_custom_order_written_and_form_reset() {
    let gateway = seeded_gateway();
    let mut page = HomePage::new(storefront(&gateway).await);
    *page.contact_mut().form_mut().input_mut() = custom_order();

    let outcome = page.submit_custom_order().await;

    assert!(outcome.is_success());
    let rows = gateway.rows("custom_orders");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email"], "daniel@example.com");
    assert_eq!(rows[0]["message"], "A tiered macaron tower for sixty guests");
    assert_eq!(page.contact().form().input(), &CustomOrderInput::default());
}

#[tokio::test]
async fn test_custom_order_write_failure_keeps_input() {
    let gateway = seeded_gateway();
    gateway.fail_table("custom_orders");
    let mut page = HomePage::new(storefront(&gateway).await);
    *page.contact_mut().form_mut().input_mut() = custom_order();

    let outcome = page.submit_custom_order().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Failed("Failed to send your request. Please try again.".to_string())
    );
    assert_eq!(page.contact().form().input(), &custom_order());
    assert!(gateway.rows("custom_orders").is_empty());
}

#[tokio::test]
async fn test_custom_order_validation_messages() {
    let gateway = seeded_gateway();
    let mut page = HomePage::new(storefront(&gateway).await);
    let cases = [
        (CustomOrderInput { name: "  ".to_string(), ..custom_order() }, "Name is required"),
        (
            CustomOrderInput { name: "x".repeat(101), ..custom_order() },
            "Name must be less than 100 characters",
        ),
        (CustomOrderInput { email: "daniel".to_string(), ..custom_order() }, "Invalid email address"),
        (
            CustomOrderInput { phone: "5".repeat(31), ..custom_order() },
            "Phone must be less than 30 characters",
        ),
        (CustomOrderInput { message: String::new(), ..custom_order() }, "Message is required"),
        (
            CustomOrderInput { message: "m".repeat(1001), ..custom_order() },
            "Message must be less than 1000 characters",
        ),
    ];

    for (input, expected) in cases {
        *page.contact_mut().form_mut().input_mut() = input;
        let outcome = page.submit_custom_order().await;
        assert_eq!(outcome, SubmitOutcome::Invalid(expected.to_string()));
    }
    assert!(gateway.rows("custom_orders").is_empty());
}

#[test]
fn test_sign_up_collects_every_field_error() {
    let input = SignUpInput {
        full_name: "A".to_string(),
        email: "not-an-email".to_string(),
        password: "short".to_string(),
        confirm_password: "shorter".to_string(),
    };

    let errors = input.validate().unwrap_err();

    let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        [
            "Full name must be at least 2 characters",
            "Invalid email address",
            "Password must be at least 6 characters",
            "Passwords don't match",
        ]
    );
}

#[tokio::test]
async fn test_rejected_sign_up_writes_nothing() {
    let gateway = seeded_gateway();
    let storefront = storefront(&gateway).await;
    let mut page = SignUpPage::new();
    *page.form_mut().input_mut() = SignUpInput {
        full_name: "Lily Chen".to_string(),
        email: "lily@example.com".to_string(),
        password: "petals!".to_string(),
        confirm_password: "petal!".to_string(),
    };

    let outcome = page.submit(storefront.session()).await;

    assert_eq!(outcome, SubmitOutcome::Invalid("Passwords don't match".to_string()));
    assert!(gateway.rows("profiles").is_empty());
}
