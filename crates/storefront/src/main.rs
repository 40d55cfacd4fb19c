//! Sweet Dreams storefront - text rendering of the landing page.
//!
//! Connects to the hosted backend, mounts every section of the landing page
//! and prints it. Sections whose content cannot be fetched show their
//! built-in copy.
//!
//! # Architecture
//!
//! - `PostgREST`-style data API and `GoTrue`-style auth API via `reqwest`
//! - Cart and session held in memory for the lifetime of the process
//! - Sentry for error tracking, `tracing` for logs

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::process::ExitCode;

use sweet_dreams_storefront::Storefront;
use sweet_dreams_storefront::config::StorefrontConfig;
use sweet_dreams_storefront::error::AppError;
use sweet_dreams_storefront::telemetry::{init_sentry, init_tracing};
use sweet_dreams_storefront::views::HomePage;

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration from environment (needed for Sentry init)
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = writeln!(std::io::stderr(), "Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.log_format, "sweet_dreams_storefront=info");

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            let _ = writeln!(std::io::stderr(), "{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &StorefrontConfig) -> Result<(), AppError> {
    let storefront = Storefront::connect(config).await;
    let mut page = HomePage::new(storefront.clone());
    page.mount().await;

    let mut out = std::io::stdout().lock();
    for section in page.render() {
        writeln!(out, "{section}")?;
    }

    storefront.shutdown();
    tracing::info!("Storefront session closed");
    Ok(())
}
