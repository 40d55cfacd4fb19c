//! Subcommand implementations.

pub mod catalog;
pub mod forms;
pub mod seed;

use tracing::info;

use sweet_dreams_storefront::Storefront;
use sweet_dreams_storefront::config::StorefrontConfig;
use sweet_dreams_storefront::content::DEFAULT_FETCH_TIMEOUT;
use sweet_dreams_storefront::forms::SubmitOutcome;
use sweet_dreams_storefront::gateway::MemoryGateway;

/// Open a storefront session.
///
/// Offline sessions run against an in-process gateway holding the bundled
/// demo data. Otherwise the hosted backend is configured from the
/// environment.
///
/// # Errors
///
/// Returns an error if configuration is missing or invalid, or if the
/// bundled data cannot be loaded.
pub async fn open(offline: bool) -> Result<Storefront, Box<dyn std::error::Error>> {
    if offline {
        let gateway = MemoryGateway::new();
        let rows = seed::load_bundled(&gateway).await?;
        info!(rows, "Using offline gateway with bundled demo data");
        return Ok(Storefront::in_memory(gateway, DEFAULT_FETCH_TIMEOUT).await);
    }

    let config = StorefrontConfig::from_env()?;
    Ok(Storefront::connect(&config).await)
}

/// Log a successful submission, or turn a rejected one into the command's
/// error.
fn finish(outcome: &SubmitOutcome) -> Result<(), Box<dyn std::error::Error>> {
    if outcome.is_success() {
        info!("{}", outcome.message());
        Ok(())
    } else {
        Err(outcome.message().into())
    }
}
