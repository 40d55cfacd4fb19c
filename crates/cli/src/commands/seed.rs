//! Seed the gateway from a YAML file.
//!
//! The file maps table names to lists of rows. Every row is checked before
//! anything is written, so a bad file leaves the backend untouched.

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;
use tracing::{error, info};

use sweet_dreams_core::Rating;
use sweet_dreams_storefront::config::GatewayConfig;
use sweet_dreams_storefront::gateway::{
    Gateway, GatewayError, MemoryGateway, RestGateway, Row, decode_row,
};
use sweet_dreams_storefront::models::Product;

/// Demo data shipped with the CLI, used by `--offline`.
pub const BUNDLED_SEED: &str = include_str!("../../seed/sweet-dreams.yaml");

/// Tables the storefront reads or writes.
const KNOWN_TABLES: &[&str] = &[
    "custom_orders",
    "orders",
    "products",
    "profiles",
    "reviews",
    "site_content",
    "social_links",
    "store_info",
];

/// Table name to rows, inserted in table-name order.
pub type SeedData = BTreeMap<String, Vec<Row>>;

/// A problem found while validating seed data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeedIssue {
    #[error("unknown table `{0}`")]
    UnknownTable(String),

    #[error("{table} row {index}: expected a mapping")]
    NotAMapping { table: String, index: usize },

    #[error("{table} row {index}: {message}")]
    InvalidRow {
        table: String,
        index: usize,
        message: String,
    },
}

/// Parse seed YAML.
///
/// # Errors
///
/// Returns the YAML error if the document is not a map of row lists.
pub fn parse(content: &str) -> Result<SeedData, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

/// Check every row without touching the gateway.
///
/// Products must decode as catalog products and reviews must carry a
/// rating from one to five.
#[must_use]
pub fn validate(data: &SeedData) -> Vec<SeedIssue> {
    let mut issues = Vec::new();

    for (table, rows) in data {
        if !KNOWN_TABLES.contains(&table.as_str()) {
            issues.push(SeedIssue::UnknownTable(table.clone()));
            continue;
        }

        for (index, row) in rows.iter().enumerate() {
            if !row.is_object() {
                issues.push(SeedIssue::NotAMapping {
                    table: table.clone(),
                    index,
                });
                continue;
            }

            if let Err(message) = check_row(table, row) {
                issues.push(SeedIssue::InvalidRow {
                    table: table.clone(),
                    index,
                    message,
                });
            }
        }
    }

    issues
}

fn check_row(table: &str, row: &Row) -> Result<(), String> {
    match table {
        "products" => decode_row::<Product>(row.clone())
            .map(|_| ())
            .map_err(|e| e.to_string()),
        "reviews" => {
            let rating = row.get("rating").ok_or("rating is required")?;
            serde_json::from_value::<Rating>(rating.clone())
                .map(|_| ())
                .map_err(|e| e.to_string())
        }
        _ => Ok(()),
    }
}

/// Insert every table's rows, one request per table.
///
/// Returns the number of rows written.
///
/// # Errors
///
/// Stops at the first table the gateway rejects. Tables before it stay
/// written.
pub async fn apply(gateway: &dyn Gateway, data: SeedData) -> Result<usize, GatewayError> {
    let mut inserted = 0;
    for (table, rows) in data {
        if rows.is_empty() {
            continue;
        }
        let count = rows.len();
        gateway.insert(&table, rows).await?;
        info!(table = %table, rows = count, "Seeded table");
        inserted += count;
    }
    Ok(inserted)
}

/// Load the bundled demo data into an in-process gateway.
///
/// # Errors
///
/// Returns an error if the bundled file does not parse or validate.
pub async fn load_bundled(gateway: &MemoryGateway) -> Result<usize, Box<dyn std::error::Error>> {
    let data = parse(BUNDLED_SEED)?;
    let issues = validate(&data);
    if let Some(issue) = issues.first() {
        return Err(format!("bundled seed data is invalid: {issue}").into());
    }
    Ok(apply(gateway, data).await?)
}

/// Seed from a YAML file.
///
/// With `offline` set the rows go into a throwaway in-process gateway, which
/// checks the file end to end without a backend.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails validation,
/// or the gateway rejects an insert.
pub async fn from_file(file_path: &Path, offline: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Verify file exists
    if !file_path.exists() {
        return Err(format!("File not found: {}", file_path.display()).into());
    }

    info!(path = %file_path.display(), "Loading seed data from file");

    // Read and validate YAML before connecting to the backend
    let content = tokio::fs::read_to_string(file_path).await?;
    let data = parse(&content)?;

    info!(tables = data.len(), "Parsed seed file");

    let issues = validate(&data);
    if !issues.is_empty() {
        error!("Seed validation failed:");
        for issue in &issues {
            error!("  - {issue}");
        }
        return Err(format!("{} validation errors found", issues.len()).into());
    }

    info!("Seed data validated successfully");

    let inserted = if offline {
        let inserted = apply(&MemoryGateway::new(), data).await?;
        info!("Offline run: nothing was written to the hosted backend");
        inserted
    } else {
        // Load environment variables
        dotenvy::dotenv().ok();
        let config = GatewayConfig::from_env()?;
        info!(url = %config.url, "Connecting to gateway");
        apply(&RestGateway::new(&config), data).await?
    };

    info!("Seeding complete!");
    info!("  Rows inserted: {inserted}");

    Ok(())
}
