//! Sweet Dreams CLI - seeding and storefront tools.
//!
//! # Usage
//!
//! ```bash
//! # Load products, content and reviews into the hosted backend
//! sd-cli seed crates/cli/seed/sweet-dreams.yaml
//!
//! # List the catalog, optionally one category
//! sd-cli products --category Macarons
//!
//! # Show the latest store reviews
//! sd-cli reviews
//!
//! # Create a customer account
//! sd-cli sign-up -e rose@example.com -n "Rose Baker" -p "sugar-rush"
//!
//! # Send a custom order request
//! sd-cli custom-order -n "Rose Baker" -e rose@example.com -m "Two dozen rose macarons"
//!
//! # Any command against the bundled demo data, no backend needed
//! sd-cli --offline products
//! ```
//!
//! # Commands
//!
//! - `seed` - Insert rows from a YAML file
//! - `products` - List catalog products
//! - `reviews` - List store reviews
//! - `sign-up` - Register a customer account
//! - `custom-order` - Submit a custom order request

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "sd-cli")]
#[command(author, version, about = "Sweet Dreams CLI tools")]
struct Cli {
    /// Run against an in-process gateway loaded with the bundled demo data
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert rows from a YAML seed file
    Seed {
        /// Path to the seed file (table name -> list of rows)
        file: PathBuf,
    },
    /// List catalog products
    Products {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List the latest store reviews
    Reviews,
    /// Register a customer account
    SignUp {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Full name shown on reviews
        #[arg(short, long)]
        name: String,

        /// Account password (at least 6 characters)
        #[arg(short, long)]
        password: String,
    },
    /// Submit a custom order request
    CustomOrder {
        /// Customer name
        #[arg(short, long)]
        name: String,

        /// Customer email address
        #[arg(short, long)]
        email: String,

        /// Contact phone number
        #[arg(long)]
        phone: Option<String>,

        /// What the customer would like
        #[arg(short, long)]
        message: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let offline = cli.offline;
    match cli.command {
        Commands::Seed { file } => commands::seed::from_file(&file, offline).await?,
        Commands::Products { category } => {
            let storefront = commands::open(offline).await?;
            commands::catalog::products(&storefront, category.as_deref()).await?;
        }
        Commands::Reviews => {
            let storefront = commands::open(offline).await?;
            commands::catalog::reviews(&storefront).await?;
        }
        Commands::SignUp {
            email,
            name,
            password,
        } => {
            let storefront = commands::open(offline).await?;
            commands::forms::sign_up(&storefront, email, name, password).await?;
        }
        Commands::CustomOrder {
            name,
            email,
            phone,
            message,
        } => {
            let storefront = commands::open(offline).await?;
            commands::forms::custom_order(&storefront, name, email, phone, message).await?;
        }
    }
    Ok(())
}
