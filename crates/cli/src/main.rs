//! Maison CLI - Catalog browsing and cart pricing tools.
//!
//! # Usage
//!
//! ```bash
//! # List knitwear available in size M, cheapest first
//! maison products --catalog catalog.json --category knitwear --size M --sort price-asc
//!
//! # Price a cart with a promo code
//! maison quote --catalog catalog.yaml --item 1:M:Navy:2 --item 3:L:Black --promo SAVE20
//! ```
//!
//! # Commands
//!
//! - `products` - Filter and sort a catalog
//! - `quote` - Build a cart from catalog items and print its totals
//!
//! Pricing parameters are read from `MAISON_*` environment variables (see
//! `maison_storefront::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::ItemSpec;

#[derive(Parser)]
#[command(name = "maison")]
#[command(author, version, about = "Maison storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products matching the given filters
    Products {
        /// Catalog file (JSON, or YAML with a .yaml/.yml extension)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Exact category to show
        #[arg(long)]
        category: Option<String>,

        /// Sizes to match (any available one passes)
        #[arg(long = "size")]
        sizes: Vec<String>,

        /// Colors to match (any available one passes)
        #[arg(long = "color")]
        colors: Vec<String>,

        /// Lowest list price, inclusive
        #[arg(long)]
        min: Option<Decimal>,

        /// Highest list price, inclusive
        #[arg(long)]
        max: Option<Decimal>,

        /// Sort order (`price-asc`, `price-desc`, `name-asc`, `name-desc`)
        #[arg(long)]
        sort: Option<String>,
    },
    /// Build a cart and print its totals
    Quote {
        /// Catalog file (JSON, or YAML with a .yaml/.yml extension)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Cart item as `ID:SIZE:COLOR[:QTY]`
        #[arg(short, long = "item", required = true)]
        items: Vec<ItemSpec>,

        /// Promo code to apply
        #[arg(short, long)]
        promo: Option<String>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("maison_storefront=info,maison_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Products {
            catalog,
            category,
            sizes,
            colors,
            min,
            max,
            sort,
        } => {
            let filters = commands::products::Filters {
                category,
                sizes,
                colors,
                min,
                max,
                sort,
            };
            commands::products::list(&catalog, filters)?;
        }
        Commands::Quote {
            catalog,
            items,
            promo,
            json,
        } => commands::quote::run(&catalog, &items, promo.as_deref(), json)?,
    }
    Ok(())
}
