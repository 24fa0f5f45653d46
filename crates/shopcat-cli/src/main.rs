mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shopcat_export::ExportFormat;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shopcat-cli")]
#[command(about = "Scrape and export Shopify storefront catalogs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape a storefront's product catalog and export it
    Scrape {
        /// Storefront root, e.g. https://shop.example
        #[arg(long)]
        url: String,

        /// Stop after this many products (defaults to the configured cap)
        #[arg(long)]
        max_products: Option<usize>,

        /// Delay between page requests in milliseconds
        #[arg(long)]
        rate_limit_ms: Option<u64>,

        /// Export format: json, csv or excel
        #[arg(long, default_value = "json", value_parser = parse_format)]
        format: ExportFormat,

        /// Output file (defaults to `<output_dir>/scraped_products.<ext>`)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print a storefront's collections as JSON
    Collections {
        #[arg(long)]
        url: String,
    },
    /// Check a URL and whether it serves a Shopify product listing
    Validate {
        #[arg(long)]
        url: String,
    },
    /// Fetch a product page and print the rating data found on it
    Reviews {
        /// Product page URL
        #[arg(long)]
        url: String,
    },
}

fn parse_format(raw: &str) -> Result<ExportFormat, String> {
    raw.parse().map_err(|e: shopcat_export::ExportError| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = shopcat_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Scrape {
            url,
            max_products,
            rate_limit_ms,
            format,
            output,
        } => {
            commands::run_scrape(
                &config,
                commands::ScrapeArgs {
                    url,
                    max_products,
                    rate_limit_ms,
                    format,
                    output,
                },
            )
            .await?;
        }
        Commands::Collections { url } => commands::run_collections(&config, &url).await?,
        Commands::Validate { url } => commands::run_validate(&config, &url).await?,
        Commands::Reviews { url } => commands::run_reviews(&config, &url).await?,
    }

    Ok(())
}
