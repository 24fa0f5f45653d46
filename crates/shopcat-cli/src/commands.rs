//! Command handlers, called from `main` once config and logging are set up.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use shopcat_core::{AppConfig, CanonicalProduct, ScrapeMetrics};
use shopcat_export::ExportFormat;
use shopcat_scraper::{CatalogFetcher, RateLimiter, ShopifyClient, TextExtractor};

/// Arguments of the `scrape` subcommand.
#[derive(Debug)]
pub(crate) struct ScrapeArgs {
    pub url: String,
    pub max_products: Option<usize>,
    pub rate_limit_ms: Option<u64>,
    pub format: ExportFormat,
    pub output: Option<PathBuf>,
}

pub(crate) fn build_shopify_client(config: &AppConfig) -> anyhow::Result<ShopifyClient> {
    ShopifyClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
    )
    .map_err(|e| anyhow::anyhow!("failed to build Shopify client: {e}"))
}

/// Default export location: `{output_dir}/scraped_products.{ext}`.
pub(crate) fn default_output_path(config: &AppConfig, format: ExportFormat) -> PathBuf {
    config
        .output_dir
        .join(format!("scraped_products.{}", format.extension()))
}

/// Scrapes a storefront, prints metrics, and writes the export.
///
/// When the run aborts part way, the products gathered so far are still
/// written before the error is returned.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the scrape aborts, or the export
/// cannot be written.
pub(crate) async fn run_scrape(config: &AppConfig, args: ScrapeArgs) -> anyhow::Result<()> {
    shopcat_scraper::validate_base_url(&args.url)?;

    let max_products = args
        .max_products
        .unwrap_or(config.scraper_default_max_products);
    let rate_limit_ms = args.rate_limit_ms.unwrap_or(config.scraper_rate_limit_ms);
    let output = args
        .output
        .unwrap_or_else(|| default_output_path(config, args.format));

    let client = build_shopify_client(config)?;
    let mut fetcher = CatalogFetcher::new(client, RateLimiter::from_millis(rate_limit_ms));

    let started = Instant::now();
    let mut sink = |count: usize, product: &CanonicalProduct| {
        tracing::info!(
            count,
            max_products,
            product = %product.product_name,
            "scraped product"
        );
    };
    let result = fetcher
        .scrape(&args.url, Some(max_products), &mut sink)
        .await;

    let (products, failure) = match result {
        Ok(products) => (products, None),
        Err(aborted) => {
            let (source, products) = aborted.into_parts();
            (products, Some(source))
        }
    };

    let metrics = ScrapeMetrics::compute(&products, started.elapsed());
    println!("{}", serde_json::to_string_pretty(&metrics)?);

    let records = products
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    shopcat_export::write_to_path(&output, args.format, &records)
        .with_context(|| format!("failed to write {}", output.display()))?;

    match failure {
        None => {
            println!(
                "scraped {} products from {} into {}",
                products.len(),
                args.url,
                output.display()
            );
            Ok(())
        }
        Some(source) => Err(anyhow::Error::new(source).context(format!(
            "scrape of {} aborted; {} partial products written to {}",
            args.url,
            products.len(),
            output.display()
        ))),
    }
}

/// Prints the storefront's collections as pretty JSON.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the fetch fails.
pub(crate) async fn run_collections(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let client = build_shopify_client(config)?;
    let collections = client.fetch_collections(url).await?;
    println!("{}", serde_json::to_string_pretty(&collections)?);
    Ok(())
}

/// Prints whether `url` is usable and whether it looks like a Shopify store.
///
/// # Errors
///
/// Returns an error if the URL is malformed.
pub(crate) async fn run_validate(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let client = build_shopify_client(config)?;
    let is_shopify = client
        .probe_storefront(url)
        .await
        .with_context(|| format!("{url} is not a valid storefront URL"))?;
    println!("valid: true");
    println!("shopify: {is_shopify}");
    Ok(())
}

/// Fetches a product page and prints the rating data found in its text.
///
/// # Errors
///
/// Returns an error if the page cannot be fetched.
pub(crate) async fn run_reviews(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let client = build_shopify_client(config)?;
    let html = client.fetch_page_html(url).await?;
    let reviews = TextExtractor::new().extract_reviews_data(&html);
    println!("{}", serde_json::to_string_pretty(&reviews)?);
    Ok(())
}
