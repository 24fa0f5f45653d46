use shopcat_core::CanonicalProduct;
use thiserror::Error;

/// Failure of a single storefront request.
///
/// Every variant is fatal to the scrape run that hit it.
#[derive(Debug, Error)]
pub enum ScraperError {
    /// Transport, TLS or timeout failure, or a body that could not be read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed JSON in {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// HTTP 429. `retry_after_secs` comes from `Retry-After`, else 60.
    #[error("storefront {domain} is throttling requests (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("storefront endpoint not found: {url}")]
    NotFound { url: String },

    #[error("storefront answered HTTP {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("{shop_url} still had products after {max_pages} pages")]
    PaginationLimit { shop_url: String, max_pages: usize },

    #[error("invalid shop URL \"{shop_url}\": {reason}")]
    InvalidShopUrl { shop_url: String, reason: String },
}

/// A scrape run that stopped on a failed page.
///
/// Products normalized before the failure are kept so callers can still
/// report or persist them.
#[derive(Debug, Error)]
#[error("scrape aborted on page {page} after {} products: {source}", .products.len())]
pub struct ScrapeAborted {
    pub page: usize,
    #[source]
    pub source: ScraperError,
    pub products: Vec<CanonicalProduct>,
}

impl ScrapeAborted {
    /// Splits the failure into its cause and the partial output.
    #[must_use]
    pub fn into_parts(self) -> (ScraperError, Vec<CanonicalProduct>) {
        (self.source, self.products)
    }
}
