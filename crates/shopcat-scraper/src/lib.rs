pub mod client;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod normalize;
pub mod pagination;
pub mod parse;
pub mod rate_limit;
pub mod types;

pub use client::ShopifyClient;
pub use error::{ScrapeAborted, ScraperError};
pub use extract::{PatternTable, TextExtractor};
pub use fetcher::{CatalogFetcher, NoopSink, ProgressSink};
pub use normalize::{clean_html, normalize_product, normalize_product_at, normalize_tags};
pub use pagination::validate_base_url;
pub use parse::parse_price;
pub use rate_limit::RateLimiter;
pub use types::{RawProduct, RawVariant, ShopifyProductsResponse};
