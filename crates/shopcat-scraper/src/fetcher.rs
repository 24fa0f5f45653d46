//! Paginated, rate-limited catalog scraping.

use shopcat_core::CanonicalProduct;

use crate::client::ShopifyClient;
use crate::error::{ScrapeAborted, ScraperError};
use crate::extract::TextExtractor;
use crate::normalize::normalize_product;
use crate::pagination::MAX_PAGES;
use crate::rate_limit::RateLimiter;
use crate::types::RawProduct;

/// Receives each product as soon as it is normalized.
///
/// Called synchronously from the fetch loop with the cumulative product
/// count (starting at 1). Implementations should return quickly.
pub trait ProgressSink {
    fn on_product(&mut self, count: usize, product: &CanonicalProduct);
}

impl<F> ProgressSink for F
where
    F: FnMut(usize, &CanonicalProduct),
{
    fn on_product(&mut self, count: usize, product: &CanonicalProduct) {
        self(count, product);
    }
}

/// A sink that ignores progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn on_product(&mut self, _count: usize, _product: &CanonicalProduct) {}
}

/// Drives one scrape run: pages through the listing, normalizes and
/// enriches every product, and reports progress.
#[derive(Debug)]
pub struct CatalogFetcher {
    client: ShopifyClient,
    rate_limiter: RateLimiter,
    extractor: TextExtractor,
}

impl CatalogFetcher {
    #[must_use]
    pub fn new(client: ShopifyClient, rate_limiter: RateLimiter) -> Self {
        Self {
            client,
            rate_limiter,
            extractor: TextExtractor::new(),
        }
    }

    /// Replaces the built-in description extractor.
    #[must_use]
    pub fn with_extractor(mut self, extractor: TextExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Scrapes `{base_url}/products.json` page by page.
    ///
    /// Stops when `max_products` is reached (mid-page if necessary), or when
    /// a page comes back empty. The rate limiter is awaited before every
    /// page request.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeAborted`] carrying the products gathered so far when a
    /// page fails to fetch or parse, or when more than [`MAX_PAGES`] pages
    /// would be requested.
    pub async fn scrape<S>(
        &mut self,
        base_url: &str,
        max_products: Option<usize>,
        sink: &mut S,
    ) -> Result<Vec<CanonicalProduct>, ScrapeAborted>
    where
        S: ProgressSink + ?Sized,
    {
        let limit_reached = |count: usize| max_products.is_some_and(|max| count >= max);
        let mut products: Vec<CanonicalProduct> = Vec::new();
        let mut page = 0usize;

        'pages: loop {
            if limit_reached(products.len()) {
                break;
            }

            page += 1;
            if page > MAX_PAGES {
                tracing::error!(base_url, max_pages = MAX_PAGES, "pagination limit reached");
                return Err(ScrapeAborted {
                    page,
                    source: ScraperError::PaginationLimit {
                        shop_url: base_url.to_owned(),
                        max_pages: MAX_PAGES,
                    },
                    products,
                });
            }

            self.rate_limiter.wait().await;
            tracing::info!(base_url, page, "fetching products page");

            let response = match self.client.fetch_products_page(base_url, page).await {
                Ok(response) => response,
                Err(source) => {
                    tracing::error!(
                        base_url,
                        page,
                        scraped = products.len(),
                        error = %source,
                        "products page failed, aborting scrape"
                    );
                    return Err(ScrapeAborted {
                        page,
                        source,
                        products,
                    });
                }
            };

            if response.products.is_empty() {
                tracing::debug!(base_url, page, "empty page, end of catalog");
                break;
            }

            for raw in &response.products {
                if limit_reached(products.len()) {
                    break 'pages;
                }
                let product = self.build_product(raw, base_url);
                sink.on_product(products.len() + 1, &product);
                products.push(product);
            }
        }

        tracing::info!(
            base_url,
            pages = page,
            products = products.len(),
            "scrape complete"
        );
        Ok(products)
    }

    /// [`Self::scrape`] without progress reporting.
    ///
    /// # Errors
    ///
    /// See [`Self::scrape`].
    pub async fn scrape_all(
        &mut self,
        base_url: &str,
        max_products: Option<usize>,
    ) -> Result<Vec<CanonicalProduct>, ScrapeAborted> {
        self.scrape(base_url, max_products, &mut NoopSink).await
    }

    fn build_product(&self, raw: &RawProduct, base_url: &str) -> CanonicalProduct {
        let mut product = normalize_product(raw, base_url);
        product.extracted = self
            .extractor
            .extract_from_description(raw.body_html.as_deref());
        product
    }
}
