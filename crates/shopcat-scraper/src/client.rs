//! HTTP client for a storefront's public JSON and HTML endpoints.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ScraperError;
use crate::pagination::{endpoint_url, products_page_url, PAGE_SIZE};
use crate::types::{ShopifyCollectionsResponse, ShopifyProductsResponse};

const ACCEPT: &str = "application/json,text/html,application/xhtml+xml";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// HTTP client for a storefront's public endpoints.
///
/// Maps rate limiting (429), not-found (404), and other non-2xx responses to
/// typed errors. Requests are made once; there is no retry.
#[derive(Debug, Clone)]
pub struct ShopifyClient {
    client: Client,
}

impl ShopifyClient {
    /// Creates a `ShopifyClient` with the configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches one page of the product listing.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidShopUrl`]: `base_url` is not an absolute http(s) URL.
    /// - [`ScraperError::RateLimited`]: HTTP 429.
    /// - [`ScraperError::NotFound`]: HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network, TLS or timeout failure.
    /// - [`ScraperError::Deserialize`]: response body is not a products page.
    pub async fn fetch_products_page(
        &self,
        base_url: &str,
        page: usize,
    ) -> Result<ShopifyProductsResponse, ScraperError> {
        let url = products_page_url(base_url, PAGE_SIZE, page)?;
        self.get_json(url, &format!("products page {page} from {base_url}"))
            .await
    }

    /// Fetches the storefront's collection list as raw JSON values.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::fetch_products_page`].
    pub async fn fetch_collections(&self, base_url: &str) -> Result<Vec<Value>, ScraperError> {
        let url = endpoint_url(base_url, "collections.json")?;
        let body: ShopifyCollectionsResponse = self
            .get_json(url, &format!("collections from {base_url}"))
            .await?;
        Ok(body.collections)
    }

    /// Reports whether `base_url` serves a product listing.
    ///
    /// Any transport failure, non-200 status or body without a `products`
    /// key counts as "not a storefront" rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidShopUrl`] only when `base_url` itself
    /// is malformed.
    pub async fn probe_storefront(&self, base_url: &str) -> Result<bool, ScraperError> {
        let url = products_page_url(base_url, 1, 1)?;
        let response = match self.request(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(base_url, error = %e, "storefront probe failed");
                return Ok(false);
            }
        };
        if response.status() != reqwest::StatusCode::OK {
            return Ok(false);
        }
        let Ok(body) = response.json::<Value>().await else {
            return Ok(false);
        };
        Ok(body.get("products").is_some())
    }

    /// Fetches a rendered page as text, e.g. a product page for review
    /// extraction.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidShopUrl`] for a malformed URL and the
    /// usual status and transport errors otherwise.
    pub async fn fetch_page_html(&self, page_url: &str) -> Result<String, ScraperError> {
        let url = Url::parse(page_url)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .ok_or_else(|| ScraperError::InvalidShopUrl {
                shop_url: page_url.to_owned(),
                reason: "not an absolute http(s) URL".to_owned(),
            })?;
        let response = self.send_checked(url).await?;
        Ok(response.text().await?)
    }

    /// GET with browser-like headers; the `Referer` is the store's own origin.
    fn request(&self, url: Url) -> reqwest::RequestBuilder {
        let referer = storefront_referer(&url);
        self.client
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .header(reqwest::header::REFERER, referer)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
    }

    /// Sends a GET and maps non-2xx statuses to typed errors.
    async fn send_checked(&self, url: Url) -> Result<Response, ScraperError> {
        let domain = url.host_str().unwrap_or_default().to_owned();
        let response = self.request(url).send().await?;
        let status = response.status();
        let url = response.url().to_string();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);

            return Err(ScraperError::RateLimited {
                domain,
                retry_after_secs,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound { url });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<T, ScraperError> {
        let body = self.send_checked(url).await?.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| ScraperError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// `scheme://host[:port]/` of the page being requested.
fn storefront_referer(url: &Url) -> String {
    format!("{}/", url.origin().ascii_serialization())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
