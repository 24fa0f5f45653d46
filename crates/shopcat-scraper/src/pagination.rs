//! Page-number pagination over the public `products.json` listing.
//!
//! The listing accepts `limit` (at most 250) and a 1-based `page` number.
//! There is no cursor and no total count; a page with zero products marks
//! the end of the catalog.
//!
//! ```text
//! https://shop.example/products.json?limit=250&page=1
//! https://shop.example/products.json?limit=250&page=2
//! ```

use crate::error::ScraperError;

/// Products requested per page; the storefront maximum.
pub const PAGE_SIZE: u32 = 250;

/// Maximum number of pages fetched in one run before giving up.
///
/// Storefronts that ignore `page` would otherwise return the same page
/// forever.
pub const MAX_PAGES: usize = 200;

/// Builds the listing URL for `page` under `base_url`.
///
/// Any path or query already on `base_url` is kept as a prefix, matching how
/// product URLs are derived from the same base.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidShopUrl`] if `base_url` is not an absolute
/// http(s) URL.
pub fn products_page_url(
    base_url: &str,
    limit: u32,
    page: usize,
) -> Result<reqwest::Url, ScraperError> {
    let mut url = endpoint_url(base_url, "products.json")?;
    url.query_pairs_mut()
        .append_pair("limit", &limit.to_string())
        .append_pair("page", &page.to_string());
    Ok(url)
}

/// Checks that `base_url` can serve as a storefront root.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidShopUrl`] if it cannot.
pub fn validate_base_url(base_url: &str) -> Result<(), ScraperError> {
    endpoint_url(base_url, "products.json").map(|_| ())
}

/// Builds `{base_url}/{endpoint}` after validating the base.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidShopUrl`] if `base_url` is not an absolute
/// http(s) URL with a host.
pub(crate) fn endpoint_url(base_url: &str, endpoint: &str) -> Result<reqwest::Url, ScraperError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let invalid = |reason: String| ScraperError::InvalidShopUrl {
        shop_url: base_url.to_owned(),
        reason,
    };

    let url = reqwest::Url::parse(&format!("{trimmed}/{endpoint}"))
        .map_err(|e| invalid(format!("not a valid URL: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme \"{}\"", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_owned()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_first_page_url() {
        let url = products_page_url("https://teahouse.example", PAGE_SIZE, 1).unwrap();
        assert_eq!(url.as_str(), "https://teahouse.example/products.json?limit=250&page=1");
    }

    #[test]
    fn trims_trailing_slash() {
        let url = products_page_url("https://teahouse.example/", PAGE_SIZE, 3).unwrap();
        assert_eq!(url.as_str(), "https://teahouse.example/products.json?limit=250&page=3");
    }

    #[test]
    fn keeps_path_prefix() {
        let url = products_page_url("https://example.com/en-in", 1, 1).unwrap();
        assert_eq!(url.as_str(), "https://example.com/en-in/products.json?limit=1&page=1");
    }

    #[test]
    fn rejects_relative_url() {
        let err = products_page_url("teahouse.example", PAGE_SIZE, 1).unwrap_err();
        assert!(matches!(err, ScraperError::InvalidShopUrl { .. }));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = products_page_url("ftp://teahouse.example", PAGE_SIZE, 1).unwrap_err();
        assert!(matches!(err, ScraperError::InvalidShopUrl { .. }));
    }

    #[test]
    fn validate_base_url_accepts_storefront_roots() {
        assert!(validate_base_url("https://teahouse.example").is_ok());
        assert!(validate_base_url("http://127.0.0.1:8080/").is_ok());
        assert!(validate_base_url("mailto:tea@teahouse.example").is_err());
    }

    #[test]
    fn rejects_empty_input() {
        assert!(products_page_url("", PAGE_SIZE, 1).is_err());
        assert!(products_page_url("   ", PAGE_SIZE, 1).is_err());
    }
}
