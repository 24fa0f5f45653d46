//! Raw response types for the public storefront endpoints.
//!
//! ## Tolerance
//!
//! Storefront catalogs are messy: themes and apps write arbitrary values into
//! product fields, and older stores predate parts of the current schema.
//! Every field here is optional. A field whose JSON shape does not match the
//! expected type is read as absent instead of failing the whole page, so one
//! bad product never costs the run.
//!
//! ### Tags
//! Current stores return tags as a JSON array of strings, the legacy Liquid
//! API documented a comma-separated string. Both (and anything else) are
//! kept as a raw [`Value`] and resolved by
//! [`crate::normalize::normalize_tags`].
//!
//! ### Prices
//! `price` and `compare_at_price` are decimal strings (`"30.00"`) on most
//! stores but plain numbers on some. `compare_at_price` is `null` when the
//! variant is not on sale. Both stay raw and are parsed by
//! [`crate::parse::parse_price`].
//!
//! ### Sequences
//! `images`, `options` and `variants` keep one entry per source element.
//! Elements that are not objects become fully defaulted entries so that
//! counts such as `variant_count` still match the source.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top-level response from `GET /products.json`.
#[derive(Debug, Default, Deserialize)]
pub struct ShopifyProductsResponse {
    /// A missing or `null` key reads as an empty page, which ends pagination.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub products: Vec<RawProduct>,
}

/// Top-level response from `GET /collections.json`, passed through untouched.
#[derive(Debug, Default, Deserialize)]
pub struct ShopifyCollectionsResponse {
    #[serde(default)]
    pub collections: Vec<Value>,
}

/// A single product record from the storefront listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProduct {
    /// Numeric product ID, e.g. `6789012345678`.
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,

    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,

    /// URL slug for the product page.
    #[serde(default, deserialize_with = "lenient")]
    pub handle: Option<String>,

    /// Raw HTML product description.
    #[serde(default, deserialize_with = "lenient")]
    pub body_html: Option<String>,

    /// Product category string. Frequently `""`.
    #[serde(default, deserialize_with = "lenient")]
    pub product_type: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub vendor: Option<String>,

    /// List, comma-separated string, or anything else.
    #[serde(default)]
    pub tags: Option<Value>,

    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub published_at: Option<String>,

    /// Primary image.
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<RawImage>,

    #[serde(default, deserialize_with = "lenient_seq")]
    pub images: Vec<RawImage>,

    #[serde(default, deserialize_with = "lenient_seq")]
    pub options: Vec<RawOption>,

    /// The first entry is the pricing source for the product.
    #[serde(default, deserialize_with = "lenient_seq")]
    pub variants: Vec<RawVariant>,
}

/// A single purchasable variant of a [`RawProduct`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVariant {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,

    /// Display title, e.g. `"250g / Loose Leaf"` or `"Default Title"`.
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub option1: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub option2: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub option3: Option<String>,

    /// Stock-keeping unit. Often an empty string.
    #[serde(default, deserialize_with = "lenient")]
    pub sku: Option<String>,

    /// Numeric-as-text current price.
    #[serde(default)]
    pub price: Option<Value>,

    /// Numeric-as-text pre-sale price, `null` when not on sale.
    #[serde(default)]
    pub compare_at_price: Option<Value>,

    #[serde(default, deserialize_with = "lenient")]
    pub available: Option<bool>,

    #[serde(default, deserialize_with = "lenient")]
    pub inventory_quantity: Option<i64>,

    /// Kept raw so it can be echoed back exactly as the store wrote it.
    #[serde(default)]
    pub weight: Option<Value>,

    #[serde(default, deserialize_with = "lenient")]
    pub weight_unit: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub barcode: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub requires_shipping: Option<bool>,

    #[serde(default, deserialize_with = "lenient")]
    pub taxable: Option<bool>,
}

/// A product image.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImage {
    /// Canonical CDN URL.
    #[serde(default, deserialize_with = "lenient")]
    pub src: Option<String>,
}

/// A product option axis, e.g. `{"name": "Size", "values": ["S", "M"]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOption {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub position: Option<i64>,

    #[serde(default, deserialize_with = "lenient_seq")]
    pub values: Vec<Value>,
}

/// Reads any JSON value and keeps it only if it converts into `T`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| T::deserialize(v).ok()))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads a JSON array element by element, defaulting elements that do not
/// convert into `T`. Anything other than an array reads as empty.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .map(|item| T::deserialize(item).unwrap_or_default())
        .collect())
}
