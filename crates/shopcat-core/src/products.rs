use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel written into string fields the storefront did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Currency reported for every product.
///
/// Shopify's public `products.json` does not expose the store currency, so
/// this is a fixed placeholder rather than an inferred value.
pub const DEFAULT_CURRENCY: &str = "INR";

/// Stock state derived from the first variant's `available` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl Availability {
    #[must_use]
    pub fn from_flag(available: bool) -> Self {
        if available {
            Self::InStock
        } else {
            Self::OutOfStock
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Availability::InStock => write!(f, "In Stock"),
            Availability::OutOfStock => write!(f, "Out of Stock"),
        }
    }
}

/// A product scraped from a storefront, flattened into the export schema.
///
/// Created once per raw catalog record and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProduct {
    pub product_name: String,
    /// `{base_url}/products/{handle}`.
    pub product_url: String,
    /// First variant SKU, falling back to the product id, then `"N/A"`.
    pub sku: String,
    /// Parsed first-variant price. `None` when absent or not a number.
    pub current_price: Option<f64>,
    /// Parsed first-variant `compare_at_price`.
    pub original_price: Option<f64>,
    /// Percentage off `original_price`, rounded to two decimals; `0.0` when
    /// there is no valid markdown.
    pub discount_percentage: f64,
    pub currency: String,
    pub availability: Availability,
    /// Plain-text description truncated to 200 characters.
    pub short_description: String,
    /// Plain-text description with HTML stripped and whitespace collapsed.
    pub long_description: String,
    pub images: Vec<String>,
    pub featured_image: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub vendor: String,
    pub product_id: Option<u64>,
    pub handle: Option<String>,
    pub variants: Vec<CanonicalVariant>,
    /// Length of the raw variants sequence, malformed entries included.
    pub variant_count: usize,
    pub options: Vec<ProductOption>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub published_at: Option<String>,
    pub scraped_at: DateTime<Utc>,
    /// `"{weight}{unit}"` from the first variant, or `"N/A"`.
    pub weight: String,
    pub barcode: Option<String>,
    pub requires_shipping: bool,
    pub taxable: bool,
    pub meta_title: Option<String>,
    /// Plain-text description truncated to 160 characters.
    pub meta_description: String,
    #[serde(flatten)]
    pub extracted: ExtractedFields,
}

/// A single purchasable variant of a [`CanonicalProduct`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalVariant {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub option1: Option<String>,
    pub option2: Option<String>,
    pub option3: Option<String>,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub compare_at_price: Option<f64>,
    pub available: bool,
    pub inventory_quantity: Option<i64>,
    pub weight: Option<f64>,
    pub weight_unit: Option<String>,
    pub barcode: Option<String>,
}

/// A product option axis such as size or color.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: Option<String>,
    pub position: Option<i64>,
    pub values: Vec<String>,
}

/// Fields recovered heuristically from a product's HTML description.
///
/// Every field has an empty default; a missed pattern is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub ingredients: Option<String>,
    /// Nutrient name to the numeric text matched for it. Nutrients that were
    /// not found are absent from the map.
    pub nutritional_info: BTreeMap<String, String>,
    pub certifications: Vec<String>,
    pub features: Vec<String>,
    pub specifications: BTreeMap<String, String>,
}

/// Rating data scraped from a rendered product page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewsData {
    pub rating: Option<f64>,
    pub review_count: u64,
    /// Individual reviews are not scraped; always empty.
    pub reviews: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_variant(id: u64, available: bool) -> CanonicalVariant {
        CanonicalVariant {
            id: Some(id),
            title: Some("250g".to_string()),
            sku: Some("TEA-250".to_string()),
            price: Some(12.5),
            available,
            ..CanonicalVariant::default()
        }
    }

    fn make_product(variants: Vec<CanonicalVariant>) -> CanonicalProduct {
        let variant_count = variants.len();
        CanonicalProduct {
            product_name: "Assam Breakfast Tea".to_string(),
            product_url: "https://teahouse.example/products/assam-breakfast".to_string(),
            sku: "TEA-250".to_string(),
            current_price: Some(12.5),
            original_price: Some(15.0),
            discount_percentage: 16.67,
            currency: DEFAULT_CURRENCY.to_string(),
            availability: Availability::InStock,
            short_description: "Malty black tea — from Assam.".to_string(),
            long_description: "Malty black tea — from Assam.".to_string(),
            images: vec!["https://cdn.example/assam.jpg".to_string()],
            featured_image: Some("https://cdn.example/assam.jpg".to_string()),
            category: "Tea".to_string(),
            tags: vec!["black tea".to_string(), "organic".to_string()],
            vendor: "Teahouse".to_string(),
            product_id: Some(7_001),
            handle: Some("assam-breakfast".to_string()),
            variants,
            variant_count,
            options: vec![ProductOption {
                name: Some("Size".to_string()),
                position: Some(1),
                values: vec!["250g".to_string()],
            }],
            created_at: Some("2024-01-01T10:00:00+05:30".to_string()),
            updated_at: None,
            published_at: None,
            scraped_at: Utc::now(),
            weight: "0.25kg".to_string(),
            barcode: None,
            requires_shipping: true,
            taxable: true,
            meta_title: Some("Assam Breakfast Tea".to_string()),
            meta_description: "Malty black tea — from Assam.".to_string(),
            extracted: ExtractedFields {
                certifications: vec!["ORGANIC".to_string()],
                ..ExtractedFields::default()
            },
        }
    }

    #[test]
    fn availability_serializes_as_display_strings() {
        assert_eq!(
            serde_json::to_string(&Availability::InStock).unwrap(),
            "\"In Stock\""
        );
        assert_eq!(
            serde_json::to_string(&Availability::OutOfStock).unwrap(),
            "\"Out of Stock\""
        );
    }

    #[test]
    fn availability_from_flag() {
        assert_eq!(Availability::from_flag(true), Availability::InStock);
        assert_eq!(Availability::from_flag(false), Availability::OutOfStock);
    }

    #[test]
    fn extracted_fields_are_flattened_into_product_json() {
        let product = make_product(vec![make_variant(1, true)]);
        let value = serde_json::to_value(&product).expect("serialize");
        assert_eq!(value["certifications"][0], "ORGANIC");
        assert!(value["ingredients"].is_null());
        assert!(value.get("extracted").is_none());
    }

    #[test]
    fn serde_roundtrip_product() {
        let product = make_product(vec![make_variant(1, true)]);
        let json = serde_json::to_string(&product).expect("serialization failed");
        let decoded: CanonicalProduct =
            serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(decoded, product);
    }
}
