//! Normalization from raw storefront types to [`shopcat_core::CanonicalProduct`].
//!
//! Scalar parsing is delegated to [`crate::parse`]; this module focuses on
//! structural conversion and defaults. Normalization never fails: every
//! missing or malformed field resolves to a documented default.

use chrono::{DateTime, Utc};
use scraper::Html;
use serde_json::Value;
use shopcat_core::{
    Availability, CanonicalProduct, CanonicalVariant, ExtractedFields, ProductOption,
    DEFAULT_CURRENCY, NOT_AVAILABLE,
};

use crate::parse::{
    discount_percentage, format_weight, parse_price, parse_weight, scalar_text, truncate_chars,
};
use crate::types::{RawOption, RawProduct, RawVariant};

const SHORT_DESCRIPTION_CHARS: usize = 200;
const META_DESCRIPTION_CHARS: usize = 160;
const UNCATEGORIZED: &str = "Uncategorized";

/// Normalizes a raw product, stamping it with the current time.
///
/// Extracted fields are left at their defaults; see
/// [`crate::extract::TextExtractor`] for filling them in.
#[must_use]
pub fn normalize_product(raw: &RawProduct, base_url: &str) -> CanonicalProduct {
    normalize_product_at(raw, base_url, Utc::now())
}

/// Normalizes a raw product with an explicit `scraped_at` timestamp.
#[must_use]
pub fn normalize_product_at(
    raw: &RawProduct,
    base_url: &str,
    scraped_at: DateTime<Utc>,
) -> CanonicalProduct {
    let first = raw.variants.first();

    let description = raw.body_html.as_deref().map(clean_html).unwrap_or_default();

    let current_price = first.and_then(|v| parse_price(v.price.as_ref()));
    let original_price = first.and_then(|v| parse_price(v.compare_at_price.as_ref()));

    // First-variant SKU, then the product id, then the sentinel.
    let sku = first
        .and_then(|v| v.sku.clone())
        .filter(|s| !s.is_empty())
        .or_else(|| raw.id.map(|id| id.to_string()))
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned());

    let weight = first
        .and_then(|v| format_weight(v.weight.as_ref(), v.weight_unit.as_deref()))
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned());

    CanonicalProduct {
        product_name: raw
            .title
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_owned()),
        product_url: format!(
            "{}/products/{}",
            base_url.trim_end_matches('/'),
            raw.handle.as_deref().unwrap_or_default()
        ),
        sku,
        current_price,
        original_price,
        discount_percentage: discount_percentage(current_price, original_price),
        currency: DEFAULT_CURRENCY.to_owned(),
        availability: Availability::from_flag(
            first.and_then(|v| v.available).unwrap_or(false),
        ),
        short_description: truncate_chars(&description, SHORT_DESCRIPTION_CHARS),
        meta_description: truncate_chars(&description, META_DESCRIPTION_CHARS),
        long_description: description,
        images: raw.images.iter().filter_map(|img| img.src.clone()).collect(),
        featured_image: raw.image.as_ref().and_then(|img| img.src.clone()),
        category: raw
            .product_type
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNCATEGORIZED.to_owned()),
        tags: normalize_tags(raw.tags.as_ref()),
        vendor: raw
            .vendor
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_owned()),
        product_id: raw.id,
        handle: raw.handle.clone(),
        variants: raw.variants.iter().map(normalize_variant).collect(),
        variant_count: raw.variants.len(),
        options: raw.options.iter().map(normalize_option).collect(),
        created_at: raw.created_at.clone(),
        updated_at: raw.updated_at.clone(),
        published_at: raw.published_at.clone(),
        scraped_at,
        weight,
        barcode: first.and_then(|v| v.barcode.clone()),
        requires_shipping: first.and_then(|v| v.requires_shipping).unwrap_or(true),
        taxable: first.and_then(|v| v.taxable).unwrap_or(true),
        meta_title: raw.title.clone(),
        extracted: ExtractedFields::default(),
    }
}

fn normalize_variant(variant: &RawVariant) -> CanonicalVariant {
    CanonicalVariant {
        id: variant.id,
        title: variant.title.clone(),
        option1: variant.option1.clone(),
        option2: variant.option2.clone(),
        option3: variant.option3.clone(),
        sku: variant.sku.clone(),
        price: parse_price(variant.price.as_ref()),
        compare_at_price: parse_price(variant.compare_at_price.as_ref()),
        available: variant.available.unwrap_or(false),
        inventory_quantity: variant.inventory_quantity,
        weight: parse_weight(variant.weight.as_ref()),
        weight_unit: variant.weight_unit.clone(),
        barcode: variant.barcode.clone(),
    }
}

fn normalize_option(option: &RawOption) -> ProductOption {
    ProductOption {
        name: option.name.clone(),
        position: option.position,
        values: option.values.iter().filter_map(scalar_text).collect(),
    }
}

/// Normalizes the loosely typed `tags` field into trimmed, non-empty strings.
///
/// - A list keeps its scalar elements (numbers and booleans stringified),
///   skipping null and nested values.
/// - A string is split on commas.
/// - Anything else yields no tags.
#[must_use]
pub fn normalize_tags(tags: Option<&Value>) -> Vec<String> {
    match tags {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(scalar_text)
            .map(|tag| tag.trim().to_owned())
            .filter(|tag| !tag.is_empty())
            .collect(),
        Some(Value::String(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

/// Strips markup from an HTML fragment, joining text nodes with single
/// spaces and collapsing whitespace runs.
#[must_use]
pub fn clean_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
