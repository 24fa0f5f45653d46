//! Data-completeness scoring over a finished batch of products.
//!
//! A field counts as filled for a product when it holds a meaningful value:
//! non-null, a non-empty string or list, and not the `"N/A"` sentinel.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::products::{CanonicalProduct, NOT_AVAILABLE};

type FieldPredicate = fn(&CanonicalProduct) -> bool;

/// Essential fields in report order, each paired with its fill predicate.
pub const ESSENTIAL_FIELDS: &[(&str, FieldPredicate)] = &[
    ("product_name", |p: &CanonicalProduct| is_meaningful(&p.product_name)),
    ("product_url", |p: &CanonicalProduct| is_meaningful(&p.product_url)),
    ("current_price", |p: &CanonicalProduct| p.current_price.is_some()),
    ("sku", |p: &CanonicalProduct| is_meaningful(&p.sku)),
    // Always one of two non-empty strings.
    ("availability", |_: &CanonicalProduct| true),
    ("short_description", |p: &CanonicalProduct| is_meaningful(&p.short_description)),
    ("long_description", |p: &CanonicalProduct| is_meaningful(&p.long_description)),
    ("images", |p: &CanonicalProduct| !p.images.is_empty()),
];

/// Fill rates for a batch of products. Percentages are in `0.0..=100.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletenessReport {
    /// Mean of the per-field rates, rounded to two decimals.
    pub overall: f64,
    /// Per-field fill rate, rounded to two decimals. Empty for an empty batch.
    pub fields: BTreeMap<String, f64>,
    pub total_products: usize,
}

/// Scores a finished batch against [`ESSENTIAL_FIELDS`].
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score_completeness(products: &[CanonicalProduct]) -> CompletenessReport {
    if products.is_empty() {
        return CompletenessReport::default();
    }

    let total = products.len() as f64;
    let mut fields = BTreeMap::new();
    let mut sum = 0.0;

    for (name, is_filled) in ESSENTIAL_FIELDS {
        let filled = products.iter().filter(|p| is_filled(p)).count();
        let rate = round2(filled as f64 / total * 100.0);
        sum += rate;
        fields.insert((*name).to_string(), rate);
    }

    CompletenessReport {
        overall: round2(sum / ESSENTIAL_FIELDS.len() as f64),
        fields,
        total_products: products.len(),
    }
}

fn is_meaningful(value: &str) -> bool {
    !value.is_empty() && value != NOT_AVAILABLE
}

/// Rounds to two decimal places, half away from zero.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
