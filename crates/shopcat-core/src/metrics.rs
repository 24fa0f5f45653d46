use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::completeness::{round2, score_completeness};
use crate::products::CanonicalProduct;

/// Summary attached to a finished scrape run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapeMetrics {
    pub elapsed_time_seconds: f64,
    pub products_per_minute: f64,
    /// Overall completeness percentage, see [`crate::CompletenessReport`].
    pub data_completeness: f64,
    pub field_completeness: BTreeMap<String, f64>,
}

impl ScrapeMetrics {
    /// Computes throughput and completeness for `products` gathered over `elapsed`.
    #[must_use]
    pub fn compute(products: &[CanonicalProduct], elapsed: Duration) -> Self {
        let report = score_completeness(products);
        let elapsed_secs = elapsed.as_secs_f64();
        Self {
            elapsed_time_seconds: round2(elapsed_secs),
            products_per_minute: round2(products_per_minute(products.len(), elapsed_secs)),
            data_completeness: report.overall,
            field_completeness: report.fields,
        }
    }
}

/// `count / elapsed_secs * 60`, or `0.0` when no time has elapsed.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn products_per_minute(count: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    count as f64 / elapsed_secs * 60.0
}
