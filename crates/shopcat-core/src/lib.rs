pub mod app_config;
pub mod completeness;
pub mod config;
pub mod metrics;
pub mod products;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use completeness::{round2, score_completeness, CompletenessReport, ESSENTIAL_FIELDS};
pub use config::{load_app_config, load_app_config_from_env};
pub use metrics::{products_per_minute, ScrapeMetrics};
pub use products::{
    Availability, CanonicalProduct, CanonicalVariant, ExtractedFields, ProductOption, ReviewsData,
    DEFAULT_CURRENCY, NOT_AVAILABLE,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
