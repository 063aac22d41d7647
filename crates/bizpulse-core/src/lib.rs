//! Shared building blocks for the BizPulse dashboard client.
//!
//! Holds everything that does not touch the network: environment-driven
//! configuration, the per-page filter selection, pagination arithmetic and
//! the number formatting rules used by every rendered card and table.

pub mod app_config;
pub mod config;
pub mod filters;
pub mod format;
pub mod pagination;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use filters::{ChartFilters, Dimension, FilterSelection, Metric, ALL, YTD};
pub use format::{
    format_compact, format_currency, format_euro, format_percentage, format_share,
    format_variance, round_to,
};
pub use pagination::{PageCursor, Paginated, Pagination};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
