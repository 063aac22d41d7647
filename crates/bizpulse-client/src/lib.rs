//! Typed client for the BizPulse REST API.
//!
//! [`ApiClient`] owns the auth [`Session`] and validates every payload at
//! the boundary, so callers receive concrete types or an [`ApiError`].

pub mod admin;
pub mod auth;
pub mod charts;
pub mod client;
pub mod dashboard;
pub mod error;
pub mod query;
pub mod session;
pub mod types;

pub use charts::{ChartKind, YearComparisonRow};
pub use client::ApiClient;
pub use error::{ApiError, RATE_LIMITED_MESSAGE};
pub use query::DashboardQuery;
pub use session::{Session, Tokens};
pub use types::{
    AzureStatus, BusinessArea, CardValue, CategoryRecord, Channel, CustomerChannel,
    CustomerOverview, FilterOptions, HealthReport, MetricCard, Overview, PerformanceRecord,
    RiskEntry, TopPerformer, TrendPoint, UploadResult, User, Variance,
};
