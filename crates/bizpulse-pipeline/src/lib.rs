//! Fetch-and-reshape layer between the API client and the presentation.
//!
//! Loaders combine one or more [`bizpulse_client::ApiClient`] calls into a
//! view model. [`widget::Widget`] wraps a loader with loading/failed state
//! and discards stale responses; [`pages`] groups widgets per screen.

pub mod business;
pub mod categories;
pub mod customers;
pub mod drilldown;
pub mod options;
pub mod pages;
pub mod ranking;
pub mod trend;
pub mod variance;
pub mod widget;

pub use business::{BusinessAnalysis, ChartPanel, KpiSummary};
pub use categories::{CategoryOverview, CategoryRow, Performance, TopCategory};
pub use customers::{ChannelShare, OverviewCard};
pub use drilldown::{DrillDown, DrillDownKind, UnknownDrillDown};
pub use options::DropdownOptions;
pub use pages::{BrandsPage, BusinessPage, CategoriesPage, CustomersPage};
pub use ranking::{
    AtRiskCustomer, CustomerRanking, CustomerRow, CustomerStatus, RankedRow, RiskLevel, SkuRow,
    TrendDirection,
};
pub use trend::{MergedPoint, TrendRow};
pub use variance::{VarianceBreakdown, VarianceDriver};
pub use widget::{Ticket, Widget, WidgetState};
