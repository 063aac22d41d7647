//! Dashboard read endpoints (`GET /dashboard/*`) and the health probe.
//!
//! Every method takes a [`DashboardQuery`]; the envelope is stripped and a
//! missing payload decodes as an empty value.

use bizpulse_core::filters::is_restricted;
use bizpulse_core::Paginated;

use crate::client::{check_status, ApiClient};
use crate::error::ApiError;
use crate::query::DashboardQuery;
use crate::types::{
    BusinessArea, CategoryRecord, Channel, CustomerChannel, CustomerOverview, FilterOptions,
    HealthReport, Overview, OverviewPayload, PerformanceRecord, RiskEntry, TopPerformer,
    TopPerformersPayload, TrendPoint, Variance,
};

/// Window assumed for top-performers when the query sets none.
const DEFAULT_TOP_LIMIT: u64 = 10;

impl ApiClient {
    /// Headline totals. Accepts the flat and the `overview`-nested shape.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or payload decoding.
    pub async fn overview(&self, query: &DashboardQuery) -> Result<Overview, ApiError> {
        let payload: OverviewPayload = self.get_data("dashboard/overview", query.pairs()).await?;
        Ok(payload.into())
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the request or payload decoding.
    pub async fn business_areas(
        &self,
        query: &DashboardQuery,
    ) -> Result<Vec<BusinessArea>, ApiError> {
        self.get_data("dashboard/business-areas", query.pairs()).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the request or payload decoding.
    pub async fn channels(&self, query: &DashboardQuery) -> Result<Vec<Channel>, ApiError> {
        self.get_data("dashboard/channels", query.pairs()).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the request or payload decoding.
    pub async fn performance_data(
        &self,
        query: &DashboardQuery,
    ) -> Result<Vec<PerformanceRecord>, ApiError> {
        self.get_data("dashboard/performance-data", query.pairs()).await
    }

    /// Option lists, optionally narrowed to a year and business area.
    /// An unrestricted business area (`"All"`) is not sent.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or payload decoding.
    pub async fn filter_options(
        &self,
        year: Option<i32>,
        business_area: Option<&str>,
    ) -> Result<FilterOptions, ApiError> {
        let mut pairs = Vec::new();
        if let Some(year) = year {
            pairs.push(("year", year.to_string()));
        }
        if let Some(area) = business_area.filter(|a| is_restricted(a)) {
            pairs.push(("businessArea", area.to_string()));
        }
        self.get_data("dashboard/filter-options", &pairs).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the request or payload decoding.
    pub async fn categories(
        &self,
        query: &DashboardQuery,
    ) -> Result<Vec<CategoryRecord>, ApiError> {
        self.get_data("dashboard/categories", query.pairs()).await
    }

    /// One metric's series; set the metric on the query.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or payload decoding.
    pub async fn trend(&self, query: &DashboardQuery) -> Result<Vec<TrendPoint>, ApiError> {
        self.get_data("dashboard/trend", query.pairs()).await
    }

    /// Ranked entities for the query's dimension and metric, sorted by the
    /// server. Always returned as a page, whichever shape the server used.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or payload decoding.
    pub async fn top_performers(
        &self,
        query: &DashboardQuery,
    ) -> Result<Paginated<TopPerformer>, ApiError> {
        let limit = query
            .get("limit")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TOP_LIMIT);
        let offset = query
            .get("offset")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let payload: TopPerformersPayload = self
            .get_data("dashboard/top-performers", query.pairs())
            .await?;
        Ok(payload.into_page(limit, offset))
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the request or payload decoding.
    pub async fn risk(&self, query: &DashboardQuery) -> Result<Vec<RiskEntry>, ApiError> {
        self.get_data("dashboard/risk", query.pairs()).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the request or payload decoding.
    pub async fn variance(&self, query: &DashboardQuery) -> Result<Variance, ApiError> {
        self.get_data("dashboard/variance", query.pairs()).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the request or payload decoding.
    pub async fn customer_overview(
        &self,
        query: &DashboardQuery,
    ) -> Result<CustomerOverview, ApiError> {
        self.get_data("dashboard/customer-overview", query.pairs()).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the request or payload decoding.
    pub async fn customer_channels(
        &self,
        query: &DashboardQuery,
    ) -> Result<Vec<CustomerChannel>, ApiError> {
        self.get_data("dashboard/customer-channels", query.pairs()).await
    }

    /// Data freshness report from `GET /dashboard/data-health`, returned
    /// untyped since its fields vary between deployments.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or payload decoding.
    pub async fn data_health(&self) -> Result<serde_json::Value, ApiError> {
        self.get_data("dashboard/data-health", &[]).await
    }

    /// Probes `GET /health` at the server origin without credentials.
    ///
    /// A 2xx response counts as healthy even if the body is not JSON.
    ///
    /// # Errors
    ///
    /// [`ApiError::Http`] when unreachable, or a status error for non-2xx.
    pub async fn health(&self) -> Result<HealthReport, ApiError> {
        let url = self.health_url().clone();
        tracing::debug!(method = "GET", url = %url, "api request");
        let response = self.http().get(url).send().await?;
        let response = check_status("health", response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body).unwrap_or_else(|_| HealthReport {
            status: Some("ok".to_string()),
            ..HealthReport::default()
        }))
    }
}
