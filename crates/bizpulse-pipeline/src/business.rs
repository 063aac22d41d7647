//! Business analysis page: KPI summary, the three breakdown tables and the
//! year-comparison charts.

use bizpulse_client::{
    ApiClient, ApiError, BusinessArea, Channel, ChartKind, DashboardQuery, Overview,
    PerformanceRecord, YearComparisonRow,
};
use bizpulse_core::{ChartFilters, FilterSelection};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub total_revenue: f64,
    pub total_profit: f64,
    /// Average margin when served, the aggregate margin otherwise.
    pub margin: f64,
    pub total_cases: f64,
    pub growth_rate: f64,
}

impl From<&Overview> for KpiSummary {
    fn from(overview: &Overview) -> Self {
        let margin = match (overview.avg_margin, overview.margin) {
            (None, None) => overview.total_margin,
            _ => overview.average_margin(),
        };
        Self {
            total_revenue: overview.total_revenue,
            total_profit: overview.total_profit,
            margin,
            total_cases: overview.total_cases,
            growth_rate: overview.growth_rate,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessAnalysis {
    pub business_areas: Vec<BusinessArea>,
    pub channels: Vec<Channel>,
    pub performance: Vec<PerformanceRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPanel {
    pub title: &'static str,
    #[serde(skip)]
    pub kind: ChartKind,
    pub rows: Vec<YearComparisonRow>,
}

impl ChartPanel {
    /// Year columns present in any row, oldest first.
    #[must_use]
    pub fn years(&self) -> Vec<&str> {
        let mut years: Vec<&str> = self
            .rows
            .iter()
            .flat_map(|row| row.values.keys().map(String::as_str))
            .collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}

/// # Errors
///
/// Any [`ApiError`] from the overview request.
pub async fn load_kpis(
    client: &ApiClient,
    filters: &FilterSelection,
) -> Result<KpiSummary, ApiError> {
    let overview = client
        .overview(&DashboardQuery::from_filters(filters))
        .await?;
    Ok(KpiSummary::from(&overview))
}

/// Business areas, channels and performance rows, fetched concurrently.
///
/// # Errors
///
/// The first [`ApiError`] of the three requests.
pub async fn load_business_analysis(
    client: &ApiClient,
    filters: &FilterSelection,
) -> Result<BusinessAnalysis, ApiError> {
    let query = DashboardQuery::from_filters(filters);
    let (business_areas, channels, performance) = futures::try_join!(
        client.business_areas(&query),
        client.channels(&query),
        client.performance_data(&query),
    )?;
    Ok(BusinessAnalysis {
        business_areas,
        channels,
        performance,
    })
}

/// All six year-comparison charts. A chart that fails to load is shown
/// empty; the others are unaffected.
pub async fn load_year_charts(client: &ApiClient, filters: &ChartFilters) -> Vec<ChartPanel> {
    let requests = ChartKind::ALL.into_iter().map(|kind| async move {
        let rows = match client.chart(kind, filters).await {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!(chart = kind.path(), error = %err, "chart unavailable");
                Vec::new()
            }
        };
        ChartPanel {
            title: kind.title(),
            kind,
            rows,
        }
    });
    futures::future::join_all(requests).await
}
