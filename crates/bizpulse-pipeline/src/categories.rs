//! Category performance matrix and overview cards.

use bizpulse_client::{ApiClient, ApiError, CategoryRecord, DashboardQuery, Overview};
use bizpulse_core::FilterSelection;
use serde::Serialize;

use crate::ranking::TrendDirection;

const UNKNOWN: &str = "Unknown";
/// Growth (percent) beyond which a category trends up or down.
const TREND_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Performance {
    High,
    Medium,
    Low,
}

impl Performance {
    /// Uses the server's rating when it is one of `high`/`medium`/`low`,
    /// otherwise rates by growth (> 10 high, < 0 low).
    #[must_use]
    pub fn rate(server: Option<&str>, growth: f64) -> Self {
        match server.map(str::to_ascii_lowercase).as_deref() {
            Some("high") => Performance::High,
            Some("medium") => Performance::Medium,
            Some("low") => Performance::Low,
            _ if growth > 10.0 => Performance::High,
            _ if growth < 0.0 => Performance::Low,
            _ => Performance::Medium,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Performance::High => "high",
            Performance::Medium => "medium",
            Performance::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRow {
    pub category: String,
    pub business_area: String,
    pub revenue: f64,
    pub margin: f64,
    pub growth: f64,
    /// Percent of the revenue of all returned categories.
    pub market_share: f64,
    pub performance: Performance,
    pub trend: TrendDirection,
    pub sub_categories: u32,
}

/// Derives the matrix rows, sorted by revenue, highest first.
#[must_use]
pub fn category_matrix(records: &[CategoryRecord]) -> Vec<CategoryRow> {
    let total: f64 = records.iter().map(|r| r.revenue).sum();

    let mut rows: Vec<CategoryRow> = records
        .iter()
        .map(|record| CategoryRow {
            category: non_empty_or_unknown(record.category.as_deref()),
            business_area: non_empty_or_unknown(Some(&record.business_area)),
            revenue: record.revenue,
            margin: record.margin,
            growth: record.growth,
            market_share: if total > 0.0 {
                record.revenue / total * 100.0
            } else {
                0.0
            },
            performance: Performance::rate(record.performance.as_deref(), record.growth),
            trend: TrendDirection::from_growth(record.growth, TREND_THRESHOLD),
            sub_categories: record.sub_categories,
        })
        .collect();

    rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    rows
}

fn non_empty_or_unknown(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCategory {
    pub name: String,
    pub revenue: f64,
    /// Percent of total revenue.
    pub share: f64,
    pub growth: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOverview {
    pub total_categories: usize,
    /// Categories with positive revenue.
    pub active_categories: usize,
    pub total_revenue: f64,
    pub average_revenue: f64,
    pub top_category: Option<TopCategory>,
}

/// Overview cards from the category list and the headline totals.
#[must_use]
pub fn category_overview(records: &[CategoryRecord], overview: &Overview) -> CategoryOverview {
    let total_revenue = overview.total_revenue;
    let total_categories = records.len();
    let active_categories = records.iter().filter(|r| r.revenue > 0.0).count();

    let top_category = records
        .iter()
        .filter(|r| r.revenue > 0.0)
        .max_by(|a, b| a.revenue.total_cmp(&b.revenue))
        .map(|top| TopCategory {
            name: non_empty_or_unknown(top.category.as_deref()),
            revenue: top.revenue,
            share: if total_revenue > 0.0 {
                top.revenue / total_revenue * 100.0
            } else {
                0.0
            },
            growth: top.growth,
        });

    #[allow(clippy::cast_precision_loss)]
    let average_revenue = if total_categories > 0 {
        total_revenue / total_categories as f64
    } else {
        0.0
    };

    CategoryOverview {
        total_categories,
        active_categories,
        total_revenue,
        average_revenue,
        top_category,
    }
}

/// # Errors
///
/// Any [`ApiError`] from the categories request.
pub async fn load_category_matrix(
    client: &ApiClient,
    filters: &FilterSelection,
) -> Result<Vec<CategoryRow>, ApiError> {
    let records = client
        .categories(&DashboardQuery::from_filters(filters))
        .await?;
    Ok(category_matrix(&records))
}

/// Fetches categories and the overview concurrently.
///
/// # Errors
///
/// The first [`ApiError`] of the two requests.
pub async fn load_category_overview(
    client: &ApiClient,
    filters: &FilterSelection,
) -> Result<CategoryOverview, ApiError> {
    let query = DashboardQuery::from_filters(filters);
    let (records, overview) =
        futures::try_join!(client.categories(&query), client.overview(&query))?;
    Ok(category_overview(&records, &overview))
}
