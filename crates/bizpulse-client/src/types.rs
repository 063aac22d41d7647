//! BizPulse API payload types.
//!
//! Dashboard responses wrap their payload as `{"data": ...}`; [`Envelope`]
//! strips that layer. Shapes the backend serves in more than one form are
//! modelled as untagged enums and collapsed at the client boundary so
//! callers only ever see one type per endpoint.

use std::collections::BTreeMap;
use std::fmt;

use bizpulse_core::{Paginated, Pagination};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `{"data": T}` wrapper shared by every dashboard, auth and admin response.
/// A missing or `null` payload decodes as `None`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: Option<T>,
}

// ---------------------------------------------------------------------------
// auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthTokens {
    #[serde(alias = "accessToken")]
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

// ---------------------------------------------------------------------------
// dashboard/overview
// ---------------------------------------------------------------------------

/// Headline totals for the current filter selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Overview {
    pub total_revenue: f64,
    pub total_profit: f64,
    pub total_margin: f64,
    pub avg_margin: Option<f64>,
    pub margin: Option<f64>,
    pub total_cases: f64,
    pub growth_rate: f64,
}

impl Overview {
    /// `avgMargin`, falling back to `margin`, then zero.
    #[must_use]
    pub fn average_margin(&self) -> f64 {
        self.avg_margin.or(self.margin).unwrap_or(0.0)
    }
}

/// The overview is served either flat or nested under `overview`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OverviewPayload {
    Nested { overview: Overview },
    Flat(Overview),
}

impl Default for OverviewPayload {
    fn default() -> Self {
        OverviewPayload::Flat(Overview::default())
    }
}

impl From<OverviewPayload> for Overview {
    fn from(payload: OverviewPayload) -> Self {
        match payload {
            OverviewPayload::Nested { overview } | OverviewPayload::Flat(overview) => overview,
        }
    }
}

// ---------------------------------------------------------------------------
// business-areas / channels / performance-data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessArea {
    pub name: String,
    pub revenue: f64,
    pub cost: f64,
    pub volume: f64,
    pub margin: f64,
    pub growth: f64,
    pub brands: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Channel {
    pub name: String,
    pub revenue: f64,
    pub cost: f64,
    pub volume: f64,
    pub margin: f64,
    pub growth: f64,
    pub customers: Vec<String>,
    pub region: String,
}

/// One fact row of the performance table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceRecord {
    pub business_area: String,
    pub brand: String,
    pub category: String,
    pub sub_category: String,
    pub channel: String,
    pub customer: String,
    pub revenue: f64,
    pub cost: f64,
    pub volume: f64,
    pub margin: f64,
}

// ---------------------------------------------------------------------------
// filter-options
// ---------------------------------------------------------------------------

/// Raw option lists; dropdowns are built from these by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub months: Vec<String>,
    pub channels: Vec<String>,
    pub business_areas: Vec<String>,
    pub brands: Vec<String>,
    pub categories: Vec<String>,
}

// ---------------------------------------------------------------------------
// categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryRecord {
    pub category: Option<String>,
    pub business_area: String,
    pub revenue: f64,
    pub margin: f64,
    pub growth: f64,
    /// Server-side rating (`high` / `medium` / `low`) when provided.
    pub performance: Option<String>,
    /// Number of sub-categories under this category.
    pub sub_categories: u32,
}

// ---------------------------------------------------------------------------
// trend / top-performers / risk / variance
// ---------------------------------------------------------------------------

/// One point of a metric series, keyed by its period label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrendPoint {
    pub period: String,
    pub value: f64,
    pub change_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopPerformer {
    pub name: String,
    pub value: f64,
    pub growth: f64,
}

/// Top performers arrive either paged (`{data, pagination}`) or as a bare list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TopPerformersPayload {
    Paged {
        data: Vec<TopPerformer>,
        #[serde(default)]
        pagination: Option<Pagination>,
    },
    List(Vec<TopPerformer>),
}

impl Default for TopPerformersPayload {
    fn default() -> Self {
        TopPerformersPayload::List(Vec::new())
    }
}

impl TopPerformersPayload {
    /// Normalises to a page. A bare list gets metadata derived from the
    /// requested window since the server did not report a total.
    pub(crate) fn into_page(self, limit: u64, offset: u64) -> Paginated<TopPerformer> {
        match self {
            TopPerformersPayload::Paged {
                data,
                pagination: Some(pagination),
            } => Paginated { data, pagination },
            TopPerformersPayload::Paged {
                data,
                pagination: None,
            }
            | TopPerformersPayload::List(data) => {
                let total = offset.saturating_add(data.len() as u64);
                let mut pagination = Pagination::compute(total, limit, offset);
                pagination.has_more = false;
                Paginated { data, pagination }
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskEntry {
    pub name: String,
    pub value: f64,
    /// Growth trend in percent; negative means declining.
    pub trend: f64,
    pub risk_level: String,
}

/// Margin variance components in percentage points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Variance {
    pub volume_variance: f64,
    pub price_variance: f64,
    pub cost_variance: f64,
    pub mix_variance: f64,
    pub total_variance: f64,
}

// ---------------------------------------------------------------------------
// customer-overview / customer-channels
// ---------------------------------------------------------------------------

/// Card value as served: either a number or a preformatted string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardValue {
    Number(f64),
    Text(String),
}

impl Default for CardValue {
    fn default() -> Self {
        CardValue::Text(String::new())
    }
}

impl fmt::Display for CardValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardValue::Number(n) => write!(f, "{n}"),
            CardValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricCard {
    pub value: CardValue,
    /// Preformatted change against the previous period, e.g. `"+12"`.
    pub change: String,
    pub change_percent: f64,
    /// Free-form drill-down details.
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerOverview {
    pub total_customers: Option<MetricCard>,
    pub customer_revenue: Option<MetricCard>,
    pub avg_customer_value: Option<MetricCard>,
    pub customer_retention: Option<MetricCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerChannel {
    pub name: String,
    /// Share of revenue in percent, when the server computes it.
    pub value: f64,
    pub revenue: f64,
    pub customers: u64,
}

// ---------------------------------------------------------------------------
// admin / health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UsersPayload {
    #[serde(default)]
    pub users: Vec<User>,
}

/// Where the export file lives in blob storage and whether it exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureStatus {
    pub azure_url: String,
    pub file_exists: bool,
    pub file_properties: Option<serde_json::Value>,
    #[serde(rename = "allFilesInBizPulse")]
    pub all_files: Vec<String>,
    pub local_file_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadResult {
    pub success: Option<bool>,
    pub message: Option<String>,
}

/// Health probe body. Fields beyond `status` are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthReport {
    pub status: Option<String>,
    #[serde(flatten)]
    pub details: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_accepts_nested_and_flat_shapes() {
        let nested: OverviewPayload =
            serde_json::from_str(r#"{"overview": {"totalRevenue": 10.0, "margin": 4.0}}"#)
                .unwrap();
        let flat: OverviewPayload =
            serde_json::from_str(r#"{"totalRevenue": 12.0, "avgMargin": 3.5}"#).unwrap();

        let nested = Overview::from(nested);
        let flat = Overview::from(flat);
        assert!((nested.total_revenue - 10.0).abs() < f64::EPSILON);
        assert!((nested.average_margin() - 4.0).abs() < f64::EPSILON);
        assert!((flat.total_revenue - 12.0).abs() < f64::EPSILON);
        assert!((flat.average_margin() - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn top_performers_bare_list_becomes_single_page() {
        let payload: TopPerformersPayload =
            serde_json::from_str(r#"[{"name": "A", "value": 5}, {"name": "B", "value": 3}]"#)
                .unwrap();
        let page = payload.into_page(10, 0);
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.pagination.total_pages, 1);
        assert!(!page.pagination.has_more);
    }

    #[test]
    fn bare_list_at_extreme_offset_does_not_overflow() {
        let payload: TopPerformersPayload =
            serde_json::from_str(r#"[{"name": "A", "value": 5}]"#).unwrap();
        let page = payload.into_page(1, u64::MAX);
        assert_eq!(page.pagination.total, u64::MAX);
        assert_eq!(page.pagination.current_page, u64::MAX);
        assert!(!page.pagination.has_more);
    }

    #[test]
    fn top_performers_paged_keeps_server_pagination() {
        let payload: TopPerformersPayload = serde_json::from_str(
            r#"{"data": [{"name": "A", "value": 5, "growth": 2}],
                "pagination": {"total": 41, "limit": 20, "offset": 20, "hasMore": true,
                               "totalPages": 3, "currentPage": 2}}"#,
        )
        .unwrap();
        let page = payload.into_page(20, 20);
        assert_eq!(page.pagination.total, 41);
        assert_eq!(page.pagination.current_page, 2);
        assert!(page.pagination.has_more);
    }

    #[test]
    fn card_value_accepts_number_or_text() {
        let card: MetricCard =
            serde_json::from_str(r#"{"value": "€1.2M", "change": "+5", "changePercent": 3.1}"#)
                .unwrap();
        assert_eq!(card.value.to_string(), "€1.2M");
        let card: MetricCard = serde_json::from_str(r#"{"value": 128}"#).unwrap();
        assert_eq!(card.value, CardValue::Number(128.0));
    }

    #[test]
    fn user_timestamps_parse_as_utc() {
        let user: User = serde_json::from_str(
            r#"{"id": "u-1", "email": "a@b.c", "roles": ["admin"],
                "createdAt": "2024-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(user.roles, vec!["admin".to_string()]);
        assert!(user.created_at.is_some());
        assert!(user.updated_at.is_none());
    }
}
