//! Top-N widgets: ranked rows, share of the displayed set and the
//! classification rules for SKUs and customers.

use bizpulse_client::{ApiClient, ApiError, DashboardQuery, RiskEntry, TopPerformer};
use bizpulse_core::filters::is_restricted;
use bizpulse_core::{round_to, Dimension, FilterSelection, Metric, PageCursor, Paginated};
use serde::Serialize;

/// Number of customers on the customer page's top list.
pub const TOP_CUSTOMERS_LIMIT: u64 = 10;
/// Brands fetched for the share widget and how many are displayed.
pub const BRAND_SHARE_FETCH: u64 = 50;
pub const BRAND_SHARE_DISPLAY: usize = 5;
/// At-risk customers shown.
pub const AT_RISK_DISPLAY: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedRow {
    /// 1-based position in the full ranking.
    pub rank: u64,
    pub name: String,
    pub value: f64,
    pub growth: f64,
    /// Percent of the displayed rows' combined value.
    pub share: f64,
}

/// Slices a server-ranked list to `display` rows and attaches shares.
///
/// Shares are `value / Σ displayed values × 100`; the API reports no grand
/// total. A zero denominator gives zero shares.
#[must_use]
pub fn top_n_with_share(items: &[TopPerformer], display: usize) -> Vec<RankedRow> {
    let shown = &items[..items.len().min(display)];
    let denominator: f64 = shown.iter().map(|item| item.value).sum();

    shown
        .iter()
        .zip(1_u64..)
        .map(|(item, rank)| RankedRow {
            rank,
            name: item.name.clone(),
            value: item.value,
            growth: item.growth,
            share: if denominator > 0.0 {
                item.value / denominator * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    /// Up above `threshold`, down below `-threshold`, stable otherwise.
    #[must_use]
    pub fn from_growth(growth: f64, threshold: f64) -> Self {
        if growth > threshold {
            TrendDirection::Up
        } else if growth < -threshold {
            TrendDirection::Down
        } else {
            TrendDirection::Stable
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
            TrendDirection::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    /// Declining SKUs are high risk; small ones (under €10,000) medium.
    #[must_use]
    pub fn for_sku(value: f64, growth: f64) -> Self {
        if growth < 0.0 {
            RiskLevel::High
        } else if value < 10_000.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::High => "high",
            RiskLevel::Medium => "medium",
            RiskLevel::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Growing,
    Declining,
    Stable,
}

impl CustomerStatus {
    #[must_use]
    pub fn from_growth(growth: f64) -> Self {
        if growth > 10.0 {
            CustomerStatus::Growing
        } else if growth < 0.0 {
            CustomerStatus::Declining
        } else {
            CustomerStatus::Stable
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CustomerStatus::Growing => "growing",
            CustomerStatus::Declining => "declining",
            CustomerStatus::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkuRow {
    pub rank: u64,
    pub name: String,
    pub revenue: f64,
    pub growth: f64,
    pub share: f64,
    pub trend: TrendDirection,
    pub risk: RiskLevel,
}

/// Classifies one page of SKUs. Ranks continue across pages.
#[must_use]
pub fn sku_rows(items: &[TopPerformer], offset: u64) -> Vec<SkuRow> {
    top_n_with_share(items, items.len())
        .into_iter()
        .map(|row| SkuRow {
            rank: offset.saturating_add(row.rank),
            trend: TrendDirection::from_growth(row.growth, 0.0),
            risk: RiskLevel::for_sku(row.value, row.growth),
            name: row.name,
            revenue: row.value,
            growth: row.growth,
            share: row.share,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRow {
    pub rank: u64,
    pub name: String,
    /// Selected channel, empty when unrestricted.
    pub channel: String,
    pub revenue: f64,
    pub growth: f64,
    pub share: f64,
    pub status: CustomerStatus,
}

#[must_use]
pub fn customer_rows(items: &[TopPerformer], offset: u64, channel: &str) -> Vec<CustomerRow> {
    let channel = if is_restricted(channel) { channel } else { "" };
    top_n_with_share(items, items.len())
        .into_iter()
        .map(|row| CustomerRow {
            rank: offset.saturating_add(row.rank),
            status: CustomerStatus::from_growth(row.growth),
            name: row.name,
            channel: channel.to_string(),
            revenue: row.value,
            growth: row.growth,
            share: row.share,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtRiskCustomer {
    pub name: String,
    pub channel: String,
    pub revenue: f64,
    /// Negative trend rounded to one decimal, zero when not declining.
    pub decline: f64,
    pub risk_level: String,
}

#[must_use]
pub fn at_risk_customers(entries: &[RiskEntry], channel: &str) -> Vec<AtRiskCustomer> {
    let channel = if is_restricted(channel) { channel } else { "" };
    entries
        .iter()
        .take(AT_RISK_DISPLAY)
        .map(|entry| AtRiskCustomer {
            name: entry.name.clone(),
            channel: channel.to_string(),
            revenue: entry.value,
            decline: if entry.trend < 0.0 {
                round_to(entry.trend, 1)
            } else {
                0.0
            },
            risk_level: entry.risk_level.clone(),
        })
        .collect()
}

/// Top customers plus the at-risk list shown beside them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomerRanking {
    pub top: Vec<CustomerRow>,
    pub at_risk: Vec<AtRiskCustomer>,
}

fn ranking_query(filters: &FilterSelection, dimension: Dimension) -> DashboardQuery {
    DashboardQuery::from_filters(filters)
        .dimension(dimension)
        .metric(Metric::GSales)
}

/// One page of top SKUs by gross sales.
///
/// # Errors
///
/// Any [`ApiError`] from the top-performers request.
pub async fn load_top_skus(
    client: &ApiClient,
    filters: &FilterSelection,
    cursor: &PageCursor,
) -> Result<Paginated<SkuRow>, ApiError> {
    let page = client
        .top_performers(&ranking_query(filters, Dimension::Sku).page(cursor))
        .await?;
    Ok(Paginated {
        data: sku_rows(&page.data, cursor.offset()),
        pagination: page.pagination,
    })
}

/// One page of top customers by gross sales.
///
/// # Errors
///
/// Any [`ApiError`] from the top-performers request.
pub async fn load_top_customers(
    client: &ApiClient,
    filters: &FilterSelection,
    cursor: &PageCursor,
) -> Result<Paginated<CustomerRow>, ApiError> {
    let page = client
        .top_performers(&ranking_query(filters, Dimension::Customer).page(cursor))
        .await?;
    Ok(Paginated {
        data: customer_rows(&page.data, cursor.offset(), filters.channel()),
        pagination: page.pagination,
    })
}

/// Top ten customers and the at-risk list, fetched concurrently.
///
/// # Errors
///
/// The first [`ApiError`] of the two requests.
pub async fn load_customer_ranking(
    client: &ApiClient,
    filters: &FilterSelection,
) -> Result<CustomerRanking, ApiError> {
    let top_query = ranking_query(filters, Dimension::Customer).limit(TOP_CUSTOMERS_LIMIT);
    let risk_query = DashboardQuery::from_filters(filters)
        .dimension(Dimension::Customer)
        .limit(TOP_CUSTOMERS_LIMIT);

    let (top, risk) = futures::try_join!(
        client.top_performers(&top_query),
        client.risk(&risk_query)
    )?;
    Ok(CustomerRanking {
        top: customer_rows(&top.data, 0, filters.channel()),
        at_risk: at_risk_customers(&risk, filters.channel()),
    })
}

/// Brand share: top 50 brands fetched, top five shown with shares of those five.
///
/// # Errors
///
/// Any [`ApiError`] from the top-performers request.
pub async fn load_brand_share(
    client: &ApiClient,
    filters: &FilterSelection,
) -> Result<Vec<RankedRow>, ApiError> {
    let page = client
        .top_performers(&ranking_query(filters, Dimension::Brand).limit(BRAND_SHARE_FETCH))
        .await?;
    Ok(top_n_with_share(&page.data, BRAND_SHARE_DISPLAY))
}
