//! Customer overview cards and channel share.

use bizpulse_client::{
    ApiClient, ApiError, CustomerChannel, CustomerOverview, DashboardQuery, MetricCard,
};
use bizpulse_core::FilterSelection;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewCard {
    pub title: &'static str,
    pub value: String,
    /// Change against the previous period as served, e.g. `"+12"`.
    pub change: String,
    pub change_percent: f64,
    pub details: Option<serde_json::Value>,
}

impl OverviewCard {
    fn from_metric(title: &'static str, metric: &MetricCard) -> Self {
        Self {
            title,
            value: metric.value.to_string(),
            change: metric.change.clone(),
            change_percent: metric.change_percent,
            details: metric.details.clone(),
        }
    }
}

/// Cards in display order; metrics the server omitted are skipped.
#[must_use]
pub fn customer_cards(overview: &CustomerOverview) -> Vec<OverviewCard> {
    [
        ("Total Customers", &overview.total_customers),
        ("Customer Revenue", &overview.customer_revenue),
        ("Avg Customer Value", &overview.avg_customer_value),
        ("Customer Retention", &overview.customer_retention),
    ]
    .into_iter()
    .filter_map(|(title, metric)| {
        metric
            .as_ref()
            .map(|metric| OverviewCard::from_metric(title, metric))
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelShare {
    pub name: String,
    /// Percent of revenue across the listed channels.
    pub share: f64,
    pub revenue: f64,
    pub customers: u64,
    /// Revenue per customer; zero for a channel without customers.
    pub average_customer_value: f64,
}

/// Revenue share per channel over the channels returned.
///
/// When the channels carry no revenue at all, the server's own share
/// (`value`) is kept.
#[must_use]
pub fn channel_shares(channels: &[CustomerChannel]) -> Vec<ChannelShare> {
    let total: f64 = channels.iter().map(|c| c.revenue).sum();
    channels
        .iter()
        .map(|channel| {
            #[allow(clippy::cast_precision_loss)]
            let average_customer_value = if channel.customers > 0 {
                channel.revenue / channel.customers as f64
            } else {
                0.0
            };
            ChannelShare {
                name: channel.name.clone(),
                share: if total > 0.0 {
                    channel.revenue / total * 100.0
                } else {
                    channel.value
                },
                revenue: channel.revenue,
                customers: channel.customers,
                average_customer_value,
            }
        })
        .collect()
}

/// # Errors
///
/// Any [`ApiError`] from the customer-overview request.
pub async fn load_customer_cards(
    client: &ApiClient,
    filters: &FilterSelection,
) -> Result<Vec<OverviewCard>, ApiError> {
    let overview = client
        .customer_overview(&DashboardQuery::from_filters(filters))
        .await?;
    Ok(customer_cards(&overview))
}

/// # Errors
///
/// Any [`ApiError`] from the customer-channels request.
pub async fn load_channel_shares(
    client: &ApiClient,
    filters: &FilterSelection,
) -> Result<Vec<ChannelShare>, ApiError> {
    let channels = client
        .customer_channels(&DashboardQuery::from_filters(filters))
        .await?;
    Ok(channel_shares(&channels))
}
