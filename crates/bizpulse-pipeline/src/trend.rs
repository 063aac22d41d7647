//! Merging parallel metric series into chart rows.
//!
//! One series (revenue) is the index of period labels. Every other series is
//! looked up by exact label; a missing label contributes zero. Ratios are
//! derived after the merge.

use std::collections::{HashMap, HashSet};

use bizpulse_client::{ApiClient, ApiError, DashboardQuery, TrendPoint};
use bizpulse_core::{round_to, FilterSelection, Metric};
use serde::Serialize;

/// One label of a merged set of series.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedPoint {
    pub label: String,
    /// Value of the index series followed by each other series, in the
    /// order they were passed. Missing values are zero.
    pub values: Vec<f64>,
    /// Change percent reported on the index series.
    pub change_percent: Option<f64>,
}

/// Merges `others` onto the labels of `index`.
///
/// Labels keep the index series' first-seen order and appear once; when a
/// series repeats a label, its first occurrence wins.
#[must_use]
pub fn merge_series_by_label(index: &[TrendPoint], others: &[&[TrendPoint]]) -> Vec<MergedPoint> {
    let lookups: Vec<HashMap<&str, f64>> =
        others.iter().map(|series| first_by_label(series)).collect();

    let mut seen = HashSet::new();
    index
        .iter()
        .filter(|point| seen.insert(point.period.as_str()))
        .map(|point| {
            let mut values = Vec::with_capacity(1 + lookups.len());
            values.push(point.value);
            values.extend(
                lookups
                    .iter()
                    .map(|lookup| lookup.get(point.period.as_str()).copied().unwrap_or(0.0)),
            );
            MergedPoint {
                label: point.period.clone(),
                values,
                change_percent: point.change_percent,
            }
        })
        .collect()
}

fn first_by_label(series: &[TrendPoint]) -> HashMap<&str, f64> {
    let mut lookup = HashMap::with_capacity(series.len());
    for point in series {
        lookup.entry(point.period.as_str()).or_insert(point.value);
    }
    lookup
}

/// Monthly performance row for the brand trend chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendRow {
    pub month: String,
    pub revenue: f64,
    pub units: f64,
    /// Gross profit over revenue in percent, one decimal; zero without revenue.
    pub margin: f64,
    /// Revenue change percent, one decimal.
    pub growth: f64,
}

/// Builds trend rows from revenue, cases and gross-profit series.
#[must_use]
pub fn brand_trend_rows(
    revenue: &[TrendPoint],
    cases: &[TrendPoint],
    profit: &[TrendPoint],
) -> Vec<TrendRow> {
    merge_series_by_label(revenue, &[cases, profit])
        .into_iter()
        .map(|point| {
            let (rev, units, gp) = (point.values[0], point.values[1], point.values[2]);
            let margin = if rev > 0.0 { gp / rev * 100.0 } else { 0.0 };
            TrendRow {
                month: point.label,
                revenue: rev,
                units,
                margin: round_to(margin, 1),
                growth: round_to(point.change_percent.unwrap_or(0.0), 1),
            }
        })
        .collect()
}

/// Fetches the gSales, Cases and fGP trends concurrently and merges them.
///
/// # Errors
///
/// The first [`ApiError`] among the three requests.
pub async fn load_brand_trend(
    client: &ApiClient,
    filters: &FilterSelection,
) -> Result<Vec<TrendRow>, ApiError> {
    let base = DashboardQuery::from_filters(filters);
    let revenue_query = base.clone().metric(Metric::GSales);
    let cases_query = base.clone().metric(Metric::Cases);
    let profit_query = base.metric(Metric::Fgp);

    let (revenue, cases, profit) = futures::try_join!(
        client.trend(&revenue_query),
        client.trend(&cases_query),
        client.trend(&profit_query),
    )?;
    Ok(brand_trend_rows(&revenue, &cases, &profit))
}
