//! Year-comparison chart endpoints (`POST /dashboard/{fgp,gsales}-*`).
//!
//! Rows come back as flat objects such as
//! `{"business": "Food", "2023": 1.0, "2024": 2.0, "2025": 3.0}`; the year
//! columns vary with the data, so they are collected into a map.

use std::collections::BTreeMap;

use bizpulse_core::ChartFilters;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::ApiClient;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    FgpByBusiness,
    FgpByChannel,
    FgpMonthlyTrend,
    GSalesByBusiness,
    GSalesByChannel,
    GSalesMonthlyTrend,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::FgpByBusiness,
        ChartKind::FgpByChannel,
        ChartKind::FgpMonthlyTrend,
        ChartKind::GSalesByBusiness,
        ChartKind::GSalesByChannel,
        ChartKind::GSalesMonthlyTrend,
    ];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            ChartKind::FgpByBusiness => "dashboard/fgp-by-business",
            ChartKind::FgpByChannel => "dashboard/fgp-by-channel",
            ChartKind::FgpMonthlyTrend => "dashboard/fgp-monthly-trend",
            ChartKind::GSalesByBusiness => "dashboard/gsales-by-business",
            ChartKind::GSalesByChannel => "dashboard/gsales-by-channel",
            ChartKind::GSalesMonthlyTrend => "dashboard/gsales-monthly-trend",
        }
    }

    /// Field holding each row's label.
    #[must_use]
    pub fn label_key(self) -> &'static str {
        match self {
            ChartKind::FgpByBusiness | ChartKind::GSalesByBusiness => "business",
            ChartKind::FgpByChannel | ChartKind::GSalesByChannel => "channel",
            ChartKind::FgpMonthlyTrend | ChartKind::GSalesMonthlyTrend => "month",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            ChartKind::FgpByBusiness => "fGP by business area",
            ChartKind::FgpByChannel => "fGP by channel",
            ChartKind::FgpMonthlyTrend => "fGP monthly trend",
            ChartKind::GSalesByBusiness => "gSales by business area",
            ChartKind::GSalesByChannel => "gSales by channel",
            ChartKind::GSalesMonthlyTrend => "gSales monthly trend",
        }
    }
}

/// One chart row: a label and its value per year (`"2024" -> 1.2e6`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearComparisonRow {
    pub label: String,
    pub values: BTreeMap<String, f64>,
}

impl YearComparisonRow {
    /// Value for `year`, zero when the column is absent.
    #[must_use]
    pub fn value(&self, year: &str) -> f64 {
        self.values.get(year).copied().unwrap_or(0.0)
    }

    fn from_object(label_key: &str, object: &Map<String, Value>) -> Option<Self> {
        let label = match object.get(label_key)? {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let values = object
            .iter()
            .filter(|(key, _)| is_year(key))
            .filter_map(|(key, value)| numeric(value).map(|n| (key.clone(), n)))
            .collect();
        Some(Self { label, values })
    }
}

/// Chart rows arrive bare or wrapped in `{"data": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChartPayload {
    Rows(Vec<Map<String, Value>>),
    Wrapped { data: Vec<Map<String, Value>> },
}

impl ApiClient {
    /// Fetches one year-comparison chart. The multi-select filters are posted
    /// as the JSON body. Rows without a label are dropped.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or payload decoding.
    pub async fn chart(
        &self,
        kind: ChartKind,
        filters: &ChartFilters,
    ) -> Result<Vec<YearComparisonRow>, ApiError> {
        let payload: ChartPayload = self.post_json(kind.path(), filters).await?;
        let objects = match payload {
            ChartPayload::Rows(rows) | ChartPayload::Wrapped { data: rows } => rows,
        };
        let label_key = kind.label_key();
        let total = objects.len();
        let rows: Vec<_> = objects
            .iter()
            .filter_map(|object| YearComparisonRow::from_object(label_key, object))
            .collect();
        if rows.len() < total {
            tracing::warn!(
                chart = kind.path(),
                dropped = total - rows.len(),
                "chart rows without a label were skipped"
            );
        }
        Ok(rows)
    }
}

fn is_year(key: &str) -> bool {
    key.len() == 4 && key.bytes().all(|b| b.is_ascii_digit())
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
