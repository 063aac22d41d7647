//! Margin variance drivers.

use bizpulse_client::{ApiClient, ApiError, DashboardQuery, Variance};
use bizpulse_core::{round_to, FilterSelection};
use serde::Serialize;

/// Variance components are clamped to this magnitude (percentage points).
const VARIANCE_BOUND: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarianceDriver {
    pub driver: &'static str,
    pub value: f64,
    pub description: &'static str,
}

impl VarianceDriver {
    #[must_use]
    pub fn is_favourable(&self) -> bool {
        self.value >= 0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VarianceBreakdown {
    pub drivers: Vec<VarianceDriver>,
    pub total: f64,
}

/// Clamps to ±50 and rounds to one decimal. Non-finite input becomes zero.
#[must_use]
pub fn normalize_variance(value: f64) -> f64 {
    if value.is_finite() {
        round_to(value.clamp(-VARIANCE_BOUND, VARIANCE_BOUND), 1)
    } else {
        0.0
    }
}

#[must_use]
pub fn variance_breakdown(variance: &Variance) -> VarianceBreakdown {
    let driver = |name: &'static str, raw: f64, up: &'static str, down: &'static str| {
        let mut driver = VarianceDriver {
            driver: name,
            value: normalize_variance(raw),
            description: up,
        };
        if !driver.is_favourable() {
            driver.description = down;
        }
        driver
    };

    VarianceBreakdown {
        drivers: vec![
            driver(
                "Volume Impact",
                variance.volume_variance,
                "Higher sales volume",
                "Lower sales volume",
            ),
            driver(
                "Price Changes",
                variance.price_variance,
                "Price optimization",
                "Price pressure",
            ),
            driver(
                "Cost Impact",
                variance.cost_variance,
                "Cost reduction",
                "Cost increases",
            ),
            driver(
                "Mix Impact",
                variance.mix_variance,
                "Favorable product mix",
                "Unfavorable product mix",
            ),
        ],
        total: normalize_variance(variance.total_variance),
    }
}

/// # Errors
///
/// Any [`ApiError`] from the variance request.
pub async fn load_variance(
    client: &ApiClient,
    filters: &FilterSelection,
) -> Result<VarianceBreakdown, ApiError> {
    let variance = client
        .variance(&DashboardQuery::from_filters(filters))
        .await?;
    Ok(variance_breakdown(&variance))
}
