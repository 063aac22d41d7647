//! Filter dropdown options.
//!
//! Periods and months come from the unscoped option lists; business areas,
//! channels, brands and categories are scoped to the selected year (YTD
//! means the current calendar year) and business area. Any failed fetch
//! falls back to the built-in lists.

use bizpulse_client::{ApiClient, FilterOptions};
use bizpulse_core::filters::is_restricted;
use bizpulse_core::{FilterSelection, ALL, YTD};
use chrono::Datelike;
use serde::Serialize;

const FALLBACK_PERIODS: [&str; 4] = [YTD, "2024", "2023", "2022"];
const FALLBACK_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];
const FALLBACK_CHANNELS: [&str; 7] = [
    "Grocery ROI",
    "Grocery NI/UK",
    "Wholesale ROI",
    "Wholesale NI/UK",
    "International",
    "Online",
    "Sports & Others",
];
const FALLBACK_BUSINESS_AREAS: [&str; 4] = ["Food", "Household", "Brillo", "Kinetica"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropdownOptions {
    pub periods: Vec<String>,
    pub months: Vec<String>,
    pub business_areas: Vec<String>,
    pub channels: Vec<String>,
    pub brands: Vec<String>,
    pub categories: Vec<String>,
}

impl Default for DropdownOptions {
    fn default() -> Self {
        Self::fallback()
    }
}

impl DropdownOptions {
    /// Built-in lists used when the option lists cannot be fetched.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            periods: FALLBACK_PERIODS.iter().map(ToString::to_string).collect(),
            months: with_all(FALLBACK_MONTHS),
            business_areas: with_all(FALLBACK_BUSINESS_AREAS),
            channels: with_all(FALLBACK_CHANNELS),
            brands: vec![ALL.to_string()],
            categories: vec![ALL.to_string()],
        }
    }

    /// Dropdowns for one option payload.
    ///
    /// Periods are `YTD` then the years newest first (deduplicated); every
    /// other list is prefixed with `All`.
    #[must_use]
    pub fn from_payload(options: &FilterOptions) -> Self {
        let mut years = options.years.clone();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();

        let mut periods = Vec::with_capacity(years.len() + 1);
        periods.push(YTD.to_string());
        periods.extend(years.iter().map(ToString::to_string));

        Self {
            periods,
            months: with_all(&options.months),
            business_areas: with_all(&options.business_areas),
            channels: with_all(&options.channels),
            brands: with_all(&options.brands),
            categories: with_all(&options.categories),
        }
    }

    /// Overlays the year/business-area scoped lists.
    ///
    /// Empty scoped lists keep the unscoped ones, except channels under a
    /// restricted business area, which collapse to `All` alone.
    fn apply_scoped(&mut self, scoped: &FilterOptions, business_area: &str) {
        if !scoped.business_areas.is_empty() {
            self.business_areas = with_all(&scoped.business_areas);
        }
        if !scoped.channels.is_empty() {
            self.channels = with_all(&scoped.channels);
        } else if is_restricted(business_area) {
            self.channels = vec![ALL.to_string()];
        }
        if !scoped.brands.is_empty() {
            self.brands = with_all(&scoped.brands);
        }
        if !scoped.categories.is_empty() {
            self.categories = with_all(&scoped.categories);
        }
    }
}

fn with_all<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    std::iter::once(ALL.to_string())
        .chain(values.into_iter().map(|v| v.as_ref().to_string()))
        .collect()
}

/// Current calendar year in local time; what YTD resolves to.
#[must_use]
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Fetches unscoped and scoped option lists concurrently and builds the
/// dropdowns. Never fails: each failed fetch falls back independently.
pub async fn load_dropdowns(
    client: &ApiClient,
    filters: &FilterSelection,
    current_year: i32,
) -> DropdownOptions {
    let year = filters.period_year(current_year);
    let (unscoped, scoped) = futures::join!(
        client.filter_options(None, None),
        client.filter_options(year, Some(filters.business_area())),
    );

    let fallback = DropdownOptions::fallback();
    let mut options = match unscoped {
        Ok(payload) => DropdownOptions::from_payload(&payload),
        Err(err) => {
            tracing::warn!(error = %err, "filter options unavailable, using defaults");
            fallback.clone()
        }
    };

    match scoped {
        Ok(payload) => options.apply_scoped(&payload, filters.business_area()),
        Err(err) => {
            tracing::warn!(
                error = %err,
                ?year,
                business_area = filters.business_area(),
                "scoped filter options unavailable, using defaults"
            );
            options.business_areas = fallback.business_areas;
            options.channels = fallback.channels;
        }
    }
    options
}
