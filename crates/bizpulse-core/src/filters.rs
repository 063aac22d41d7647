//! Per-page filter selection.
//!
//! A [`FilterSelection`] is the state every analysis page holds and passes to
//! its widgets. Setters on the parent dimensions perform the cascading resets
//! (business area → brand/channel, period → month); nothing else infers them.
//! Values are not validated against the option lists: unknown values go to
//! the API as-is and the API has the final word.

use serde::{Deserialize, Serialize};

/// Sentinel meaning "no restriction" for a dimension.
pub const ALL: &str = "All";

/// Year-to-date, the default period.
pub const YTD: &str = "YTD";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSelection {
    period: String,
    month: String,
    business_area: String,
    channel: String,
    brand: String,
    category: String,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            period: YTD.to_string(),
            month: ALL.to_string(),
            business_area: ALL.to_string(),
            channel: ALL.to_string(),
            brand: ALL.to_string(),
            category: ALL.to_string(),
        }
    }
}

impl FilterSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn period(&self) -> &str {
        &self.period
    }

    #[must_use]
    pub fn month(&self) -> &str {
        &self.month
    }

    #[must_use]
    pub fn business_area(&self) -> &str {
        &self.business_area
    }

    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    #[must_use]
    pub fn brand(&self) -> &str {
        &self.brand
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Selects a period. Any period other than YTD clears the month.
    pub fn set_period(&mut self, period: impl Into<String>) {
        self.period = period.into();
        if self.period != YTD {
            self.month = ALL.to_string();
        }
    }

    pub fn set_month(&mut self, month: impl Into<String>) {
        self.month = month.into();
    }

    /// Selects a business area and resets the brand and channel that depend on it.
    pub fn set_business_area(&mut self, business_area: impl Into<String>) {
        self.business_area = business_area.into();
        self.brand = ALL.to_string();
        self.channel = ALL.to_string();
    }

    pub fn set_channel(&mut self, channel: impl Into<String>) {
        self.channel = channel.into();
    }

    pub fn set_brand(&mut self, brand: impl Into<String>) {
        self.brand = brand.into();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    /// Restores every dimension to its default ("Reset All").
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Query-string pairs for the dashboard GET endpoints.
    ///
    /// The period is always sent; dimensions left at [`ALL`] are omitted.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("period", self.period.clone())];
        let dims = [
            ("month", &self.month),
            ("businessArea", &self.business_area),
            ("channel", &self.channel),
            ("brand", &self.brand),
            ("category", &self.category),
        ];
        pairs.extend(
            dims.into_iter()
                .filter(|(_, value)| is_restricted(value))
                .map(|(key, value)| (key, value.clone())),
        );
        pairs
    }

    /// Calendar year the period refers to; YTD resolves to `current_year`.
    ///
    /// Returns `None` for periods that are not a year (e.g. `"Q1"`).
    #[must_use]
    pub fn period_year(&self, current_year: i32) -> Option<i32> {
        if self.period == YTD {
            Some(current_year)
        } else {
            self.period.parse().ok()
        }
    }
}

/// `true` when `value` narrows the result set (not empty, not [`ALL`]).
#[must_use]
pub fn is_restricted(value: &str) -> bool {
    !value.is_empty() && value != ALL
}

/// Grouping dimension for the top-performers endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Product SKU (the backend concatenates product fields into one key).
    Sku,
    Customer,
    Brand,
    Category,
    Channel,
}

impl Dimension {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Sku => "ProdConcat",
            Dimension::Customer => "Customer",
            Dimension::Brand => "Brand",
            Dimension::Category => "Category",
            Dimension::Channel => "Channel",
        }
    }
}

/// Measure requested from trend and ranking endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Gross sales.
    GSales,
    Cases,
    /// Full gross profit.
    Fgp,
}

impl Metric {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::GSales => "gSales",
            Metric::Cases => "Cases",
            Metric::Fgp => "fGP",
        }
    }
}

/// Multi-select body for the year-comparison chart endpoints.
///
/// Unlike [`FilterSelection`] every dimension is a list of chosen values,
/// and nothing cascades. The defaults select every option the chart filter
/// panel offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartFilters {
    pub year: Vec<String>,
    pub month: Vec<String>,
    pub business: Vec<String>,
    pub channel: Vec<String>,
    pub brand: Vec<String>,
    pub category: Vec<String>,
    pub customer: Vec<String>,
}

const CHART_YEARS: [&str; 3] = ["2023", "2024", "2025"];

const CHART_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const CHART_BUSINESSES: [&str; 6] = [
    "Brillo, Goddards & KMPL",
    "Cali Cali",
    "Food",
    "Green Aware",
    "Household & Beauty",
    "Kinetica",
];

const CHART_CHANNELS: [&str; 6] = [
    "Convenience",
    "Grocery",
    "International",
    "Online",
    "Sports & Others",
    "Wholesale",
];

const CHART_BRANDS: [&str; 8] = [
    "Asda",
    "Babykind",
    "Bensons",
    "Bonne Maman",
    "Brillo",
    "BV Honey",
    "Koka",
    "McDonnells",
];

const CHART_CATEGORIES: [&str; 9] = [
    "Pickles",
    "Plastic sacks",
    "Polish",
    "Pots",
    "Preserves",
    "Protein Bar",
    "Protein Milk",
    "Shopping bags",
    "Snacking",
];

const CHART_CUSTOMERS: [&str; 9] = [
    "Aldi ROI",
    "Amazon",
    "Australia",
    "Austria",
    "Bahrain",
    "Barry Group",
    "Belgium",
    "BWG",
    "Canada",
];

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

impl Default for ChartFilters {
    fn default() -> Self {
        Self {
            year: owned(&CHART_YEARS),
            month: owned(&CHART_MONTHS),
            business: owned(&CHART_BUSINESSES),
            channel: owned(&CHART_CHANNELS),
            brand: owned(&CHART_BRANDS),
            category: owned(&CHART_CATEGORIES),
            customer: owned(&CHART_CUSTOMERS),
        }
    }
}

impl ChartFilters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
