//! Paginated drill-down from a summary widget into its full ranking.

use std::fmt;
use std::str::FromStr;

use bizpulse_client::{ApiClient, DashboardQuery};
use bizpulse_core::{Dimension, FilterSelection, Metric, PageCursor, Paginated};
use serde::Serialize;
use thiserror::Error;

use crate::ranking::{top_n_with_share, RankedRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrillDownKind {
    Skus,
    Customers,
    Brands,
    Categories,
    Channels,
}

impl DrillDownKind {
    #[must_use]
    pub fn dimension(self) -> Dimension {
        match self {
            DrillDownKind::Skus => Dimension::Sku,
            DrillDownKind::Customers => Dimension::Customer,
            DrillDownKind::Brands => Dimension::Brand,
            DrillDownKind::Categories => Dimension::Category,
            DrillDownKind::Channels => Dimension::Channel,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DrillDownKind::Skus => "skus",
            DrillDownKind::Customers => "customers",
            DrillDownKind::Brands => "brands",
            DrillDownKind::Categories => "categories",
            DrillDownKind::Channels => "channels",
        }
    }
}

impl fmt::Display for DrillDownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown drill-down '{0}' (expected skus, customers, brands, categories or channels)")]
pub struct UnknownDrillDown(pub String);

impl FromStr for DrillDownKind {
    type Err = UnknownDrillDown;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skus" | "sku" => Ok(DrillDownKind::Skus),
            "customers" | "customer" => Ok(DrillDownKind::Customers),
            "brands" | "brand" => Ok(DrillDownKind::Brands),
            "categories" | "category" => Ok(DrillDownKind::Categories),
            "channels" | "channel" => Ok(DrillDownKind::Channels),
            _ => Err(UnknownDrillDown(s.to_string())),
        }
    }
}

/// An open drill-down: what is listed, under which filters, at which page.
///
/// The filters are a snapshot taken when the drill-down opened.
#[derive(Debug, Clone)]
pub struct DrillDown {
    kind: DrillDownKind,
    filters: FilterSelection,
    cursor: PageCursor,
}

impl DrillDown {
    #[must_use]
    pub fn new(kind: DrillDownKind, filters: FilterSelection, page_size: u64) -> Self {
        Self {
            kind,
            filters,
            cursor: PageCursor::new(page_size),
        }
    }

    #[must_use]
    pub fn kind(&self) -> DrillDownKind {
        self.kind
    }

    #[must_use]
    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    #[must_use]
    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    pub fn change_page(&mut self, page: u64) {
        self.cursor.change_page(page);
    }

    pub fn change_page_size(&mut self, page_size: u64) {
        self.cursor.change_page_size(page_size);
    }

    fn query(&self) -> DashboardQuery {
        DashboardQuery::from_filters(&self.filters)
            .dimension(self.kind.dimension())
            .metric(Metric::GSales)
            .page(&self.cursor)
    }

    /// Loads the current page. Never fails: a failed request is logged and
    /// shown as an empty page.
    pub async fn load(&self, client: &ApiClient) -> Paginated<RankedRow> {
        match client.top_performers(&self.query()).await {
            Ok(page) => {
                let offset = self.cursor.offset();
                let data = top_n_with_share(&page.data, page.data.len())
                    .into_iter()
                    .map(|row| RankedRow {
                        rank: offset.saturating_add(row.rank),
                        ..row
                    })
                    .collect();
                Paginated {
                    data,
                    pagination: page.pagination,
                }
            }
            Err(err) => {
                tracing::warn!(
                    kind = self.kind.as_str(),
                    page = self.cursor.page(),
                    error = %err,
                    "drill-down failed, showing empty page"
                );
                Paginated::empty(self.cursor.limit())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_leniently() {
        assert_eq!("SKUs".parse(), Ok(DrillDownKind::Skus));
        assert_eq!(" customer ".parse(), Ok(DrillDownKind::Customers));
        assert_eq!("channels".parse(), Ok(DrillDownKind::Channels));
        assert!("regions".parse::<DrillDownKind>().is_err());
    }

    #[test]
    fn unknown_kind_names_the_choices() {
        let err = "regions".parse::<DrillDownKind>().unwrap_err();
        assert_eq!(err, UnknownDrillDown("regions".to_string()));
        let message = err.to_string();
        assert!(message.starts_with("unknown drill-down 'regions'"));
        assert!(message.contains("skus, customers, brands, categories or channels"));
    }

    #[test]
    fn kinds_map_to_dimensions() {
        assert_eq!(DrillDownKind::Skus.dimension().as_str(), "ProdConcat");
        assert_eq!(DrillDownKind::Brands.dimension().as_str(), "Brand");
    }

    #[test]
    fn query_carries_dimension_and_window() {
        let mut filters = FilterSelection::new();
        filters.set_business_area("Food");
        let mut drill = DrillDown::new(DrillDownKind::Categories, filters, 25);
        drill.change_page(3);

        let query = drill.query();
        let pairs = query.pairs();
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("dimension"), Some("Category"));
        assert_eq!(get("metric"), Some("gSales"));
        assert_eq!(get("limit"), Some("25"));
        assert_eq!(get("offset"), Some("50"));
        assert_eq!(get("businessArea"), Some("Food"));
    }

    #[test]
    fn page_size_change_returns_to_first_page() {
        let mut drill = DrillDown::new(DrillDownKind::Skus, FilterSelection::new(), 20);
        drill.change_page(4);
        drill.change_page_size(50);
        assert_eq!(drill.cursor().page(), 1);
        assert_eq!(drill.cursor().offset(), 0);
    }
}
