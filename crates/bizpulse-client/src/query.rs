use bizpulse_core::{Dimension, FilterSelection, Metric, PageCursor};

/// Query-string builder for the dashboard GET endpoints.
///
/// Starts from a [`FilterSelection`] (period always present, unrestricted
/// dimensions omitted) and layers endpoint-specific parameters on top.
/// Setting a key twice replaces the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardQuery {
    pairs: Vec<(&'static str, String)>,
}

impl DashboardQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_filters(filters: &FilterSelection) -> Self {
        Self {
            pairs: filters.query_pairs(),
        }
    }

    #[must_use]
    pub fn dimension(self, dimension: Dimension) -> Self {
        self.set("dimension", dimension.as_str().to_string())
    }

    #[must_use]
    pub fn metric(self, metric: Metric) -> Self {
        self.set("metric", metric.as_str().to_string())
    }

    #[must_use]
    pub fn limit(self, limit: u64) -> Self {
        self.set("limit", limit.to_string())
    }

    #[must_use]
    pub fn offset(self, offset: u64) -> Self {
        self.set("offset", offset.to_string())
    }

    /// Limit and offset for the cursor's current page.
    #[must_use]
    pub fn page(self, cursor: &PageCursor) -> Self {
        self.limit(cursor.limit()).offset(cursor.offset())
    }

    #[must_use]
    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub(crate) fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    fn set(mut self, key: &'static str, value: String) -> Self {
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_from_filters_and_appends_parameters() {
        let mut filters = FilterSelection::new();
        filters.set_business_area("Food");
        let query = DashboardQuery::from_filters(&filters)
            .dimension(Dimension::Sku)
            .metric(Metric::GSales)
            .limit(20)
            .offset(40);

        assert_eq!(
            query.pairs(),
            &[
                ("period", "YTD".to_string()),
                ("businessArea", "Food".to_string()),
                ("dimension", "ProdConcat".to_string()),
                ("metric", "gSales".to_string()),
                ("limit", "20".to_string()),
                ("offset", "40".to_string()),
            ]
        );
    }

    #[test]
    fn setting_a_key_twice_replaces_it() {
        let query = DashboardQuery::new().limit(10).limit(50);
        assert_eq!(query.get("limit"), Some("50"));
        assert_eq!(query.pairs().len(), 1);
    }

    #[test]
    fn page_uses_cursor_window() {
        let mut cursor = PageCursor::new(25);
        cursor.change_page(3);
        let query = DashboardQuery::new().page(&cursor);
        assert_eq!(query.get("limit"), Some("25"));
        assert_eq!(query.get("offset"), Some("50"));
    }
}
