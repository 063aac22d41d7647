//! Analysis pages.
//!
//! Each page owns its [`FilterSelection`] and one [`Widget`] per panel. A
//! refresh fires every widget's requests at once; widgets settle
//! independently, so one failing panel never blanks its siblings.

use std::convert::identity;

use bizpulse_client::{ApiClient, ApiError};
use bizpulse_core::{ChartFilters, FilterSelection, PageCursor, Paginated};

use crate::business::{self, BusinessAnalysis, ChartPanel, KpiSummary};
use crate::categories::{self, CategoryOverview, CategoryRow};
use crate::customers::{self, ChannelShare, OverviewCard};
use crate::options::{self, DropdownOptions};
use crate::ranking::{self, CustomerRanking, CustomerRow, RankedRow, SkuRow};
use crate::trend::{self, TrendRow};
use crate::variance::{self, VarianceBreakdown};
use crate::widget::Widget;

/// Dropdowns never fail; this adapts them to the widget loader.
async fn dropdowns(
    client: &ApiClient,
    filters: &FilterSelection,
) -> Result<DropdownOptions, ApiError> {
    Ok(options::load_dropdowns(client, filters, options::current_year()).await)
}

#[derive(Debug)]
pub struct BrandsPage {
    filters: FilterSelection,
    sku_cursor: PageCursor,
    customer_cursor: PageCursor,
    pub dropdowns: Widget<DropdownOptions>,
    pub kpis: Widget<KpiSummary>,
    pub trend: Widget<Vec<TrendRow>>,
    pub top_skus: Widget<Paginated<SkuRow>>,
    pub top_customers: Widget<Paginated<CustomerRow>>,
    pub brand_share: Widget<Vec<RankedRow>>,
    pub variance: Widget<VarianceBreakdown>,
}

impl BrandsPage {
    #[must_use]
    pub fn new(page_size: u64) -> Self {
        Self {
            filters: FilterSelection::new(),
            sku_cursor: PageCursor::new(page_size),
            customer_cursor: PageCursor::new(page_size),
            dropdowns: Widget::new("brands.dropdowns"),
            kpis: Widget::new("brands.kpis"),
            trend: Widget::new("brands.trend"),
            top_skus: Widget::new("brands.top_skus"),
            top_customers: Widget::new("brands.top_customers"),
            brand_share: Widget::new("brands.brand_share"),
            variance: Widget::new("brands.variance"),
        }
    }

    #[must_use]
    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    /// Filter changes start the lists over at page one.
    pub fn filters_mut(&mut self) -> &mut FilterSelection {
        self.sku_cursor.change_page(1);
        self.customer_cursor.change_page(1);
        &mut self.filters
    }

    pub fn sku_cursor_mut(&mut self) -> &mut PageCursor {
        &mut self.sku_cursor
    }

    pub fn customer_cursor_mut(&mut self) -> &mut PageCursor {
        &mut self.customer_cursor
    }

    pub async fn refresh(&self, client: &ApiClient) {
        let filters = &self.filters;
        futures::join!(
            self.dropdowns.refresh(dropdowns(client, filters), identity),
            self.kpis.refresh(business::load_kpis(client, filters), identity),
            self.trend
                .refresh(trend::load_brand_trend(client, filters), identity),
            self.top_skus.refresh(
                ranking::load_top_skus(client, filters, &self.sku_cursor),
                identity
            ),
            self.top_customers.refresh(
                ranking::load_top_customers(client, filters, &self.customer_cursor),
                identity
            ),
            self.brand_share
                .refresh(ranking::load_brand_share(client, filters), identity),
            self.variance
                .refresh(variance::load_variance(client, filters), identity),
        );
    }

    /// Reloads only the SKU list, e.g. after a page change.
    pub async fn refresh_skus(&self, client: &ApiClient) {
        self.top_skus
            .refresh(
                ranking::load_top_skus(client, &self.filters, &self.sku_cursor),
                identity,
            )
            .await;
    }

    pub async fn refresh_customers(&self, client: &ApiClient) {
        self.top_customers
            .refresh(
                ranking::load_top_customers(client, &self.filters, &self.customer_cursor),
                identity,
            )
            .await;
    }
}

#[derive(Debug)]
pub struct CustomersPage {
    filters: FilterSelection,
    pub dropdowns: Widget<DropdownOptions>,
    pub cards: Widget<Vec<OverviewCard>>,
    pub ranking: Widget<CustomerRanking>,
    pub channels: Widget<Vec<ChannelShare>>,
}

impl Default for CustomersPage {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomersPage {
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: FilterSelection::new(),
            dropdowns: Widget::new("customers.dropdowns"),
            cards: Widget::new("customers.cards"),
            ranking: Widget::new("customers.ranking"),
            channels: Widget::new("customers.channels"),
        }
    }

    #[must_use]
    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterSelection {
        &mut self.filters
    }

    pub async fn refresh(&self, client: &ApiClient) {
        let filters = &self.filters;
        futures::join!(
            self.dropdowns.refresh(dropdowns(client, filters), identity),
            self.cards
                .refresh(customers::load_customer_cards(client, filters), identity),
            self.ranking
                .refresh(ranking::load_customer_ranking(client, filters), identity),
            self.channels
                .refresh(customers::load_channel_shares(client, filters), identity),
        );
    }
}

#[derive(Debug)]
pub struct CategoriesPage {
    filters: FilterSelection,
    pub dropdowns: Widget<DropdownOptions>,
    pub overview: Widget<CategoryOverview>,
    pub matrix: Widget<Vec<CategoryRow>>,
}

impl Default for CategoriesPage {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoriesPage {
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: FilterSelection::new(),
            dropdowns: Widget::new("categories.dropdowns"),
            overview: Widget::new("categories.overview"),
            matrix: Widget::new("categories.matrix"),
        }
    }

    #[must_use]
    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterSelection {
        &mut self.filters
    }

    pub async fn refresh(&self, client: &ApiClient) {
        let filters = &self.filters;
        futures::join!(
            self.dropdowns.refresh(dropdowns(client, filters), identity),
            self.overview
                .refresh(categories::load_category_overview(client, filters), identity),
            self.matrix
                .refresh(categories::load_category_matrix(client, filters), identity),
        );
    }
}

#[derive(Debug)]
pub struct BusinessPage {
    filters: FilterSelection,
    chart_filters: ChartFilters,
    pub dropdowns: Widget<DropdownOptions>,
    pub kpis: Widget<KpiSummary>,
    pub analysis: Widget<BusinessAnalysis>,
    pub charts: Widget<Vec<ChartPanel>>,
}

impl Default for BusinessPage {
    fn default() -> Self {
        Self::new()
    }
}

impl BusinessPage {
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: FilterSelection::new(),
            chart_filters: ChartFilters::new(),
            dropdowns: Widget::new("business.dropdowns"),
            kpis: Widget::new("business.kpis"),
            analysis: Widget::new("business.analysis"),
            charts: Widget::new("business.charts"),
        }
    }

    #[must_use]
    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterSelection {
        &mut self.filters
    }

    /// Multi-select filters posted to the chart endpoints. They are
    /// independent of the page's single-select [`FilterSelection`].
    #[must_use]
    pub fn chart_filters(&self) -> &ChartFilters {
        &self.chart_filters
    }

    pub fn chart_filters_mut(&mut self) -> &mut ChartFilters {
        &mut self.chart_filters
    }

    /// Refreshes the page. Charts are only fetched when `with_charts` is set.
    pub async fn refresh(&self, client: &ApiClient, with_charts: bool) {
        let filters = &self.filters;
        let charts = async {
            if with_charts {
                self.charts
                    .refresh(
                        async {
                            let charts =
                                business::load_year_charts(client, &self.chart_filters).await;
                            Ok::<_, ApiError>(charts)
                        },
                        identity,
                    )
                    .await;
            }
        };
        futures::join!(
            self.dropdowns.refresh(dropdowns(client, filters), identity),
            self.kpis.refresh(business::load_kpis(client, filters), identity),
            self.analysis
                .refresh(business::load_business_analysis(client, filters), identity),
            charts,
        );
    }
}
