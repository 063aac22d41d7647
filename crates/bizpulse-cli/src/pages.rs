//! Dashboard page command handlers.
//!
//! Each handler builds the page's filter selection from the flags, refreshes
//! every widget concurrently, then prints the widgets in display order.
//! A failed widget prints its error in place; the rest still render.

use bizpulse_client::ApiClient;
use bizpulse_core::ChartFilters;
use bizpulse_pipeline::options::{current_year, load_dropdowns};
use bizpulse_pipeline::{
    BrandsPage, BusinessPage, CategoriesPage, CustomersPage, DrillDown, DrillDownKind,
};

use crate::render;
use crate::FilterArgs;

/// Show the dropdown options for the selection.
///
/// # Errors
///
/// Returns an error only if JSON output cannot be written.
pub(crate) async fn run_options(
    client: &ApiClient,
    filters: &FilterArgs,
    json: bool,
) -> anyhow::Result<()> {
    let options = load_dropdowns(client, &filters.selection(), current_year()).await;
    if json {
        return render::print_json(&serde_json::to_value(&options)?);
    }
    render::dropdowns(&options);
    Ok(())
}

/// Business page; the charts load only when `chart_filters` is given.
///
/// # Errors
///
/// Returns an error only if JSON output cannot be written.
pub(crate) async fn run_business(
    client: &ApiClient,
    filters: &FilterArgs,
    chart_filters: Option<ChartFilters>,
    json: bool,
) -> anyhow::Result<()> {
    let mut page = BusinessPage::new();
    filters.apply(page.filters_mut());
    let with_charts = chart_filters.is_some();
    if let Some(chart_filters) = chart_filters {
        *page.chart_filters_mut() = chart_filters;
    }
    page.refresh(client, with_charts).await;

    if json {
        let mut value = serde_json::json!({
            "filters": page.filters(),
            "dropdowns": page.dropdowns.state(),
            "kpis": page.kpis.state(),
            "analysis": page.analysis.state(),
        });
        if with_charts {
            value["chartFilters"] = serde_json::to_value(page.chart_filters())?;
            value["charts"] = serde_json::to_value(page.charts.state())?;
        }
        return render::print_json(&value);
    }

    render::widget("Key figures", &page.kpis.state(), render::kpis);
    render::widget("Business analysis", &page.analysis.state(), render::analysis);
    if with_charts {
        render::widget("Year comparison", &page.charts.state(), |panels| {
            render::charts(panels);
        });
    }
    Ok(())
}

/// # Errors
///
/// Returns an error only if JSON output cannot be written.
pub(crate) async fn run_brands(
    client: &ApiClient,
    filters: &FilterArgs,
    (sku_page, customer_page): (u64, u64),
    page_size: u64,
    json: bool,
) -> anyhow::Result<()> {
    let mut page = BrandsPage::new(page_size);
    filters.apply(page.filters_mut());
    page.sku_cursor_mut().change_page(sku_page);
    page.customer_cursor_mut().change_page(customer_page);
    page.refresh(client).await;

    if json {
        return render::print_json(&serde_json::json!({
            "filters": page.filters(),
            "dropdowns": page.dropdowns.state(),
            "kpis": page.kpis.state(),
            "trend": page.trend.state(),
            "topSkus": page.top_skus.state(),
            "topCustomers": page.top_customers.state(),
            "brandShare": page.brand_share.state(),
            "variance": page.variance.state(),
        }));
    }

    render::widget("Key figures", &page.kpis.state(), render::kpis);
    render::widget("Monthly trend", &page.trend.state(), |rows| {
        render::trend(rows);
    });
    render::widget("Top SKUs", &page.top_skus.state(), render::skus);
    render::widget("Top customers", &page.top_customers.state(), render::customers);
    render::widget("Brand share (top 5)", &page.brand_share.state(), |rows| {
        render::ranked(rows);
    });
    render::widget("Margin variance", &page.variance.state(), render::variance);
    Ok(())
}

/// # Errors
///
/// Returns an error only if JSON output cannot be written.
pub(crate) async fn run_categories(
    client: &ApiClient,
    filters: &FilterArgs,
    json: bool,
) -> anyhow::Result<()> {
    let mut page = CategoriesPage::new();
    filters.apply(page.filters_mut());
    page.refresh(client).await;

    if json {
        return render::print_json(&serde_json::json!({
            "filters": page.filters(),
            "dropdowns": page.dropdowns.state(),
            "overview": page.overview.state(),
            "matrix": page.matrix.state(),
        }));
    }

    render::widget("Category overview", &page.overview.state(), render::category_overview);
    render::widget("Category performance", &page.matrix.state(), |rows| {
        render::category_matrix(rows);
    });
    Ok(())
}

/// # Errors
///
/// Returns an error only if JSON output cannot be written.
pub(crate) async fn run_customers(
    client: &ApiClient,
    filters: &FilterArgs,
    json: bool,
) -> anyhow::Result<()> {
    let mut page = CustomersPage::new();
    filters.apply(page.filters_mut());
    page.refresh(client).await;

    if json {
        return render::print_json(&serde_json::json!({
            "filters": page.filters(),
            "dropdowns": page.dropdowns.state(),
            "cards": page.cards.state(),
            "ranking": page.ranking.state(),
            "channels": page.channels.state(),
        }));
    }

    render::widget("Customer overview", &page.cards.state(), |cards| {
        render::cards(cards);
    });
    render::widget("Top customers", &page.ranking.state(), render::ranking);
    render::widget("Channel share", &page.channels.state(), |shares| {
        render::channel_shares(shares);
    });
    Ok(())
}

/// # Errors
///
/// Returns an error only if JSON output cannot be written.
pub(crate) async fn run_drill(
    client: &ApiClient,
    kind: DrillDownKind,
    filters: &FilterArgs,
    page: u64,
    page_size: u64,
    json: bool,
) -> anyhow::Result<()> {
    let mut drill = DrillDown::new(kind, filters.selection(), page_size);
    drill.change_page(page);
    let rows = drill.load(client).await;

    if json {
        return render::print_json(&serde_json::to_value(&rows)?);
    }

    println!("Drill-down: {kind}");
    render::ranked_page(&rows);
    Ok(())
}
