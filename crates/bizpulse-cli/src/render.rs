//! Plain-text rendering of widget states and view models.

use bizpulse_core::{
    format_compact, format_currency, format_euro, format_percentage, format_share, Paginated,
    Pagination,
};
use bizpulse_pipeline::{
    BusinessAnalysis, CategoryOverview, CategoryRow, ChannelShare, ChartPanel, CustomerRanking,
    CustomerRow, DropdownOptions, KpiSummary, OverviewCard, RankedRow, SkuRow, TrendRow,
    VarianceBreakdown, VarianceDriver, WidgetState,
};

const NAME_WIDTH: usize = 32;

fn section(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "-".repeat(title.chars().count()));
}

/// Prints a widget's title and either its body, its error or a loading note.
pub(crate) fn widget<T>(title: &str, state: &WidgetState<T>, body: impl FnOnce(&T)) {
    section(title);
    match state {
        WidgetState::Loaded(data) => body(data),
        WidgetState::Failed { message } => println!("error: {message}"),
        WidgetState::Loading => println!("(not loaded)"),
    }
}

pub(crate) fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Shortens names to the table column, marking the cut with `...`.
pub(crate) fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() > width {
        let kept: String = name.chars().take(width.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        name.to_string()
    }
}

fn pagination_footer(pagination: &Pagination) {
    println!(
        "page {} of {} ({} total{})",
        pagination.current_page,
        pagination.total_pages.max(1),
        pagination.total,
        if pagination.has_more { ", more available" } else { "" }
    );
}

pub(crate) fn dropdowns(options: &DropdownOptions) {
    let lists = [
        ("Period", &options.periods),
        ("Month", &options.months),
        ("Business area", &options.business_areas),
        ("Channel", &options.channels),
        ("Brand", &options.brands),
        ("Category", &options.categories),
    ];
    for (label, values) in lists {
        println!("{label:<15}{}", values.join(", "));
    }
}

pub(crate) fn kpis(kpis: &KpiSummary) {
    println!("{:<15}{}", "Revenue", format_currency(kpis.total_revenue));
    println!("{:<15}{}", "Gross profit", format_currency(kpis.total_profit));
    println!("{:<15}{}", "Margin", format_share(kpis.margin));
    println!("{:<15}{}", "Cases", format_compact(kpis.total_cases));
    println!("{:<15}{}", "Growth", format_percentage(kpis.growth_rate));
}

pub(crate) fn trend(rows: &[TrendRow]) {
    if rows.is_empty() {
        println!("no trend data");
        return;
    }
    println!("{:<12}{:>12}{:>10}{:>9}{:>9}", "MONTH", "REVENUE", "UNITS", "MARGIN", "GROWTH");
    for row in rows {
        println!(
            "{:<12}{:>12}{:>10}{:>9}{:>9}",
            row.month,
            format_currency(row.revenue),
            format_compact(row.units),
            format_share(row.margin),
            format_percentage(row.growth)
        );
    }
}

pub(crate) fn skus(page: &Paginated<SkuRow>) {
    if page.data.is_empty() {
        println!("no SKUs");
        return;
    }
    println!(
        "{:>4}  {:<NAME_WIDTH$}{:>12}{:>9}{:>8}{:>8}{:>8}",
        "#", "SKU", "REVENUE", "GROWTH", "SHARE", "TREND", "RISK"
    );
    for row in &page.data {
        println!(
            "{:>4}  {:<NAME_WIDTH$}{:>12}{:>9}{:>8}{:>8}{:>8}",
            row.rank,
            truncate(&row.name, NAME_WIDTH - 1),
            format_currency(row.revenue),
            format_percentage(row.growth),
            format_share(row.share),
            row.trend.as_str(),
            row.risk.as_str()
        );
    }
    pagination_footer(&page.pagination);
}

fn customer_table(rows: &[CustomerRow]) {
    println!(
        "{:>4}  {:<NAME_WIDTH$}{:>12}{:>9}{:>8}  STATUS",
        "#", "CUSTOMER", "REVENUE", "GROWTH", "SHARE"
    );
    for row in rows {
        let name = if row.channel.is_empty() {
            row.name.clone()
        } else {
            format!("{} ({})", row.name, row.channel)
        };
        println!(
            "{:>4}  {:<NAME_WIDTH$}{:>12}{:>9}{:>8}  {}",
            row.rank,
            truncate(&name, NAME_WIDTH - 1),
            format_currency(row.revenue),
            format_percentage(row.growth),
            format_share(row.share),
            row.status.as_str()
        );
    }
}

pub(crate) fn customers(page: &Paginated<CustomerRow>) {
    if page.data.is_empty() {
        println!("no customers");
        return;
    }
    customer_table(&page.data);
    pagination_footer(&page.pagination);
}

pub(crate) fn ranked(rows: &[RankedRow]) {
    if rows.is_empty() {
        println!("no data");
        return;
    }
    println!(
        "{:>4}  {:<NAME_WIDTH$}{:>12}{:>9}{:>8}",
        "#", "NAME", "VALUE", "GROWTH", "SHARE"
    );
    for row in rows {
        println!(
            "{:>4}  {:<NAME_WIDTH$}{:>12}{:>9}{:>8}",
            row.rank,
            truncate(&row.name, NAME_WIDTH - 1),
            format_currency(row.value),
            format_percentage(row.growth),
            format_share(row.share)
        );
    }
}

pub(crate) fn ranked_page(page: &Paginated<RankedRow>) {
    ranked(&page.data);
    if !page.data.is_empty() {
        pagination_footer(&page.pagination);
    }
}

/// One driver row; unfavourable drivers are flagged with `!`.
fn variance_line(driver: &VarianceDriver) -> String {
    let flag = if driver.is_favourable() { ' ' } else { '!' };
    format!(
        "{flag} {:<15}{:>8}  {}",
        driver.driver,
        format_percentage(driver.value),
        driver.description
    )
}

pub(crate) fn variance(breakdown: &VarianceBreakdown) {
    for driver in &breakdown.drivers {
        println!("{}", variance_line(driver));
    }
    println!("  {:<15}{:>8}", "Total", format_percentage(breakdown.total));
}

pub(crate) fn cards(cards: &[OverviewCard]) {
    if cards.is_empty() {
        println!("no customer metrics");
        return;
    }
    for card in cards {
        println!(
            "{:<20}{:>12}  {} ({})",
            card.title,
            card.value,
            card.change,
            format_percentage(card.change_percent)
        );
    }
}

pub(crate) fn ranking(ranking: &CustomerRanking) {
    if ranking.top.is_empty() {
        println!("no customers");
    } else {
        customer_table(&ranking.top);
    }
    if !ranking.at_risk.is_empty() {
        println!();
        println!("At risk:");
        for customer in &ranking.at_risk {
            println!(
                "  {:<NAME_WIDTH$}{:>12}{:>9}  {}",
                truncate(&customer.name, NAME_WIDTH - 1),
                format_currency(customer.revenue),
                format_percentage(customer.decline),
                customer.risk_level
            );
        }
    }
}

pub(crate) fn channel_shares(shares: &[ChannelShare]) {
    if shares.is_empty() {
        println!("no channel data");
        return;
    }
    println!(
        "{:<20}{:>8}{:>12}{:>11}{:>12}",
        "CHANNEL", "SHARE", "REVENUE", "CUSTOMERS", "AVG VALUE"
    );
    for share in shares {
        println!(
            "{:<20}{:>8}{:>12}{:>11}{:>12}",
            truncate(&share.name, 19),
            format_share(share.share),
            format_currency(share.revenue),
            share.customers,
            format_euro(share.average_customer_value)
        );
    }
}

pub(crate) fn category_overview(overview: &CategoryOverview) {
    println!(
        "{:<20}{} ({} active)",
        "Categories", overview.total_categories, overview.active_categories
    );
    println!("{:<20}{}", "Total revenue", format_currency(overview.total_revenue));
    println!("{:<20}{}", "Average revenue", format_currency(overview.average_revenue));
    match &overview.top_category {
        Some(top) => println!(
            "{:<20}{} {} ({} of total, {})",
            "Top category",
            top.name,
            format_currency(top.revenue),
            format_share(top.share),
            format_percentage(top.growth)
        ),
        None => println!("{:<20}none", "Top category"),
    }
}

pub(crate) fn category_matrix(rows: &[CategoryRow]) {
    if rows.is_empty() {
        println!("no categories");
        return;
    }
    println!(
        "{:<24}{:<14}{:>12}{:>8}{:>9}{:>8}{:>8}  TREND",
        "CATEGORY", "AREA", "REVENUE", "MARGIN", "GROWTH", "SHARE", "PERF"
    );
    for row in rows {
        println!(
            "{:<24}{:<14}{:>12}{:>8}{:>9}{:>8}{:>8}  {}",
            truncate(&row.category, 23),
            truncate(&row.business_area, 13),
            format_currency(row.revenue),
            format_share(row.margin),
            format_percentage(row.growth),
            format_share(row.market_share),
            row.performance.as_str(),
            row.trend.as_str()
        );
    }
}

pub(crate) fn analysis(analysis: &BusinessAnalysis) {
    println!("{:<20}{:>12}{:>8}{:>9}", "BUSINESS AREA", "REVENUE", "MARGIN", "GROWTH");
    for area in &analysis.business_areas {
        println!(
            "{:<20}{:>12}{:>8}{:>9}",
            truncate(&area.name, 19),
            format_currency(area.revenue),
            format_share(area.margin),
            format_percentage(area.growth)
        );
    }
    println!();
    println!("{:<20}{:>12}{:>8}{:>9}", "CHANNEL", "REVENUE", "MARGIN", "GROWTH");
    for channel in &analysis.channels {
        println!(
            "{:<20}{:>12}{:>8}{:>9}",
            truncate(&channel.name, 19),
            format_currency(channel.revenue),
            format_share(channel.margin),
            format_percentage(channel.growth)
        );
    }
    println!();
    println!("{} performance rows", analysis.performance.len());
}

pub(crate) fn charts(panels: &[ChartPanel]) {
    for panel in panels {
        println!();
        println!("{}", panel.title);
        if panel.rows.is_empty() {
            println!("  no data");
            continue;
        }
        let years = panel.years();
        let header: String = years.iter().map(|y| format!("{y:>12}")).collect();
        println!("  {:<20}{header}", "");
        for row in &panel.rows {
            let values: String = years
                .iter()
                .map(|y| format!("{:>12}", format_currency(row.value(y))))
                .collect();
            println!("  {:<20}{values}", truncate(&row.label, 19));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_names() {
        assert_eq!(truncate("Tesco", 10), "Tesco");
    }

    #[test]
    fn truncate_marks_cut_names() {
        assert_eq!(truncate("Brillo Soap Pads 10pk", 10), "Brillo ...");
        assert_eq!(truncate("Brillo Soap Pads 10pk", 10).chars().count(), 10);
    }

    #[test]
    fn unfavourable_variance_is_flagged() {
        let driver = |value: f64| VarianceDriver {
            driver: "Cost Impact",
            value,
            description: "",
        };
        assert!(variance_line(&driver(-2.5)).starts_with("! Cost Impact"));
        assert!(variance_line(&driver(0.0)).starts_with("  Cost Impact"));
    }
}
