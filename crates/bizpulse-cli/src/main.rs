mod admin;
mod pages;
mod render;

#[cfg(test)]
mod tests;

use bizpulse_client::ApiClient;
use bizpulse_core::{AppConfig, ChartFilters, FilterSelection};
use bizpulse_pipeline::DrillDownKind;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "bizpulse")]
#[command(about = "BizPulse business intelligence dashboard in the terminal")]
struct Cli {
    /// Print widget states as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Probe the API server's health endpoint
    Health,
    /// Check sign-in credentials
    Login {
        /// Account email; defaults to BIZPULSE_EMAIL
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        email: String,
        /// Role to grant; repeat for several
        #[arg(long = "role")]
        roles: Vec<String>,
    },
    /// Show the filter dropdown options for a selection
    Options {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Business analysis: KPIs, business areas, channels, performance
    Business {
        #[command(flatten)]
        filters: FilterArgs,
        /// Also load the six year-comparison charts
        #[arg(long)]
        charts: bool,
        #[command(flatten)]
        chart_filters: ChartArgs,
    },
    /// Brand page: trend, top SKUs and customers, brand share, variance
    Brands {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = 1)]
        sku_page: u64,
        #[arg(long, default_value_t = 1)]
        customer_page: u64,
        /// Rows per list page; defaults to BIZPULSE_PAGE_SIZE
        #[arg(long)]
        page_size: Option<u64>,
    },
    /// Category overview cards and performance matrix
    Categories {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Customer cards, top and at-risk customers, channel share
    Customers {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Full ranking behind a summary widget
    Drill {
        /// skus, customers, brands, categories or channels
        kind: DrillDownKind,
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long)]
        page_size: Option<u64>,
    },
    /// Show the data freshness report
    DataHealth,
    /// User administration and export upload
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Debug, Subcommand)]
enum AdminCommands {
    /// List registered users
    Users,
    /// Show the export file's blob-storage status
    AzureStatus,
    /// Upload the export file to blob storage
    Upload,
}

/// Filter flags shared by every dashboard page.
#[derive(Debug, Default, Clone, Args)]
pub(crate) struct FilterArgs {
    /// YTD or a year, e.g. 2024
    #[arg(long)]
    period: Option<String>,
    /// Month name, e.g. January
    #[arg(long)]
    month: Option<String>,
    #[arg(long)]
    business_area: Option<String>,
    #[arg(long)]
    channel: Option<String>,
    #[arg(long)]
    brand: Option<String>,
    #[arg(long)]
    category: Option<String>,
}

impl FilterArgs {
    /// Applies the flags parent-first so cascading resets never wipe a
    /// value given on the same command line.
    pub(crate) fn apply(&self, filters: &mut FilterSelection) {
        if let Some(period) = &self.period {
            filters.set_period(period.clone());
        }
        if let Some(month) = &self.month {
            filters.set_month(month.clone());
        }
        if let Some(area) = &self.business_area {
            filters.set_business_area(area.clone());
        }
        if let Some(channel) = &self.channel {
            filters.set_channel(channel.clone());
        }
        if let Some(brand) = &self.brand {
            filters.set_brand(brand.clone());
        }
        if let Some(category) = &self.category {
            filters.set_category(category.clone());
        }
    }

    pub(crate) fn selection(&self) -> FilterSelection {
        let mut filters = FilterSelection::new();
        self.apply(&mut filters);
        filters
    }
}

/// Multi-select filters for the year-comparison charts. Each flag repeats;
/// a dimension given no values keeps its full default list.
#[derive(Debug, Default, Clone, Args)]
pub(crate) struct ChartArgs {
    /// Chart year to include, e.g. 2024
    #[arg(long = "chart-year", value_name = "YEAR")]
    years: Vec<String>,
    /// Chart month to include, e.g. Jan
    #[arg(long = "chart-month", value_name = "MONTH")]
    months: Vec<String>,
    #[arg(long = "chart-business", value_name = "BUSINESS")]
    businesses: Vec<String>,
    #[arg(long = "chart-channel", value_name = "CHANNEL")]
    channels: Vec<String>,
    #[arg(long = "chart-brand", value_name = "BRAND")]
    brands: Vec<String>,
    #[arg(long = "chart-category", value_name = "CATEGORY")]
    categories: Vec<String>,
    #[arg(long = "chart-customer", value_name = "CUSTOMER")]
    customers: Vec<String>,
}

fn choose(target: &mut Vec<String>, chosen: &[String]) {
    if !chosen.is_empty() {
        *target = chosen.to_vec();
    }
}

impl ChartArgs {
    pub(crate) fn chart_filters(&self) -> ChartFilters {
        let mut filters = ChartFilters::new();
        choose(&mut filters.year, &self.years);
        choose(&mut filters.month, &self.months);
        choose(&mut filters.business, &self.businesses);
        choose(&mut filters.channel, &self.channels);
        choose(&mut filters.brand, &self.brands);
        choose(&mut filters.category, &self.categories);
        choose(&mut filters.customer, &self.customers);
        filters
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = bizpulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = ApiClient::from_config(&config)
        .map_err(|e| anyhow::anyhow!("failed to build API client: {e}"))?;

    match cli.command {
        Commands::Health => admin::run_health(&client, cli.json).await,
        Commands::Login { email } => admin::run_login(&client, &config, email.as_deref()).await,
        Commands::Signup { email, roles } => {
            admin::run_signup(&client, &config, &email, &roles).await
        }
        command => {
            sign_in_if_configured(&client, &config).await?;
            run_dashboard(&client, &config, command, cli.json).await
        }
    }
}

async fn run_dashboard(
    client: &ApiClient,
    config: &AppConfig,
    command: Commands,
    json: bool,
) -> anyhow::Result<()> {
    match command {
        Commands::Options { filters } => pages::run_options(client, &filters, json).await,
        Commands::Business {
            filters,
            charts,
            chart_filters,
        } => {
            let chart_filters = charts.then(|| chart_filters.chart_filters());
            pages::run_business(client, &filters, chart_filters, json).await
        }
        Commands::Brands {
            filters,
            sku_page,
            customer_page,
            page_size,
        } => {
            let page_size = page_size.unwrap_or(config.page_size);
            pages::run_brands(client, &filters, (sku_page, customer_page), page_size, json).await
        }
        Commands::Categories { filters } => pages::run_categories(client, &filters, json).await,
        Commands::Customers { filters } => pages::run_customers(client, &filters, json).await,
        Commands::Drill {
            kind,
            filters,
            page,
            page_size,
        } => {
            let page_size = page_size.unwrap_or(config.page_size);
            pages::run_drill(client, kind, &filters, page, page_size, json).await
        }
        Commands::DataHealth => admin::run_data_health(client).await,
        Commands::Admin { command } => match command {
            AdminCommands::Users => admin::run_users(client, json).await,
            AdminCommands::AzureStatus => admin::run_azure_status(client, json).await,
            AdminCommands::Upload => admin::run_upload(client).await,
        },
        Commands::Health | Commands::Login { .. } | Commands::Signup { .. } => Ok(()),
    }
}

/// Signs in with configured credentials unless pre-issued tokens are set.
async fn sign_in_if_configured(client: &ApiClient, config: &AppConfig) -> anyhow::Result<()> {
    if client.session().is_authenticated() {
        return Ok(());
    }
    match (&config.email, &config.password) {
        (Some(email), Some(password)) => {
            client
                .signin(email, password)
                .await
                .map_err(|e| admin::api_failure("sign-in failed", &e))?;
            tracing::debug!(email = %email, "signed in");
            Ok(())
        }
        _ => {
            tracing::warn!("no credentials configured; requests will be unauthenticated");
            Ok(())
        }
    }
}
