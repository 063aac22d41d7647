use bizpulse_client::ApiError;

use super::*;

#[test]
fn parses_health_command() {
    let cli = Cli::try_parse_from(["bizpulse", "health"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Health));
    assert!(!cli.json);
}

#[test]
fn json_flag_is_global() {
    let cli = Cli::try_parse_from(["bizpulse", "customers", "--json"])
        .expect("expected valid cli args");
    assert!(cli.json);
    assert!(matches!(cli.command, Commands::Customers { .. }));
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["bizpulse"]).is_err());
}

#[test]
fn parses_filter_flags() {
    let cli = Cli::try_parse_from([
        "bizpulse",
        "categories",
        "--period",
        "2024",
        "--business-area",
        "Food",
        "--channel",
        "Online",
    ])
    .expect("expected valid cli args");

    let Commands::Categories { filters } = cli.command else {
        panic!("expected categories command");
    };
    let selection = filters.selection();
    assert_eq!(selection.period(), "2024");
    assert_eq!(selection.business_area(), "Food");
    assert_eq!(selection.channel(), "Online");
    assert_eq!(selection.month(), "All");
}

#[test]
fn child_flags_survive_parent_cascade() {
    let filters = FilterArgs {
        period: Some("2023".to_string()),
        month: Some("March".to_string()),
        business_area: Some("Household".to_string()),
        brand: Some("Brillo".to_string()),
        ..FilterArgs::default()
    };
    let selection = filters.selection();
    assert_eq!(selection.month(), "March");
    assert_eq!(selection.brand(), "Brillo");
}

#[test]
fn unset_flags_keep_defaults() {
    let selection = FilterArgs::default().selection();
    assert_eq!(selection, FilterSelection::new());
}

#[test]
fn parses_brands_paging() {
    let cli = Cli::try_parse_from([
        "bizpulse",
        "brands",
        "--sku-page",
        "3",
        "--page-size",
        "50",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Brands {
            sku_page: 3,
            customer_page: 1,
            page_size: Some(50),
            ..
        }
    ));
}

#[test]
fn parses_drill_kind() {
    let cli = Cli::try_parse_from(["bizpulse", "drill", "customers", "--page", "2"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Drill {
            kind: DrillDownKind::Customers,
            page: 2,
            page_size: None,
            ..
        }
    ));
}

#[test]
fn rejects_unknown_drill_kind() {
    assert!(Cli::try_parse_from(["bizpulse", "drill", "regions"]).is_err());
}

#[test]
fn parses_signup_roles() {
    let cli = Cli::try_parse_from([
        "bizpulse", "signup", "--email", "a@b.ie", "--role", "viewer", "--role", "admin",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Signup { ref email, ref roles }
            if email == "a@b.ie" && roles == &["viewer".to_string(), "admin".to_string()]
    ));
}

#[test]
fn parses_admin_subcommands() {
    let cli = Cli::try_parse_from(["bizpulse", "admin", "azure-status"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Admin {
            command: AdminCommands::AzureStatus
        }
    ));
}

#[test]
fn business_charts_flag() {
    let cli = Cli::try_parse_from(["bizpulse", "business", "--charts"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Business { charts: true, .. }));
}

#[test]
fn chart_flags_replace_only_given_dimensions() {
    let cli = Cli::try_parse_from([
        "bizpulse",
        "business",
        "--charts",
        "--chart-year",
        "2024",
        "--chart-year",
        "2025",
        "--chart-business",
        "Food",
    ])
    .expect("expected valid cli args");
    let Commands::Business { chart_filters, .. } = cli.command else {
        panic!("expected business command");
    };
    let body = chart_filters.chart_filters();
    assert_eq!(body.year, vec!["2024".to_string(), "2025".to_string()]);
    assert_eq!(body.business, vec!["Food".to_string()]);
    assert_eq!(body.month, ChartFilters::default().month);
    assert_eq!(body.customer, ChartFilters::default().customer);
}

#[test]
fn chart_flags_default_to_full_lists() {
    assert_eq!(ChartArgs::default().chart_filters(), ChartFilters::default());
}

#[test]
fn parses_data_health_command() {
    let cli = Cli::try_parse_from(["bizpulse", "data-health"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::DataHealth));
}

#[test]
fn expired_session_points_at_login() {
    let message = admin::api_failure("failed to list users", &ApiError::SessionExpired).to_string();
    assert!(message.starts_with("failed to list users: Your session has expired."));
    assert!(message.contains("bizpulse login"));

    let message = admin::api_failure(
        "upload failed",
        &ApiError::RateLimited {
            retry_after_secs: None,
        },
    )
    .to_string();
    assert!(!message.contains("bizpulse login"));
}
