use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "BIZPULSE_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.api_base_url, "http://localhost:5000/api/v1");
    assert_eq!(cfg.health_url, "http://localhost:5000/health");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "bizpulse/0.1 (dashboard-client)");
    assert_eq!(cfg.page_size, 20);
    assert!(cfg.email.is_none());
    assert!(cfg.access_token.is_none());
    assert!(!cfg.has_credentials());
}

#[test]
fn api_url_trailing_slash_is_trimmed() {
    let mut map = HashMap::new();
    map.insert("BIZPULSE_API_URL", "https://bi.example.com/api/v1/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_base_url, "https://bi.example.com/api/v1");
    assert_eq!(cfg.health_url, "https://bi.example.com/health");
}

#[test]
fn health_url_override_wins_over_derived_origin() {
    let mut map = HashMap::new();
    map.insert("BIZPULSE_API_URL", "https://bi.example.com/api/v1");
    map.insert("BIZPULSE_HEALTH_URL", "https://status.example.com/health");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.health_url, "https://status.example.com/health");
}

#[test]
fn api_url_without_scheme_is_rejected() {
    let mut map = HashMap::new();
    map.insert("BIZPULSE_API_URL", "localhost:5000/api/v1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BIZPULSE_API_URL"
        ),
        "expected InvalidEnvVar(BIZPULSE_API_URL), got: {result:?}"
    );
}

#[test]
fn request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("BIZPULSE_REQUEST_TIMEOUT_SECS", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 5);
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("BIZPULSE_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. })
                if var == "BIZPULSE_REQUEST_TIMEOUT_SECS"
        ),
        "expected InvalidEnvVar(BIZPULSE_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn zero_page_size_is_rejected() {
    let mut map = HashMap::new();
    map.insert("BIZPULSE_PAGE_SIZE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BIZPULSE_PAGE_SIZE"
        ),
        "expected InvalidEnvVar(BIZPULSE_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn blank_credentials_are_treated_as_unset() {
    let mut map = HashMap::new();
    map.insert("BIZPULSE_EMAIL", "  ");
    map.insert("BIZPULSE_PASSWORD", "secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.email.is_none());
    assert_eq!(cfg.password.as_deref(), Some("secret"));
    assert!(!cfg.has_credentials());
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = HashMap::new();
    map.insert("BIZPULSE_PASSWORD", "hunter2");
    map.insert("BIZPULSE_ACCESS_TOKEN", "tok-123");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("hunter2"));
    assert!(!rendered.contains("tok-123"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn url_origin_strips_path() {
    assert_eq!(
        url_origin("http://localhost:5000/api/v1"),
        "http://localhost:5000"
    );
    assert_eq!(url_origin("https://bi.example.com"), "https://bi.example.com");
}
