use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_API_URL: &str = "http://localhost:5000/api/v1";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a config
/// pointed at a local API server.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("BIZPULSE_ENV", "development"))?;

    let api_base_url = validate_http_url(
        "BIZPULSE_API_URL",
        or_default("BIZPULSE_API_URL", DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string(),
    )?;
    let health_url = match optional("BIZPULSE_HEALTH_URL") {
        Some(url) => validate_http_url("BIZPULSE_HEALTH_URL", url)?,
        None => format!("{}/health", url_origin(&api_base_url)),
    };

    let log_level = or_default("BIZPULSE_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("BIZPULSE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("BIZPULSE_USER_AGENT", "bizpulse/0.1 (dashboard-client)");

    let page_size = parse_u64("BIZPULSE_PAGE_SIZE", "20")?;
    if page_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "BIZPULSE_PAGE_SIZE".to_string(),
            reason: "page size must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        api_base_url,
        health_url,
        log_level,
        request_timeout_secs,
        user_agent,
        page_size,
        email: optional("BIZPULSE_EMAIL"),
        password: optional("BIZPULSE_PASSWORD"),
        access_token: optional("BIZPULSE_ACCESS_TOKEN"),
        refresh_token: optional("BIZPULSE_REFRESH_TOKEN"),
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "BIZPULSE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn validate_http_url(var: &str, url: String) -> Result<String, ConfigError> {
    let has_host = url
        .split_once("://")
        .is_some_and(|(scheme, rest)| matches!(scheme, "http" | "https") && !rest.is_empty());
    if has_host {
        Ok(url)
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("'{url}' is not an http(s) URL"),
        })
    }
}

/// Scheme and authority of `url`, without any path.
fn url_origin(url: &str) -> &str {
    let Some(scheme_end) = url.find("://") else {
        return url;
    };
    let authority_start = scheme_end + 3;
    match url[authority_start..].find('/') {
        Some(idx) => &url[..authority_start + idx],
        None => url,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
