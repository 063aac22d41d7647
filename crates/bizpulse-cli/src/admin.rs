//! Health, account and administration command handlers.

use bizpulse_client::{ApiClient, ApiError};
use bizpulse_core::AppConfig;

use crate::render;

/// CLI error for a failed API call. Errors that need a fresh sign-in say so.
pub(crate) fn api_failure(action: &str, err: &ApiError) -> anyhow::Error {
    if err.requires_login() {
        anyhow::anyhow!(
            "{action}: {} (check your credentials with `bizpulse login`)",
            err.user_message()
        )
    } else {
        anyhow::anyhow!("{action}: {}", err.user_message())
    }
}

/// Probe the server's health endpoint.
///
/// # Errors
///
/// Returns an error if the server is unreachable or answers with a non-2xx
/// status.
pub(crate) async fn run_health(client: &ApiClient, json: bool) -> anyhow::Result<()> {
    let report = client
        .health()
        .await
        .map_err(|e| anyhow::anyhow!("health check failed: {e}"))?;

    if json {
        return render::print_json(&serde_json::to_value(&report)?);
    }
    println!("status: {}", report.status.as_deref().unwrap_or("unknown"));
    for (key, value) in &report.details {
        println!("{key}: {value}");
    }
    Ok(())
}

/// Print the data freshness report as JSON; its fields are not fixed.
///
/// # Errors
///
/// Returns an error if the request fails.
pub(crate) async fn run_data_health(client: &ApiClient) -> anyhow::Result<()> {
    let report = client
        .data_health()
        .await
        .map_err(|e| api_failure("failed to read data health", &e))?;
    render::print_json(&report)
}

fn password(config: &AppConfig) -> anyhow::Result<&str> {
    config
        .password
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("BIZPULSE_PASSWORD must be set"))
}

/// Sign in once to check the credentials. Tokens are not persisted.
///
/// # Errors
///
/// Returns an error if no email/password is available or the server
/// rejects them.
pub(crate) async fn run_login(
    client: &ApiClient,
    config: &AppConfig,
    email: Option<&str>,
) -> anyhow::Result<()> {
    let email = email
        .or(config.email.as_deref())
        .ok_or_else(|| anyhow::anyhow!("pass --email or set BIZPULSE_EMAIL"))?;
    client
        .signin(email, password(config)?)
        .await
        .map_err(|e| api_failure("sign-in failed", &e))?;
    println!("signed in as {email}");
    client.logout().await;
    Ok(())
}

/// # Errors
///
/// Returns an error if no password is configured or the server rejects the
/// signup.
pub(crate) async fn run_signup(
    client: &ApiClient,
    config: &AppConfig,
    email: &str,
    roles: &[String],
) -> anyhow::Result<()> {
    client
        .signup(email, password(config)?, roles)
        .await
        .map_err(|e| api_failure("signup failed", &e))?;
    println!("created account {email}");
    client.logout().await;
    Ok(())
}

/// # Errors
///
/// Returns an error if the request fails.
pub(crate) async fn run_users(client: &ApiClient, json: bool) -> anyhow::Result<()> {
    let users = client
        .users()
        .await
        .map_err(|e| api_failure("failed to list users", &e))?;

    if json {
        return render::print_json(&serde_json::to_value(&users)?);
    }
    if users.is_empty() {
        println!("no users");
        return Ok(());
    }
    println!("{:<36}{:<20}{:<12}EMAIL", "ID", "ROLES", "CREATED");
    for user in &users {
        let created = user
            .created_at
            .map_or_else(|| "\u{2014}".to_string(), |at| at.format("%Y-%m-%d").to_string());
        println!(
            "{:<36}{:<20}{:<12}{}",
            render::truncate(&user.id, 35),
            render::truncate(&user.roles.join(","), 19),
            created,
            user.email
        );
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the request fails.
pub(crate) async fn run_azure_status(client: &ApiClient, json: bool) -> anyhow::Result<()> {
    let status = client
        .azure_status()
        .await
        .map_err(|e| api_failure("failed to read storage status", &e))?;

    if json {
        return render::print_json(&serde_json::to_value(&status)?);
    }
    println!("url:         {}", status.azure_url);
    println!("file exists: {}", status.file_exists);
    println!("local file:  {}", status.local_file_path);
    if !status.all_files.is_empty() {
        println!("files:");
        for file in &status.all_files {
            println!("  {file}");
        }
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the request fails or the server reports failure.
pub(crate) async fn run_upload(client: &ApiClient) -> anyhow::Result<()> {
    let result = client
        .upload_to_azure()
        .await
        .map_err(|e| api_failure("upload failed", &e))?;
    let message = result.message.unwrap_or_else(|| "upload finished".to_string());
    if result.success == Some(false) {
        anyhow::bail!("upload failed: {message}");
    }
    println!("{message}");
    Ok(())
}
