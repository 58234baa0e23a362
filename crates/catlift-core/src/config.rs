use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
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
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let env = parse_environment(&or_default("CATLIFT_ENV", "development"))?;
    let log_level = or_default("CATLIFT_LOG_LEVEL", "info");
    let site_path = PathBuf::from(or_default("CATLIFT_SITE_PATH", "./config/site.yaml"));
    let data_dir = PathBuf::from(or_default("CATLIFT_DATA_DIR", "./data"));

    let fetch_timeout_secs = parse_u64("CATLIFT_FETCH_TIMEOUT_SECS", "30")?;
    let fetch_user_agent = or_default("CATLIFT_FETCH_USER_AGENT", DEFAULT_USER_AGENT);
    let fetch_max_retries = parse_u32("CATLIFT_FETCH_MAX_RETRIES", "1")?;
    let fetch_retry_backoff_ms = parse_u64("CATLIFT_FETCH_RETRY_BACKOFF_MS", "2000")?;
    let inter_request_delay_ms = parse_u64("CATLIFT_INTER_REQUEST_DELAY_MS", "200")?;

    let shopify_store_url = optional("CATLIFT_SHOPIFY_STORE_URL");
    let shopify_access_token = optional("CATLIFT_SHOPIFY_ACCESS_TOKEN");
    let shopify_api_version = or_default("CATLIFT_SHOPIFY_API_VERSION", "2023-07");
    let provision_delay_ms = parse_u64("CATLIFT_PROVISION_DELAY_MS", "2000")?;

    Ok(AppConfig {
        env,
        log_level,
        site_path,
        data_dir,
        fetch_timeout_secs,
        fetch_user_agent,
        fetch_max_retries,
        fetch_retry_backoff_ms,
        inter_request_delay_ms,
        shopify_store_url,
        shopify_access_token,
        shopify_api_version,
        provision_delay_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CATLIFT_ENV".to_string(),
            reason: format!("unknown environment {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
