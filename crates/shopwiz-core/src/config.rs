use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Browser-like default so retailer edge caches serve the regular storefront.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

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
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("SHOPWIZ_ENV", "development"));
    let bind_addr = parse_addr("SHOPWIZ_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("SHOPWIZ_LOG_LEVEL", "info");
    let shops_path = PathBuf::from(or_default("SHOPWIZ_SHOPS_PATH", "./config/shops.yaml"));

    let redis_url = match lookup("REDIS_URL") {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => match lookup("REDIS_HOST") {
            Ok(host) if !host.trim().is_empty() => {
                let port = parse_u32("REDIS_PORT", "6379")?;
                Some(format!("redis://{host}:{port}"))
            }
            _ => None,
        },
    };

    let results_per_page = parse_usize("RESULTS_PER_PAGE", "30")?;
    if results_per_page == 0 {
        return Err(invalid("RESULTS_PER_PAGE", "must be at least 1".into()));
    }

    let cache_ttl_secs = parse_u64("SHOPWIZ_CACHE_TTL_SECS", "3600")?;
    if cache_ttl_secs == 0 {
        return Err(invalid("SHOPWIZ_CACHE_TTL_SECS", "must be at least 1".into()));
    }
    if cache_ttl_secs > MAX_CACHE_TTL_SECS {
        return Err(invalid(
            "SHOPWIZ_CACHE_TTL_SECS",
            format!("must be at most {MAX_CACHE_TTL_SECS} (one year)"),
        ));
    }

    let source_timeout_secs = parse_u64("SHOPWIZ_SOURCE_TIMEOUT_SECS", "45")?;
    let max_source_pages = parse_u32("SHOPWIZ_MAX_SOURCE_PAGES", "10")?;

    let scraper_request_timeout_secs = parse_u64("SHOPWIZ_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("SHOPWIZ_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let scraper_inter_request_delay_ms =
        parse_u64("SHOPWIZ_SCRAPER_INTER_REQUEST_DELAY_MS", "250")?;
    let scraper_max_retries = parse_u32("SHOPWIZ_SCRAPER_MAX_RETRIES", "2")?;
    let scraper_retry_backoff_base_ms =
        parse_u64("SHOPWIZ_SCRAPER_RETRY_BACKOFF_BASE_MS", "500")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        shops_path,
        redis_url,
        results_per_page,
        cache_ttl_secs,
        source_timeout_secs,
        max_source_pages,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_inter_request_delay_ms,
        scraper_max_retries,
        scraper_retry_backoff_base_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
