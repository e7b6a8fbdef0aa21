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
fn parse_environment_known_values() {
    assert_eq!(parse_environment("development"), Environment::Development);
    assert_eq!(parse_environment("test"), Environment::Test);
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.shops_path.to_str(), Some("./config/shops.yaml"));
    assert!(cfg.redis_url.is_none());
    assert_eq!(cfg.results_per_page, 30);
    assert_eq!(cfg.cache_ttl_secs, 3600);
    assert_eq!(cfg.source_timeout_secs, 45);
    assert_eq!(cfg.max_source_pages, 10);
    assert_eq!(cfg.scraper_request_timeout_secs, 30);
    assert!(cfg.scraper_user_agent.starts_with("Mozilla/5.0"));
    assert_eq!(cfg.scraper_inter_request_delay_ms, 250);
    assert_eq!(cfg.scraper_max_retries, 2);
    assert_eq!(cfg.scraper_retry_backoff_base_ms, 500);
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("SHOPWIZ_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPWIZ_BIND_ADDR"),
        "expected InvalidEnvVar(SHOPWIZ_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn results_per_page_override() {
    let mut map = HashMap::new();
    map.insert("RESULTS_PER_PAGE", "24");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.results_per_page, 24);
}

#[test]
fn results_per_page_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("RESULTS_PER_PAGE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RESULTS_PER_PAGE"),
        "expected InvalidEnvVar(RESULTS_PER_PAGE), got: {result:?}"
    );
}

#[test]
fn results_per_page_invalid() {
    let mut map = HashMap::new();
    map.insert("RESULTS_PER_PAGE", "thirty");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RESULTS_PER_PAGE"
    ));
}

#[test]
fn cache_ttl_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("SHOPWIZ_CACHE_TTL_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPWIZ_CACHE_TTL_SECS"
    ));
}

#[test]
fn cache_ttl_beyond_one_year_is_rejected() {
    let mut map = HashMap::new();
    map.insert("SHOPWIZ_CACHE_TTL_SECS", "18446744073709551615");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnvVar { ref var, ref reason })
            if var == "SHOPWIZ_CACHE_TTL_SECS" && reason.contains("at most")
    ));
}

#[test]
fn redis_url_takes_precedence_over_host() {
    let mut map = HashMap::new();
    map.insert("REDIS_URL", "redis://cache.internal:6380/2");
    map.insert("REDIS_HOST", "ignored");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.redis_url.as_deref(), Some("redis://cache.internal:6380/2"));
}

#[test]
fn redis_url_built_from_host_and_default_port() {
    let mut map = HashMap::new();
    map.insert("REDIS_HOST", "localhost");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.redis_url.as_deref(), Some("redis://localhost:6379"));
}

#[test]
fn redis_port_invalid() {
    let mut map = HashMap::new();
    map.insert("REDIS_HOST", "localhost");
    map.insert("REDIS_PORT", "sixty");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "REDIS_PORT"
    ));
}

#[test]
fn source_timeout_override() {
    let mut map = HashMap::new();
    map.insert("SHOPWIZ_SOURCE_TIMEOUT_SECS", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.source_timeout_secs, 5);
}

#[test]
fn scraper_max_retries_invalid() {
    let mut map = HashMap::new();
    map.insert("SHOPWIZ_SCRAPER_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPWIZ_SCRAPER_MAX_RETRIES"
    ));
}

#[test]
fn debug_output_redacts_redis_url() {
    let mut map = HashMap::new();
    map.insert("REDIS_URL", "redis://:hunter2@cache:6379");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("hunter2"));
    assert!(rendered.contains("[redacted]"));
}
