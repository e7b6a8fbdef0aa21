use std::sync::Arc;
use std::time::Duration;

use shopwiz_cache::{connect_store, SearchCache};
use shopwiz_core::{AppConfig, ShopsFile};
use shopwiz_scraper::{build_adapters, ListingSettings, RetailerClient, ScraperError};

use crate::aggregator::Aggregator;
use crate::service::SearchService;

/// Wires a [`SearchService`] from application and shop configuration.
///
/// Connects to Redis when `config.redis_url` is set and reachable, otherwise
/// falls back to the in-process cache.
///
/// # Errors
///
/// Returns [`ScraperError`] if the HTTP client cannot be built or a shop's
/// adapter cannot be constructed (bad selector or header).
pub async fn build_search_service(
    config: &AppConfig,
    shops: &ShopsFile,
) -> Result<SearchService, ScraperError> {
    let client = Arc::new(RetailerClient::from_app_config(config)?);
    let adapters = build_adapters(shops, &client, ListingSettings::from_app_config(config))?;
    if adapters.is_empty() {
        tracing::warn!("no shops enabled; every search will return an empty result");
    }

    let aggregator = Aggregator::new(
        adapters,
        config.results_per_page,
        Duration::from_secs(config.source_timeout_secs),
    );
    let store = connect_store(config.redis_url.as_deref()).await;
    let cache = SearchCache::new(store, Duration::from_secs(config.cache_ttl_secs));
    tracing::info!(
        shops = ?aggregator.shops(),
        cache = cache.backend(),
        page_size = config.results_per_page,
        "search service ready"
    );

    Ok(SearchService::new(aggregator, cache))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopwiz_core::{Environment, ShopName};

    fn config() -> AppConfig {
        AppConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "debug".to_owned(),
            shops_path: "./config/shops.yaml".into(),
            redis_url: None,
            results_per_page: 30,
            cache_ttl_secs: 60,
            source_timeout_secs: 5,
            max_source_pages: 2,
            scraper_request_timeout_secs: 5,
            scraper_user_agent: "shopwiz-test".to_owned(),
            scraper_inter_request_delay_ms: 0,
            scraper_max_retries: 0,
            scraper_retry_backoff_base_ms: 10,
        }
    }

    #[tokio::test]
    async fn builds_with_in_memory_cache_when_redis_unset() {
        let service = build_search_service(&config(), &ShopsFile::defaults())
            .await
            .unwrap();
        assert_eq!(service.cache().backend(), "memory");
    }

    #[tokio::test]
    async fn disabled_shops_are_not_searched() {
        let mut shops = ShopsFile::defaults();
        for shop in &mut shops.shops {
            shop.enabled = shop.shop == ShopName::Aldi;
        }
        let service = build_search_service(&config(), &shops).await.unwrap();
        assert_eq!(service.shops(), vec![ShopName::Aldi]);
    }
}
