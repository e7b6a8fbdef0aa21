use std::sync::Arc;

use shopwiz_cache::keys::normalise_keyword;
use shopwiz_cache::SearchCache;
use shopwiz_core::pagination::{clamp_page, parse_page_param};
use shopwiz_core::{SearchMetadata, SearchResponse, ShopName, SourceSummary};
use shopwiz_scraper::SourceReport;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::aggregator::{Aggregate, Aggregator};
use crate::flight::SingleFlight;

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
    /// Empty query; neither the cache nor any shop was consulted.
    Skipped,
}

/// A search response plus the internal detail that is never cached.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub response: SearchResponse,
    pub cache: CacheStatus,
    /// Per-shop run reports. Empty on a cache hit.
    pub reports: Vec<SourceReport>,
}

/// Cache-first search across every configured shop.
///
/// On a hit the response is rebuilt from cached keys alone. On a miss the
/// aggregator runs on its own task (once per keyword, however many callers
/// are waiting) and the result is written back in the background. A caller
/// that gives up early does not cancel the scrape.
pub struct SearchService {
    aggregator: Arc<Aggregator>,
    cache: SearchCache,
    flights: SingleFlight<Arc<Aggregate>>,
    pending_writes: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl SearchService {
    #[must_use]
    pub fn new(aggregator: Aggregator, cache: SearchCache) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            cache,
            flights: SingleFlight::new(),
            pending_writes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[must_use]
    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    /// Shops fanned out to on a miss, in summary order.
    #[must_use]
    pub fn shops(&self) -> Vec<ShopName> {
        self.aggregator.shops()
    }

    /// Searches every shop for `query` and returns page `page`.
    ///
    /// `page` is taken as the caller sent it: empty or non-numeric selects
    /// page 1, and any number is clamped into the available range. Never
    /// fails; shop and cache failures degrade the result instead.
    pub async fn search(&self, query: &str, page: &str) -> SearchResponse {
        self.search_detailed(query, page).await.response
    }

    /// Like [`Self::search`], also returning cache status and shop reports.
    pub async fn search_detailed(&self, query: &str, page: &str) -> SearchOutcome {
        let display = query.trim();
        if display.is_empty() {
            return SearchOutcome {
                response: SearchResponse::empty(display),
                cache: CacheStatus::Skipped,
                reports: Vec::new(),
            };
        }

        let keyword = normalise_keyword(display);
        let requested = parse_page_param(page);

        if let Some(response) = self.from_cache(&keyword, display, requested).await {
            tracing::debug!(
                keyword = %keyword,
                page = response.search_metadata.current_page,
                "search cache hit"
            );
            return SearchOutcome {
                response,
                cache: CacheStatus::Hit,
                reports: Vec::new(),
            };
        }

        tracing::debug!(keyword = %keyword, "search cache miss");
        let aggregate = self.aggregate_once(&keyword, display).await;
        SearchOutcome {
            response: aggregate.page_response(display, requested),
            cache: CacheStatus::Miss,
            reports: aggregate.reports.clone(),
        }
    }

    /// Waits for every background cache write started so far.
    pub async fn flush_cache_writes(&self) {
        let handles = std::mem::take(&mut *self.pending_writes.lock().await);
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "cache write task did not complete");
            }
        }
    }

    /// Rebuilds a response purely from cache.
    ///
    /// A hit needs `totalPages` (at least 1) and the slice for the clamped
    /// page. Anything less is a miss, so a partially expired aggregate is
    /// scraped again rather than served incomplete.
    async fn from_cache(
        &self,
        keyword: &str,
        display: &str,
        requested: i64,
    ) -> Option<SearchResponse> {
        let total_pages = self.cache.total_pages(keyword).await?;
        if total_pages == 0 {
            return None;
        }
        let current_page = clamp_page(requested, total_pages);
        let products = self.cache.page(keyword, current_page).await?;

        let mut summary_per_shop = Vec::new();
        for shop in self.aggregator.shops() {
            let item_count = self.cache.shop_count(keyword, shop).await.unwrap_or(0);
            summary_per_shop.push(SourceSummary {
                shop_name: shop,
                item_count,
            });
        }

        Some(SearchResponse {
            products,
            summary_per_shop,
            search_metadata: SearchMetadata {
                keyword: display.to_owned(),
                current_page,
                total_pages,
            },
        })
    }

    async fn aggregate_once(&self, keyword: &str, query: &str) -> Arc<Aggregate> {
        let aggregator = Arc::clone(&self.aggregator);
        let cache = self.cache.clone();
        let pending_writes = Arc::clone(&self.pending_writes);
        let keyword_owned = keyword.to_owned();
        let query = query.to_owned();

        self.flights
            .run(keyword, move || async move {
                let aggregate = Arc::new(aggregator.aggregate(&query).await);
                if aggregate.is_empty() {
                    tracing::info!(keyword = %keyword_owned, "no products found, not caching");
                } else {
                    let to_store = Arc::clone(&aggregate);
                    let handle = tokio::spawn(async move {
                        cache
                            .store_aggregate(
                                &keyword_owned,
                                &to_store.pages,
                                &to_store.summary_per_shop,
                            )
                            .await;
                    });
                    let mut pending = pending_writes.lock().await;
                    pending.retain(|h| !h.is_finished());
                    pending.push(handle);
                }
                aggregate
            })
            .await
            .unwrap_or_else(|| Arc::new(self.aggregator.empty_aggregate()))
    }
}
