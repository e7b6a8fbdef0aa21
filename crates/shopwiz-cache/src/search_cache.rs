use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use shopwiz_core::{Product, ShopName, SourceSummary};

use crate::error::CacheError;
use crate::keys::{page_key, shop_count_key, total_pages_key};
use crate::store::CacheStore;

/// Typed access to cached search aggregates.
///
/// Every failure is absorbed here: a read error is logged and reads as a
/// miss, a write error is logged and skipped.
#[derive(Clone)]
pub struct SearchCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl SearchCache {
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    #[must_use]
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Checks the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`CacheError`] unchanged.
    pub async fn ping(&self) -> Result<(), CacheError> {
        self.store.ping().await
    }

    pub async fn total_pages(&self, keyword: &str) -> Option<u32> {
        self.read(&total_pages_key(keyword)).await
    }

    pub async fn page(&self, keyword: &str, page: u32) -> Option<Vec<Product>> {
        self.read(&page_key(keyword, page)).await
    }

    pub async fn shop_count(&self, keyword: &str, shop: ShopName) -> Option<u32> {
        self.read(&shop_count_key(keyword, shop)).await
    }

    /// Writes the page count, then every shop's count, then every page.
    ///
    /// Each key is written independently. A reader can see a new
    /// `totalPages` before all pages land; the orchestrator treats a missing
    /// page as a miss.
    pub async fn store_aggregate(
        &self,
        keyword: &str,
        pages: &[Vec<Product>],
        summaries: &[SourceSummary],
    ) {
        let total_pages = u32::try_from(pages.len()).unwrap_or(u32::MAX);
        self.write(&total_pages_key(keyword), &total_pages).await;

        for summary in summaries {
            self.write(
                &shop_count_key(keyword, summary.shop_name),
                &summary.item_count,
            )
            .await;
        }

        for (index, products) in (1u32..).zip(pages) {
            self.write(&page_key(keyword, index), products).await;
        }

        tracing::debug!(keyword, total_pages, "cached search aggregate");
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(source) => {
                let e = CacheError::Decode {
                    key: key.to_owned(),
                    source,
                };
                tracing::warn!(key, error = %e, "cache value unreadable, treating as miss");
                None
            }
        }
    }

    async fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(source) => {
                let e = CacheError::Encode {
                    key: key.to_owned(),
                    source,
                };
                tracing::warn!(key, error = %e, "cache write skipped");
                return;
            }
        };
        if let Err(e) = self.store.set_ex(key, &encoded, self.ttl).await {
            tracing::warn!(key, error = %e, "cache write failed");
        }
    }
}
