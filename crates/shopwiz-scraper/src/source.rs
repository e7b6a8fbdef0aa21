//! The adapter seam and the infallible wrapper the aggregator calls.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use shopwiz_core::{Product, ShopName, SourceSummary};

use crate::error::ScraperError;

/// Everything one retailer returned for a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceListing {
    pub products: Vec<Product>,
    /// The retailer's self-reported total, which can differ from
    /// `products.len()` when rows fail to parse or sub-pages are capped.
    pub item_count: u32,
}

impl SourceListing {
    #[must_use]
    pub fn summary(&self, shop: ShopName) -> SourceSummary {
        SourceSummary {
            shop_name: shop,
            item_count: self.item_count,
        }
    }
}

/// A per-retailer scraping unit.
///
/// Implementations may fail freely; [`scrape_source`] turns failures into an
/// empty listing so one retailer never aborts a search.
#[async_trait]
pub trait ShopAdapter: Send + Sync {
    fn shop(&self) -> ShopName;

    /// Fetches and parses every sub-page of results for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] if any sub-page cannot be fetched. Already
    /// parsed sub-pages are discarded.
    async fn fetch_listing(&self, query: &str) -> Result<SourceListing, ScraperError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Succeeded,
    Failed { reason: String },
    TimedOut,
}

/// How one adapter run went. Never part of the public response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub shop: ShopName,
    pub outcome: SourceOutcome,
    pub elapsed: Duration,
    pub products_parsed: usize,
    pub item_count: u32,
}

impl SourceReport {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.outcome == SourceOutcome::Succeeded
    }
}

/// Runs `adapter` under a wall-clock `timeout` and never fails.
///
/// A failure or timeout yields an empty listing with `item_count == 0`; the
/// reason is carried in the returned [`SourceReport`] and logged.
pub async fn scrape_source(
    adapter: &dyn ShopAdapter,
    query: &str,
    timeout: Duration,
) -> (SourceListing, SourceReport) {
    let shop = adapter.shop();
    let started = Instant::now();
    let result = tokio::time::timeout(timeout, adapter.fetch_listing(query)).await;
    let elapsed = started.elapsed();
    #[allow(clippy::cast_possible_truncation)]
    let elapsed_ms = elapsed.as_millis() as u64;

    let (listing, outcome) = match result {
        Ok(Ok(listing)) => {
            tracing::info!(
                %shop,
                query,
                item_count = listing.item_count,
                products = listing.products.len(),
                elapsed_ms,
                "source scrape complete"
            );
            (listing, SourceOutcome::Succeeded)
        }
        Ok(Err(e)) => {
            tracing::warn!(%shop, query, error = %e, elapsed_ms, "source scrape failed");
            (
                SourceListing::default(),
                SourceOutcome::Failed {
                    reason: e.to_string(),
                },
            )
        }
        Err(_) => {
            tracing::warn!(
                %shop,
                query,
                timeout_secs = timeout.as_secs(),
                "source scrape timed out"
            );
            (SourceListing::default(), SourceOutcome::TimedOut)
        }
    };

    let report = SourceReport {
        shop,
        outcome,
        elapsed,
        products_parsed: listing.products.len(),
        item_count: listing.item_count,
    };
    (listing, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    struct Fixed(ShopName, u32);

    #[async_trait]
    impl ShopAdapter for Fixed {
        fn shop(&self) -> ShopName {
            self.0
        }

        async fn fetch_listing(&self, _query: &str) -> Result<SourceListing, ScraperError> {
            Ok(SourceListing {
                products: vec![Product {
                    name: "Brown Bread".to_owned(),
                    price: Decimal::new(129, 2),
                    image_url: None,
                    product_url: None,
                    source_shop: self.0,
                }],
                item_count: self.1,
            })
        }
    }

    struct Failing;

    #[async_trait]
    impl ShopAdapter for Failing {
        fn shop(&self) -> ShopName {
            ShopName::Supervalu
        }

        async fn fetch_listing(&self, _query: &str) -> Result<SourceListing, ScraperError> {
            Err(ScraperError::Blocked {
                domain: "shop.supervalu.ie".to_owned(),
                url: "https://shop.supervalu.ie/sm/delivery/rsid/5550/results".to_owned(),
            })
        }
    }

    struct Hanging;

    #[async_trait]
    impl ShopAdapter for Hanging {
        fn shop(&self) -> ShopName {
            ShopName::Tesco
        }

        async fn fetch_listing(&self, _query: &str) -> Result<SourceListing, ScraperError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(SourceListing::default())
        }
    }

    #[tokio::test]
    async fn success_keeps_self_reported_count() {
        let (listing, report) =
            scrape_source(&Fixed(ShopName::Aldi, 17), "bread", Duration::from_secs(5)).await;
        assert_eq!(listing.products.len(), 1);
        assert_eq!(listing.summary(ShopName::Aldi).item_count, 17);
        assert!(report.succeeded());
        assert_eq!(report.products_parsed, 1);
    }

    #[tokio::test]
    async fn failure_becomes_empty_listing() {
        let (listing, report) = scrape_source(&Failing, "bread", Duration::from_secs(5)).await;
        assert!(listing.products.is_empty());
        assert_eq!(listing.item_count, 0);
        assert_eq!(report.shop, ShopName::Supervalu);
        assert!(matches!(
            report.outcome,
            SourceOutcome::Failed { ref reason } if reason.contains("HTTP 403")
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_becomes_empty_listing() {
        let (listing, report) = scrape_source(&Hanging, "bread", Duration::from_secs(2)).await;
        assert_eq!(listing, SourceListing::default());
        assert_eq!(report.outcome, SourceOutcome::TimedOut);
    }
}
