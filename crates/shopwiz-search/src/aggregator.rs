use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use shopwiz_core::pagination::{clamp_page, paginate, sort_products};
use shopwiz_core::{Product, SearchMetadata, SearchResponse, ShopName, SourceSummary};
use shopwiz_scraper::{scrape_source, ShopAdapter, SourceReport};

/// The merged, sorted and paginated result of one search across all shops.
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    /// Consecutive pages of the price-sorted merge. Empty when nothing was found.
    pub pages: Vec<Vec<Product>>,
    /// One entry per adapter, in adapter order, including failed ones.
    pub summary_per_shop: Vec<SourceSummary>,
    pub total_products: usize,
    pub reports: Vec<SourceReport>,
}

impl Aggregate {
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        u32::try_from(self.pages.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_products == 0
    }

    /// The response for `requested`, clamped into the valid page range.
    #[must_use]
    pub fn page_response(&self, keyword: &str, requested: i64) -> SearchResponse {
        let total_pages = self.total_pages();
        let current_page = clamp_page(requested, total_pages);
        let products = self
            .pages
            .get(current_page as usize - 1)
            .cloned()
            .unwrap_or_default();
        SearchResponse {
            products,
            summary_per_shop: self.summary_per_shop.clone(),
            search_metadata: SearchMetadata {
                keyword: keyword.to_owned(),
                current_page,
                total_pages,
            },
        }
    }
}

/// Fans a query out to every adapter and merges what comes back.
pub struct Aggregator {
    adapters: Vec<Arc<dyn ShopAdapter>>,
    page_size: usize,
    source_timeout: Duration,
}

impl Aggregator {
    #[must_use]
    pub fn new(
        adapters: Vec<Arc<dyn ShopAdapter>>,
        page_size: usize,
        source_timeout: Duration,
    ) -> Self {
        Self {
            adapters,
            page_size: page_size.max(1),
            source_timeout,
        }
    }

    /// Shops in the order their summaries are reported.
    #[must_use]
    pub fn shops(&self) -> Vec<ShopName> {
        self.adapters.iter().map(|a| a.shop()).collect()
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// An aggregate with no products and a zero count for every shop.
    #[must_use]
    pub fn empty_aggregate(&self) -> Aggregate {
        Aggregate {
            summary_per_shop: self
                .adapters
                .iter()
                .map(|a| SourceSummary::empty(a.shop()))
                .collect(),
            ..Aggregate::default()
        }
    }

    /// Runs every adapter concurrently and waits for all of them.
    ///
    /// Adapters never fail from here: a failed or timed-out shop contributes
    /// no products and an `item_count` of 0.
    pub async fn aggregate(&self, query: &str) -> Aggregate {
        let started = Instant::now();
        let timeout = self.source_timeout;

        // Source futures own their adapter and query; the fan-out must be `Send`.
        let results = join_all(self.adapters.iter().map(|adapter| {
            let adapter = Arc::clone(adapter);
            let query = query.to_owned();
            async move { scrape_source(adapter.as_ref(), &query, timeout).await }
        }))
        .await;

        let mut products = Vec::new();
        let mut summary_per_shop = Vec::with_capacity(results.len());
        let mut reports = Vec::with_capacity(results.len());
        for (listing, report) in results {
            summary_per_shop.push(listing.summary(report.shop));
            products.extend(listing.products);
            reports.push(report);
        }

        sort_products(&mut products);
        let total_products = products.len();
        let pages = paginate(products, self.page_size);

        let failed = reports.iter().filter(|r| !r.succeeded()).count();
        #[allow(clippy::cast_possible_truncation)]
        let elapsed_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            query,
            total_products,
            total_pages = pages.len(),
            failed_sources = failed,
            elapsed_ms,
            "search aggregate complete"
        );

        Aggregate {
            pages,
            summary_per_shop,
            total_products,
            reports,
        }
    }
}
