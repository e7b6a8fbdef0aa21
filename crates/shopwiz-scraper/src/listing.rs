//! Multi-page search listing for HTML storefronts.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use scraper::Html;
use shopwiz_core::pagination::page_count;
use shopwiz_core::{AppConfig, Product, ShopConfig, ShopName};

use crate::client::RetailerClient;
use crate::error::ScraperError;
use crate::source::{ShopAdapter, SourceListing};

/// Where a retailer's search results live and how to read them.
pub(crate) trait ShopLayout: Send + Sync {
    fn shop(&self) -> ShopName;

    /// URL of 1-based sub-page `page` of results for `query`.
    fn search_url(
        &self,
        base_url: &str,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<String, ScraperError>;

    /// The retailer's reported total result count, `0` if absent.
    fn parse_total(&self, doc: &Html) -> u32;

    /// Every valid product row on the page.
    fn parse_products(&self, doc: &Html, base_url: &str) -> Vec<Product>;
}

/// Crawl limits shared by every listing adapter.
#[derive(Debug, Clone, Copy)]
pub struct ListingSettings {
    pub max_pages: u32,
    pub inter_request_delay_ms: u64,
}

impl ListingSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_pages: config.max_source_pages,
            inter_request_delay_ms: config.scraper_inter_request_delay_ms,
        }
    }
}

struct ParsedPage {
    total: u32,
    products: Vec<Product>,
}

/// Parses one page body. `Html` is not `Send`, so it never outlives this call.
fn parse_page(layout: &dyn ShopLayout, body: &str, base_url: &str) -> ParsedPage {
    let doc = Html::parse_document(body);
    ParsedPage {
        total: layout.parse_total(&doc),
        products: layout.parse_products(&doc, base_url),
    }
}

/// A [`ShopAdapter`] that walks a retailer's paginated search results.
pub(crate) struct ListingAdapter {
    layout: Box<dyn ShopLayout>,
    client: Arc<RetailerClient>,
    base_url: String,
    page_size: u32,
    headers: HeaderMap,
    settings: ListingSettings,
}

impl ListingAdapter {
    pub(crate) fn new(
        layout: Box<dyn ShopLayout>,
        config: &ShopConfig,
        client: Arc<RetailerClient>,
        settings: ListingSettings,
    ) -> Result<Self, ScraperError> {
        let headers = RetailerClient::request_headers(&config.base_url, &config.headers)?;
        Ok(Self {
            layout,
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            page_size: config.page_size.max(1),
            headers,
            settings,
        })
    }

    async fn fetch_page(&self, query: &str, page: u32) -> Result<ParsedPage, ScraperError> {
        let url = self
            .layout
            .search_url(&self.base_url, query, page, self.page_size)?;
        let body = self.client.fetch_html(&url, &self.headers).await?;
        let parsed = parse_page(self.layout.as_ref(), &body, &self.base_url);
        tracing::debug!(
            shop = %self.layout.shop(),
            query,
            page,
            products = parsed.products.len(),
            "fetched sub-page"
        );
        Ok(parsed)
    }
}

#[async_trait]
impl ShopAdapter for ListingAdapter {
    fn shop(&self) -> ShopName {
        self.layout.shop()
    }

    /// Fetches sub-page 1, reads the reported total from it, then fetches the
    /// remaining sub-pages needed to cover that total.
    ///
    /// **All-or-nothing semantics**: on any sub-page failure the products
    /// gathered so far are discarded and the error is returned.
    ///
    /// At most `max_pages` sub-pages are fetched. The reported total is kept
    /// even when the cap cuts the crawl short.
    async fn fetch_listing(&self, query: &str) -> Result<SourceListing, ScraperError> {
        let shop = self.layout.shop();
        let first = self.fetch_page(query, 1).await?;
        let item_count = first.total;
        let mut products = first.products;

        let needed = page_count(item_count as usize, self.page_size as usize);
        let max_pages = self.settings.max_pages.max(1);
        let pages = if needed > max_pages {
            tracing::warn!(
                %shop,
                query,
                item_count,
                needed,
                max_pages,
                "sub-page cap reached, remaining results skipped"
            );
            max_pages
        } else {
            needed
        };

        for page in 2..=pages {
            if self.settings.inter_request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.settings.inter_request_delay_ms))
                    .await;
            }
            let parsed = self.fetch_page(query, page).await?;
            products.extend(parsed.products);
        }

        Ok(SourceListing {
            products,
            item_count,
        })
    }
}
