//! Command handlers for the CLI.
//!
//! Results go to stdout; source reports and logs go to stderr so `--json`
//! output can be piped.

use std::sync::Arc;
use std::time::Duration;

use shopwiz_core::pagination::sort_products;
use shopwiz_core::{AppConfig, Product, SearchResponse, ShopConfig, ShopName, ShopsFile};
use shopwiz_scraper::{
    build_adapter, scrape_source, ListingSettings, RetailerClient, SourceOutcome, SourceReport,
};
use shopwiz_search::CacheStatus;

/// Run a cache-first search across every enabled shop and print one page.
///
/// Waits for the background cache write before returning so the next
/// invocation can hit the cache.
///
/// # Errors
///
/// Returns an error if the search service cannot be built or the response
/// cannot be encoded as JSON.
pub(crate) async fn run_search(
    config: &AppConfig,
    shops: &ShopsFile,
    query: &str,
    page: &str,
    json: bool,
) -> anyhow::Result<()> {
    let service = shopwiz_search::build_search_service(config, shops).await?;
    let outcome = service.search_detailed(query, page).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.response)?);
    } else {
        print!("{}", format_response(&outcome.response, outcome.cache));
    }
    for report in &outcome.reports {
        eprintln!("{}", format_report(report));
    }

    service.flush_cache_writes().await;
    Ok(())
}

/// Scrape one shop directly and print its cheapest products and run report.
///
/// The shop is scraped even when disabled in the shops file; a shop missing
/// from the file uses its built-in settings.
///
/// # Errors
///
/// Returns an error if the HTTP client or the shop adapter cannot be built.
/// Scrape failures are reported, not returned.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    shops: &ShopsFile,
    shop: ShopName,
    query: &str,
    limit: usize,
) -> anyhow::Result<()> {
    let shop_config = shops
        .get(shop)
        .cloned()
        .unwrap_or_else(|| ShopConfig::default_for(shop));
    if !shop_config.enabled {
        tracing::warn!(%shop, "shop is disabled in the shops file; scraping anyway");
    }

    let client = Arc::new(RetailerClient::from_app_config(config)?);
    let adapter = build_adapter(
        &shop_config,
        client,
        ListingSettings::from_app_config(config),
    )?;
    let (mut listing, report) = scrape_source(
        adapter.as_ref(),
        query,
        Duration::from_secs(config.source_timeout_secs),
    )
    .await;

    sort_products(&mut listing.products);
    for product in listing.products.iter().take(limit) {
        println!("{}", format_product(product));
    }
    println!("{}", format_report(&report));
    Ok(())
}

pub(crate) fn print_shops(shops: &ShopsFile) {
    for shop in &shops.shops {
        let state = if shop.enabled { "enabled" } else { "disabled" };
        println!(
            "{:<10} {:<9} page_size={:<3} headers={:<2} {}",
            shop.shop.as_str(),
            state,
            shop.page_size,
            shop.headers.len(),
            shop.base_url
        );
    }
}

pub(crate) fn format_product(product: &Product) -> String {
    format!(
        "{:>8}  {:<10} {}",
        format!("€{}", product.price),
        product.source_shop.as_str(),
        product.name
    )
}

pub(crate) fn format_report(report: &SourceReport) -> String {
    let outcome = match &report.outcome {
        SourceOutcome::Succeeded => "ok".to_string(),
        SourceOutcome::Failed { reason } => format!("failed: {reason}"),
        SourceOutcome::TimedOut => "timed out".to_string(),
    };
    format!(
        "{:<10} {} listed, {} parsed in {} ms ({outcome})",
        report.shop.as_str(),
        report.item_count,
        report.products_parsed,
        report.elapsed.as_millis(),
    )
}

pub(crate) fn format_response(response: &SearchResponse, cache: CacheStatus) -> String {
    let meta = &response.search_metadata;
    let source = match cache {
        CacheStatus::Hit => "cached",
        CacheStatus::Miss => "live",
        CacheStatus::Skipped => "empty query",
    };
    let mut out = format!(
        "\"{}\": page {} of {} ({source})\n",
        meta.keyword, meta.current_page, meta.total_pages
    );
    for product in &response.products {
        out.push_str(&format_product(product));
        out.push('\n');
    }
    let counts: Vec<String> = response
        .summary_per_shop
        .iter()
        .map(|s| format!("{}={}", s.shop_name, s.item_count))
        .collect();
    if !counts.is_empty() {
        out.push_str(&counts.join(" "));
        out.push('\n');
    }
    out
}
