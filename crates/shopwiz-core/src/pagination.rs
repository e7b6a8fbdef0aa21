//! Ordering and page arithmetic shared by the aggregator and the cache path.

use crate::products::Product;

/// Number of pages needed to show `total` items at `page_size` per page.
///
/// A `page_size` of zero is treated as one.
#[must_use]
pub fn page_count(total: usize, page_size: usize) -> u32 {
    let pages = total.div_ceil(page_size.max(1));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Parse a caller-supplied page number.
///
/// Empty or non-numeric input falls back to page 1. The result is not yet
/// clamped; see [`clamp_page`].
#[must_use]
pub fn parse_page_param(raw: &str) -> i64 {
    raw.trim().parse::<i64>().unwrap_or(1)
}

/// Clamp a requested page into `[1, max(total_pages, 1)]`.
#[must_use]
pub fn clamp_page(requested: i64, total_pages: u32) -> u32 {
    let last = i64::from(total_pages.max(1));
    let clamped = requested.clamp(1, last);
    u32::try_from(clamped).unwrap_or(1)
}

/// Sort products by price ascending.
///
/// Ties are broken by shop name and then product name so fixtures and cached
/// pages are reproducible. The sort is stable.
pub fn sort_products(products: &mut [Product]) {
    products.sort_by(|a, b| {
        a.price
            .cmp(&b.price)
            .then_with(|| a.source_shop.as_str().cmp(b.source_shop.as_str()))
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Split an already-sorted list into consecutive pages of `page_size`.
///
/// The last page may be short. An empty input yields no pages.
#[must_use]
pub fn paginate(products: Vec<Product>, page_size: usize) -> Vec<Vec<Product>> {
    let size = page_size.max(1);
    let mut pages = Vec::with_capacity(products.len().div_ceil(size));
    let mut iter = products.into_iter().peekable();
    while iter.peek().is_some() {
        pages.push(iter.by_ref().take(size).collect());
    }
    pages
}
