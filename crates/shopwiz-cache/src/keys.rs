//! Cache key layout: `"{keyword}:{page-or-metric}"`.
//!
//! Values carry no schema version. Changing a payload shape needs a flush.

use shopwiz_core::ShopName;

pub const TOTAL_PAGES: &str = "totalPages";

/// The keyword used in cache keys: trimmed and lowercased.
#[must_use]
pub fn normalise_keyword(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Key holding the products for 1-based `page`.
#[must_use]
pub fn page_key(keyword: &str, page: u32) -> String {
    format!("{keyword}:{page}")
}

#[must_use]
pub fn total_pages_key(keyword: &str) -> String {
    format!("{keyword}:{TOTAL_PAGES}")
}

/// Key holding a shop's self-reported item count, e.g. `"milk:TESCO"`.
#[must_use]
pub fn shop_count_key(keyword: &str, shop: ShopName) -> String {
    format!("{keyword}:{shop}")
}
