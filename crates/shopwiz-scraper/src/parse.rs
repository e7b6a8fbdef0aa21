//! Text and attribute helpers shared by the retailer page layouts.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use scraper::{ElementRef, Selector};
use shopwiz_core::{Product, ShopName};

use crate::error::ScraperError;

static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d*\.?\d+").expect("valid price regex"));

static COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*").expect("valid count regex"));

/// Compiles a CSS selector, surfacing syntax errors as [`ScraperError::Selector`].
///
/// # Errors
///
/// Returns [`ScraperError::Selector`] if `css` is not a valid selector.
pub(crate) fn compile(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::Selector {
        selector: css.to_owned(),
        reason: e.to_string(),
    })
}

/// Parses a displayed price such as `"€2.29"` or `"Price: €10"` into a
/// two-decimal amount.
///
/// Every character outside `[0-9.-]` is stripped, then the longest leading
/// number is read and the rest ignored, so `"€1.20 €0.60/kg"` is `1.20`.
/// Returns `None` when no leading number is left or the amount is not
/// positive.
#[must_use]
pub fn parse_price(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let leading = PRICE_RE.find(&cleaned)?.as_str();
    let price = Decimal::from_str(leading).ok()?.round_dp(2);
    (price > Decimal::ZERO).then_some(price)
}

/// Parses the first integer in a retailer's "N results" text.
///
/// Thousands separators are accepted. Absent or unparsable text yields `0`.
/// The layout's count selector must isolate the element holding the total:
/// given `"Showing 48 of 312"` this returns the page size, not the total.
#[must_use]
pub fn parse_item_count(text: &str) -> u32 {
    COUNT_RE
        .find(text)
        .and_then(|m| m.as_str().replace(',', "").parse::<u32>().ok())
        .unwrap_or(0)
}

/// Returns the URL of the first candidate in a `srcset` attribute.
#[must_use]
pub fn first_srcset_candidate(srcset: &str) -> Option<String> {
    srcset
        .split(',')
        .next()?
        .split_whitespace()
        .next()
        .map(str::to_owned)
}

/// Resolves `href` against the shop's base URL.
///
/// Absolute links are returned unchanged. Returns `None` for empty links or
/// when neither side can be parsed.
#[must_use]
pub fn absolute_url(base_url: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if let Ok(url) = reqwest::Url::parse(href) {
        return Some(url.to_string());
    }
    let base = reqwest::Url::parse(base_url).ok()?;
    base.join(href).ok().map(|u| u.to_string())
}

/// Whitespace-normalised text of the first element matching `selector`.
pub(crate) fn select_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|el| normalise_whitespace(&el.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

/// Attribute value of the first element matching `selector`.
pub(crate) fn select_attr(
    scope: ElementRef<'_>,
    selector: &Selector,
    attr: &str,
) -> Option<String> {
    scope
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

pub(crate) fn normalise_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fields pulled from one product row before validation.
#[derive(Debug, Default)]
pub(crate) struct RawRow {
    pub name: Option<String>,
    pub price_text: Option<String>,
    pub image_url: Option<String>,
    pub href: Option<String>,
}

impl RawRow {
    /// Validates the row into a [`Product`].
    ///
    /// Rows without a name or a positive price are dropped.
    pub(crate) fn into_product(self, shop: ShopName, base_url: &str) -> Option<Product> {
        let name = self.name.filter(|n| !n.trim().is_empty())?;
        let Some(price) = self.price_text.as_deref().and_then(parse_price) else {
            tracing::debug!(%shop, name = %name, "dropping row without a usable price");
            return None;
        };
        Some(Product {
            name,
            price,
            image_url: self.image_url.and_then(|src| absolute_url(base_url, &src)),
            product_url: self.href.and_then(|href| absolute_url(base_url, &href)),
            source_shop: shop,
        })
    }
}
