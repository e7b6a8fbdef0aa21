use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Retailers the pipeline knows how to scrape.
///
/// Serialized in upper case (`"TESCO"`) to match cached payloads and the
/// public response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShopName {
    Aldi,
    Tesco,
    Supervalu,
}

impl ShopName {
    /// Every known shop, in the order summaries are reported.
    pub const ALL: [ShopName; 3] = [ShopName::Tesco, ShopName::Aldi, ShopName::Supervalu];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ShopName::Aldi => "ALDI",
            ShopName::Tesco => "TESCO",
            ShopName::Supervalu => "SUPERVALU",
        }
    }

    /// Case-insensitive lookup, used by the CLI and the shops file.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALDI" => Some(ShopName::Aldi),
            "TESCO" => Some(ShopName::Tesco),
            "SUPERVALU" => Some(ShopName::Supervalu),
            _ => None,
        }
    }
}

impl std::fmt::Display for ShopName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized product row scraped from a retailer search page.
///
/// Adapters only construct a `Product` once both a non-empty name and a
/// positive price have been extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub product_url: Option<String>,
    pub source_shop: ShopName,
}

/// The item count a retailer reported for one query.
///
/// `item_count` is the retailer's own total, not the number of products
/// that were actually parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSummary {
    pub shop_name: ShopName,
    pub item_count: u32,
}

impl SourceSummary {
    #[must_use]
    pub fn empty(shop_name: ShopName) -> Self {
        Self {
            shop_name,
            item_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn shop_name_serializes_upper_case() {
        let json = serde_json::to_string(&ShopName::Supervalu).unwrap();
        assert_eq!(json, "\"SUPERVALU\"");
        let parsed: ShopName = serde_json::from_str("\"ALDI\"").unwrap();
        assert_eq!(parsed, ShopName::Aldi);
    }

    #[test]
    fn shop_name_parse_is_case_insensitive() {
        assert_eq!(ShopName::parse("tesco"), Some(ShopName::Tesco));
        assert_eq!(ShopName::parse(" SuperValu "), Some(ShopName::Supervalu));
        assert_eq!(ShopName::parse("lidl"), None);
    }

    #[test]
    fn product_uses_camel_case_fields() {
        let product = Product {
            name: "Avonmore Fresh Milk 2L".to_string(),
            price: Decimal::from_str("2.29").unwrap(),
            image_url: Some("https://img.example/milk.jpg".to_string()),
            product_url: None,
            source_shop: ShopName::Tesco,
        };
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["name"], "Avonmore Fresh Milk 2L");
        assert_eq!(value["price"], "2.29");
        assert_eq!(value["imageUrl"], "https://img.example/milk.jpg");
        assert!(value["productUrl"].is_null());
        assert_eq!(value["sourceShop"], "TESCO");
    }

    #[test]
    fn source_summary_shape() {
        let summary = SourceSummary {
            shop_name: ShopName::Aldi,
            item_count: 36,
        };
        let value = serde_json::to_value(summary).unwrap();
        assert_eq!(value["shopName"], "ALDI");
        assert_eq!(value["itemCount"], 36);
        assert_eq!(SourceSummary::empty(ShopName::Aldi).item_count, 0);
    }
}
