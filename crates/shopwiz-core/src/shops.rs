use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::products::ShopName;
use crate::ConfigError;

fn default_enabled() -> bool {
    true
}

/// Per-retailer adapter settings.
///
/// Session cookies and any other headers a retailer needs to serve an
/// unblocked page are supplied here by whoever provisions the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopConfig {
    pub shop: ShopName,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub base_url: String,
    pub page_size: u32,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl ShopConfig {
    /// Built-in settings for a shop: public storefront URL, the retailer's
    /// own results-per-page, no extra headers.
    #[must_use]
    pub fn default_for(shop: ShopName) -> Self {
        let (base_url, page_size) = match shop {
            ShopName::Tesco => ("https://www.tesco.ie", 48),
            ShopName::Aldi => ("https://groceries.aldi.ie", 36),
            ShopName::Supervalu => ("https://shop.supervalu.ie", 30),
        };
        Self {
            shop,
            enabled: true,
            base_url: base_url.to_string(),
            page_size,
            headers: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopsFile {
    pub shops: Vec<ShopConfig>,
}

impl ShopsFile {
    /// All known shops with built-in settings.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            shops: ShopName::ALL.into_iter().map(ShopConfig::default_for).collect(),
        }
    }

    /// Shops that should take part in searches.
    pub fn enabled(&self) -> impl Iterator<Item = &ShopConfig> {
        self.shops.iter().filter(|s| s.enabled)
    }

    #[must_use]
    pub fn get(&self, shop: ShopName) -> Option<&ShopConfig> {
        self.shops.iter().find(|s| s.shop == shop)
    }
}

/// Load and validate the shops configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_shops(path: &Path) -> Result<ShopsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ShopsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let shops_file: ShopsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::ShopsFileParse)?;

    validate_shops(&shops_file)?;

    Ok(shops_file)
}

/// Like [`load_shops`], but a missing file yields [`ShopsFile::defaults`].
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read, parsed, or
/// fails validation.
pub fn load_shops_or_default(path: &Path) -> Result<ShopsFile, ConfigError> {
    if path.exists() {
        load_shops(path)
    } else {
        Ok(ShopsFile::defaults())
    }
}

fn validate_shops(shops_file: &ShopsFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for shop in &shops_file.shops {
        if !seen.insert(shop.shop) {
            return Err(ConfigError::Validation(format!(
                "duplicate shop entry: '{}'",
                shop.shop
            )));
        }

        if shop.page_size == 0 {
            return Err(ConfigError::Validation(format!(
                "shop '{}' has page_size 0; must be at least 1",
                shop.shop
            )));
        }

        let base = shop.base_url.trim();
        let host = base
            .strip_prefix("https://")
            .or_else(|| base.strip_prefix("http://"));
        if !matches!(host, Some(h) if !h.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "shop '{}' has invalid base_url '{}'; must be an http(s) URL",
                shop.shop, shop.base_url
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "shops_test.rs"]
mod tests;
