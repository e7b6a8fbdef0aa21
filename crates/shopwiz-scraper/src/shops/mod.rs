//! Per-retailer page layouts and adapter construction.

mod aldi;
mod supervalu;
mod tesco;

use std::sync::Arc;

use shopwiz_core::{ShopConfig, ShopName, ShopsFile};

use crate::client::RetailerClient;
use crate::error::ScraperError;
use crate::listing::{ListingAdapter, ListingSettings, ShopLayout};
use crate::source::ShopAdapter;

fn layout_for(shop: ShopName) -> Result<Box<dyn ShopLayout>, ScraperError> {
    Ok(match shop {
        ShopName::Tesco => Box::new(tesco::TescoLayout::new()?),
        ShopName::Aldi => Box::new(aldi::AldiLayout::new()?),
        ShopName::Supervalu => Box::new(supervalu::SupervaluLayout::new()?),
    })
}

/// Builds the adapter for one configured shop, enabled or not.
///
/// # Errors
///
/// Returns [`ScraperError`] if a selector fails to compile or a configured
/// header is invalid.
pub fn build_adapter(
    config: &ShopConfig,
    client: Arc<RetailerClient>,
    settings: ListingSettings,
) -> Result<Arc<dyn ShopAdapter>, ScraperError> {
    let adapter = ListingAdapter::new(layout_for(config.shop)?, config, client, settings)?;
    Ok(Arc::new(adapter))
}

/// Builds adapters for every enabled shop, sharing one HTTP client.
///
/// # Errors
///
/// Returns the first [`ScraperError`] from [`build_adapter`].
pub fn build_adapters(
    shops: &ShopsFile,
    client: &Arc<RetailerClient>,
    settings: ListingSettings,
) -> Result<Vec<Arc<dyn ShopAdapter>>, ScraperError> {
    shops
        .enabled()
        .map(|config| build_adapter(config, Arc::clone(client), settings))
        .collect()
}
