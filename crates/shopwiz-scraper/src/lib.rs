pub mod client;
pub mod error;
mod listing;
pub mod parse;
mod rate_limit;
pub mod shops;
pub mod source;

pub use client::RetailerClient;
pub use error::ScraperError;
pub use listing::ListingSettings;
pub use shops::{build_adapter, build_adapters};
pub use source::{scrape_source, ShopAdapter, SourceListing, SourceOutcome, SourceReport};
