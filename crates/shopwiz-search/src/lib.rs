mod aggregator;
mod bootstrap;
mod flight;
mod service;

pub use aggregator::{Aggregate, Aggregator};
pub use bootstrap::build_search_service;
pub use flight::SingleFlight;
pub use service::{CacheStatus, SearchOutcome, SearchService};
