pub mod error;
pub mod keys;
mod memory;
mod redis_store;
mod search_cache;
mod store;

pub use error::CacheError;
pub use memory::MemoryCache;
pub use redis_store::RedisCache;
pub use search_cache::SearchCache;
pub use store::{connect_store, CacheStore};
