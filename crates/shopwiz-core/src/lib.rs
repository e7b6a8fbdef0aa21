mod app_config;
mod config;
pub mod pagination;
mod products;
mod search;
mod shops;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{Product, ShopName, SourceSummary};
pub use search::{SearchMetadata, SearchResponse};
pub use shops::{load_shops, load_shops_or_default, ShopConfig, ShopsFile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read shops file {path}: {source}")]
    ShopsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse shops file: {0}")]
    ShopsFileParse(#[source] serde_yaml::Error),

    #[error("shops config validation failed: {0}")]
    Validation(String),
}
