use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("request blocked by {domain} (HTTP 403) for {url}")]
    Blocked { domain: String, url: String },

    #[error("search page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid search URL for base \"{base_url}\": {reason}")]
    InvalidSearchUrl { base_url: String, reason: String },

    #[error("invalid request header \"{name}\": {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("invalid CSS selector \"{selector}\": {reason}")]
    Selector { selector: String, reason: String },
}
