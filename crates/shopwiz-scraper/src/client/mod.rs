//! HTTP client for retailer search pages.

mod origin;

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use shopwiz_core::AppConfig;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

pub use origin::extract_origin;
pub(crate) use origin::extract_domain;

/// Fetches retailer search pages as HTML text.
///
/// Maps 429 to [`ScraperError::RateLimited`], 403 to [`ScraperError::Blocked`],
/// 404 to [`ScraperError::NotFound`] and any other non-2xx response to
/// [`ScraperError::UnexpectedStatus`]. Transient errors (429, network failures)
/// are retried with jittered exponential backoff up to `max_retries` times.
///
/// One client is shared by every adapter so connections are pooled.
pub struct RetailerClient {
    client: Client,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl RetailerClient {
    /// Creates a `RetailerClient` with a request timeout, default `User-Agent`,
    /// and retry policy.
    ///
    /// `max_retries` is the number of additional attempts after the first
    /// failure for retriable errors. Set to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Creates a client from the `SHOPWIZ_SCRAPER_*` settings.
    ///
    /// # Errors
    ///
    /// See [`RetailerClient::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
            config.scraper_max_retries,
            config.scraper_retry_backoff_base_ms,
        )
    }

    /// Builds the request headers for one shop.
    ///
    /// Starts from a browser-like profile with the shop origin as `Referer`,
    /// then applies `extra` on top so configured headers (cookies included)
    /// override the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidHeader`] if a configured header name or
    /// value is not valid HTTP.
    pub fn request_headers(
        base_url: &str,
        extra: &BTreeMap<String, String>,
    ) -> Result<HeaderMap, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-IE,en;q=0.9"),
        );
        headers.insert(
            reqwest::header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        );
        if let Ok(referer) = HeaderValue::from_str(&extract_origin(base_url)) {
            headers.insert(reqwest::header::REFERER, referer);
        }

        for (name, value) in extra {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| ScraperError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| ScraperError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }

    /// Fetches `url` and returns the response body, retrying transient errors.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries exhausted.
    /// - [`ScraperError::Blocked`]: HTTP 403 (not retried).
    /// - [`ScraperError::NotFound`]: HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network or TLS failure after all retries exhausted.
    pub async fn fetch_html(&self, url: &str, headers: &HeaderMap) -> Result<String, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.to_owned();
            let headers = headers.clone();
            async move {
                let response = self.client.get(&url).headers(headers).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);

                    return Err(ScraperError::RateLimited {
                        domain: extract_domain(&url),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::FORBIDDEN {
                    return Err(ScraperError::Blocked {
                        domain: extract_domain(&url),
                        url,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }
}

/// Joins `path` onto `base_url` and appends `params` as an encoded query string.
///
/// Any path already present on `base_url` is kept, so a pre-rendering proxy
/// mounted under a prefix still works.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidSearchUrl`] if `base_url` is not a valid
/// absolute URL.
pub fn build_search_url(
    base_url: &str,
    path: &str,
    params: &[(&str, &str)],
) -> Result<String, ScraperError> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = reqwest::Url::parse(&joined).map_err(|e| ScraperError::InvalidSearchUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ScraperError::InvalidSearchUrl {
            base_url: base_url.to_owned(),
            reason: "not a hierarchical URL".to_owned(),
        });
    }

    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }

    Ok(url.to_string())
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
