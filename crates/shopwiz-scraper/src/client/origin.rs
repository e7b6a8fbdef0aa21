//! URL origin and domain helpers for retailer requests.

/// Extracts the scheme+host origin from a shop base URL.
///
/// Given `"https://www.tesco.ie/groceries"`, returns `"https://www.tesco.ie"`.
/// Used as the `Referer` so requests look like in-site navigation.
#[must_use]
pub fn extract_origin(base_url: &str) -> String {
    reqwest::Url::parse(base_url).map_or_else(
        |e| {
            tracing::warn!(
                base_url,
                error = %e,
                "could not parse base_url, falling back to string split for origin; check config/shops.yaml"
            );
            base_url
                .trim_end_matches('/')
                .splitn(4, '/')
                .take(3)
                .collect::<Vec<_>>()
                .join("/")
        },
        |u| u.origin().ascii_serialization(),
    )
}

/// Extracts the hostname from a URL for use in error messages.
///
/// Falls back to the full URL string if parsing fails.
pub(crate) fn extract_domain(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}
