use super::*;

#[test]
fn build_search_url_encodes_query() {
    let url = build_search_url(
        "https://www.tesco.ie",
        "/groceries/en-IE/search",
        &[("query", "semi skimmed milk & eggs"), ("page", "2")],
    )
    .unwrap();
    assert_eq!(
        url,
        "https://www.tesco.ie/groceries/en-IE/search?query=semi+skimmed+milk+%26+eggs&page=2"
    );
}

#[test]
fn build_search_url_keeps_base_path_prefix() {
    let url = build_search_url(
        "http://prerender.local:3001/render/",
        "/en-GB/Search",
        &[("keywords", "bread")],
    )
    .unwrap();
    assert_eq!(
        url,
        "http://prerender.local:3001/render/en-GB/Search?keywords=bread"
    );
}

#[test]
fn build_search_url_rejects_invalid_base() {
    let result = build_search_url("not-a-url", "/search", &[]);
    let err = result.unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidSearchUrl { .. }),
        "expected InvalidSearchUrl, got: {err:?}"
    );
}

#[test]
fn request_headers_sets_referer_to_origin() {
    let headers =
        RetailerClient::request_headers("https://shop.supervalu.ie/sm/delivery", &BTreeMap::new())
            .unwrap();
    assert_eq!(
        headers.get(reqwest::header::REFERER).unwrap(),
        "https://shop.supervalu.ie"
    );
    assert_eq!(
        headers.get(reqwest::header::ACCEPT_LANGUAGE).unwrap(),
        "en-IE,en;q=0.9"
    );
}

#[test]
fn request_headers_configured_values_override_defaults() {
    let mut extra = BTreeMap::new();
    extra.insert("accept-language".to_owned(), "ga-IE".to_owned());
    extra.insert("cookie".to_owned(), "session=abc123".to_owned());
    let headers = RetailerClient::request_headers("https://www.tesco.ie", &extra).unwrap();
    assert_eq!(headers.get(reqwest::header::ACCEPT_LANGUAGE).unwrap(), "ga-IE");
    assert_eq!(headers.get(reqwest::header::COOKIE).unwrap(), "session=abc123");
}

#[test]
fn request_headers_rejects_invalid_name() {
    let mut extra = BTreeMap::new();
    extra.insert("bad header".to_owned(), "x".to_owned());
    let err = RetailerClient::request_headers("https://www.tesco.ie", &extra).unwrap_err();
    assert!(matches!(err, ScraperError::InvalidHeader { ref name, .. } if name == "bad header"));
}

#[test]
fn extract_origin_strips_path() {
    assert_eq!(
        extract_origin("https://groceries.aldi.ie/en-GB/Search"),
        "https://groceries.aldi.ie"
    );
}

#[test]
fn extract_origin_trailing_slash() {
    assert_eq!(extract_origin("https://www.tesco.ie/"), "https://www.tesco.ie");
}

#[test]
fn extract_domain_strips_scheme_and_path() {
    assert_eq!(
        extract_domain("https://shop.supervalu.ie/sm/delivery/rsid/5550/results?q=milk"),
        "shop.supervalu.ie"
    );
}

#[test]
fn extract_domain_fallback_no_scheme() {
    assert_eq!(extract_domain("www.tesco.ie"), "www.tesco.ie");
}
