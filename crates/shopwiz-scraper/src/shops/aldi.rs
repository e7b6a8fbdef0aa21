use scraper::{Html, Selector};
use shopwiz_core::{Product, ShopName};

use crate::client::build_search_url;
use crate::error::ScraperError;
use crate::listing::ShopLayout;
use crate::parse::{compile, parse_item_count, select_attr, select_text, RawRow};

const SEARCH_PATH: &str = "/en-GB/Search";

/// Aldi Ireland grocery search. The total count is carried on the search
/// summary element's `data-totalcount` attribute.
pub(crate) struct AldiLayout {
    summary: Selector,
    row: Selector,
    name: Selector,
    price: Selector,
    image: Selector,
    link: Selector,
}

impl AldiLayout {
    pub(crate) fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            summary: compile("div#vueSearchSummary")?,
            row: compile(r#"[data-qa="search-results"]"#)?,
            name: compile(r#"[data-qa="search-product-title"]"#)?,
            price: compile(".product-tile-price .h4 span")?,
            image: compile("img")?,
            link: compile("a[href]")?,
        })
    }
}

impl ShopLayout for AldiLayout {
    fn shop(&self) -> ShopName {
        ShopName::Aldi
    }

    // Aldi has no page-size parameter; it always serves its own fixed size.
    fn search_url(
        &self,
        base_url: &str,
        query: &str,
        page: u32,
        _page_size: u32,
    ) -> Result<String, ScraperError> {
        build_search_url(
            base_url,
            SEARCH_PATH,
            &[
                ("keywords", query),
                ("sortBy", "DisplayPrice"),
                ("sortDirection", "asc"),
                ("page", &page.to_string()),
            ],
        )
    }

    fn parse_total(&self, doc: &Html) -> u32 {
        select_attr(doc.root_element(), &self.summary, "data-totalcount")
            .map_or(0, |t| parse_item_count(&t))
    }

    fn parse_products(&self, doc: &Html, base_url: &str) -> Vec<Product> {
        doc.select(&self.row)
            .filter_map(|row| {
                RawRow {
                    name: select_text(row, &self.name),
                    price_text: select_text(row, &self.price),
                    image_url: select_attr(row, &self.image, "src"),
                    href: select_attr(row, &self.link, "href"),
                }
                .into_product(ShopName::Aldi, base_url)
            })
            .collect()
    }
}
