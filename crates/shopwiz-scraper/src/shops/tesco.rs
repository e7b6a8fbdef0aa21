use scraper::{Html, Selector};
use shopwiz_core::{Product, ShopName};

use crate::client::build_search_url;
use crate::error::ScraperError;
use crate::listing::ShopLayout;
use crate::parse::{compile, first_srcset_candidate, parse_item_count, select_attr, select_text, RawRow};

const SEARCH_PATH: &str = "/groceries/en-IE/search";

/// Tesco Ireland server-rendered search results.
pub(crate) struct TescoLayout {
    total: Selector,
    row: Selector,
    name: Selector,
    price: Selector,
    image: Selector,
    link: Selector,
}

impl TescoLayout {
    pub(crate) fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            total: compile("div.pagination__items-displayed > strong:nth-child(2)")?,
            row: compile("li.product-list--list-item")?,
            name: compile("div.product-details--wrapper h3 span")?,
            price: compile("div.product-details--wrapper form p")?,
            image: compile("div.product-image__container img")?,
            link: compile("a[href]")?,
        })
    }
}

impl ShopLayout for TescoLayout {
    fn shop(&self) -> ShopName {
        ShopName::Tesco
    }

    fn search_url(
        &self,
        base_url: &str,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<String, ScraperError> {
        build_search_url(
            base_url,
            SEARCH_PATH,
            &[
                ("query", query),
                ("sortBy", "price-ascending"),
                ("page", &page.to_string()),
                ("count", &page_size.to_string()),
            ],
        )
    }

    fn parse_total(&self, doc: &Html) -> u32 {
        select_text(doc.root_element(), &self.total).map_or(0, |t| parse_item_count(&t))
    }

    fn parse_products(&self, doc: &Html, base_url: &str) -> Vec<Product> {
        doc.select(&self.row)
            .filter_map(|row| {
                let image_url = select_attr(row, &self.image, "srcset")
                    .and_then(|srcset| first_srcset_candidate(&srcset))
                    .or_else(|| select_attr(row, &self.image, "src"));
                RawRow {
                    name: select_text(row, &self.name),
                    price_text: select_text(row, &self.price),
                    image_url,
                    href: select_attr(row, &self.link, "href"),
                }
                .into_product(ShopName::Tesco, base_url)
            })
            .collect()
    }
}
