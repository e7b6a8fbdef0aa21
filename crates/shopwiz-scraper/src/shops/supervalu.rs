use scraper::{ElementRef, Html, Selector};
use shopwiz_core::{Product, ShopName};

use crate::client::build_search_url;
use crate::error::ScraperError;
use crate::listing::ShopLayout;
use crate::parse::{
    compile, normalise_whitespace, parse_item_count, select_attr, select_text, RawRow,
};

const SEARCH_PATH: &str = "/sm/delivery/rsid/5550/results";

/// SuperValu storefront. Class names carry build hashes, so every selector
/// matches on the class prefix only.
pub(crate) struct SupervaluLayout {
    total: Selector,
    row: Selector,
    name: Selector,
    price: Selector,
    image: Selector,
    link: Selector,
}

impl SupervaluLayout {
    pub(crate) fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            total: compile(r#"h4[class^="Subtitle"]"#)?,
            row: compile(r#"[class^="ColListing"]"#)?,
            name: compile(r#"span[class^="ProductCardTitle"] > div"#)?,
            price: compile(r#"[class^="ProductCardPricing"] > span > span"#)?,
            image: compile(r#"[class^="ProductCardImageWrapper"] > div > img"#)?,
            link: compile("a[href]")?,
        })
    }

    /// The title div holds the product name as its first text node, followed
    /// by nested size and promo spans.
    fn product_name(&self, row: ElementRef<'_>) -> Option<String> {
        let title = row.select(&self.name).next()?;
        title
            .children()
            .filter_map(|node| node.value().as_text())
            .map(|text| normalise_whitespace(text))
            .find(|text| !text.is_empty())
            .or_else(|| select_text(row, &self.name))
    }
}

impl ShopLayout for SupervaluLayout {
    fn shop(&self) -> ShopName {
        ShopName::Supervalu
    }

    fn search_url(
        &self,
        base_url: &str,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<String, ScraperError> {
        let skip = u64::from(page.saturating_sub(1)) * u64::from(page_size);
        build_search_url(
            base_url,
            SEARCH_PATH,
            &[
                ("q", query),
                ("sort", "price"),
                ("page", &page.to_string()),
                ("skip", &skip.to_string()),
            ],
        )
    }

    fn parse_total(&self, doc: &Html) -> u32 {
        select_text(doc.root_element(), &self.total).map_or(0, |t| parse_item_count(&t))
    }

    fn parse_products(&self, doc: &Html, base_url: &str) -> Vec<Product> {
        doc.select(&self.row)
            .filter_map(|row| {
                RawRow {
                    name: self.product_name(row),
                    price_text: select_text(row, &self.price),
                    image_url: select_attr(row, &self.image, "src"),
                    href: select_attr(row, &self.link, "href"),
                }
                .into_product(ShopName::Supervalu, base_url)
            })
            .collect()
    }
}
