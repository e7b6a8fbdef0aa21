use serde::{Deserialize, Serialize};

use crate::products::{Product, SourceSummary};

/// Position of the returned page within the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetadata {
    pub keyword: String,
    pub current_page: u32,
    pub total_pages: u32,
}

/// One page of an aggregated search, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub products: Vec<Product>,
    #[serde(rename = "summaryPerShop")]
    pub summary_per_shop: Vec<SourceSummary>,
    #[serde(rename = "searchMetaData")]
    pub search_metadata: SearchMetadata,
}

impl SearchResponse {
    /// Response for a query that produced nothing to show.
    #[must_use]
    pub fn empty(keyword: impl Into<String>) -> Self {
        Self {
            products: Vec::new(),
            summary_per_shop: Vec::new(),
            search_metadata: SearchMetadata {
                keyword: keyword.into(),
                current_page: 1,
                total_pages: 0,
            },
        }
    }
}
