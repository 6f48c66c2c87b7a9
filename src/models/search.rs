use serde::{Deserialize, Serialize};

/// Composed answer for one keyword; also the cached value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub keyword: String,
    pub summary: String,
    pub article: String,
    pub image_source: String,
}
