use crate::domain::values::embedding::EmbeddingVector;
use crate::domain::values::item_id::ItemId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub description: String,
    /// Asset reference: a filename under the asset directory or an absolute URL.
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<EmbeddingVector>,
}

impl CatalogItem {
    pub fn new(
        id: ItemId,
        name: String,
        category: String,
        description: String,
        image: String,
        embedding: Option<EmbeddingVector>,
    ) -> Self {
        Self {
            id,
            name,
            category,
            description,
            image,
            embedding,
        }
    }

    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }

    /// Serving URL for this item's asset under `base_url`.
    pub fn asset_url(&self, base_url: &str) -> String {
        resolve_asset_url(base_url, &self.image)
    }
}

/// Join a relative asset reference onto the serving base. Absolute URLs and
/// data URIs are returned unchanged.
pub fn resolve_asset_url(base_url: &str, reference: &str) -> String {
    let lowered = reference.to_ascii_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") || lowered.starts_with("data:")
    {
        return reference.to_string();
    }
    let base = base_url.trim_end_matches('/');
    let name = reference.trim_start_matches('/');
    format!("{base}/{name}")
}

/// Catalog item as listed by `/products`: metadata only, no embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSummary {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub description: String,
    pub image: String,
}

impl ProductSummary {
    pub fn from_item(item: &CatalogItem, base_url: &str) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            description: item.description.clone(),
            image: item.asset_url(base_url),
        }
    }
}
