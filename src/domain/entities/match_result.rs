use crate::domain::entities::catalog_item::CatalogItem;
use crate::domain::values::item_id::ItemId;
use serde::{Deserialize, Serialize};

/// One ranked catalog hit. Built per request, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub description: String,
    /// Resolved serving URL of the item's asset.
    pub image: String,
    /// Cosine similarity in [-1, 1].
    pub similarity: f64,
}

impl MatchResult {
    pub fn from_item(item: &CatalogItem, similarity: f64, asset_base_url: &str) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            description: item.description.clone(),
            image: item.asset_url(asset_base_url),
            similarity,
        }
    }
}

/// Per-request knobs on top of the configured limit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchOptions {
    /// Drop hits scoring below this threshold.
    pub min_similarity: Option<f64>,
}
