use crate::domain::entities::catalog_item::CatalogItem;
use crate::domain::error::DomainError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// Immutable, pre-embedded catalog snapshot.
///
/// Built once at startup and shared behind an `Arc`; there is no way to
/// mutate it afterwards, so concurrent readers need no locking.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    source: String,
    loaded_at: DateTime<Utc>,
    dimension: Option<usize>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogStats {
    pub source: String,
    pub loaded_at: DateTime<Utc>,
    pub total_items: usize,
    pub embedded_items: usize,
    pub dimension: Option<usize>,
    /// Embedded items whose length differs from `dimension`; never ranked.
    pub mismatched_items: usize,
}

impl Catalog {
    /// Take ownership of `items` in catalog order. Identifiers must be unique.
    pub fn new(items: Vec<CatalogItem>, source: impl Into<String>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(&item.id) {
                return Err(DomainError::Catalog(format!(
                    "duplicate item id {}",
                    item.id
                )));
            }
        }

        let dimension = items
            .iter()
            .filter_map(|i| i.embedding.as_ref())
            .map(|e| e.dimension())
            .next();

        Ok(Self {
            items,
            source: source.into(),
            loaded_at: Utc::now(),
            dimension,
        })
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            source: "empty".into(),
            loaded_at: Utc::now(),
            dimension: None,
        }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Dimension of the first embedded item, taken as the catalog's D.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// First `limit` items in catalog order.
    pub fn page(&self, limit: usize) -> &[CatalogItem] {
        &self.items[..limit.min(self.items.len())]
    }

    pub fn stats(&self) -> CatalogStats {
        let embedded: Vec<usize> = self
            .items
            .iter()
            .filter_map(|i| i.embedding.as_ref())
            .map(|e| e.dimension())
            .collect();
        let mismatched_items = match self.dimension {
            Some(d) => embedded.iter().filter(|&&len| len != d).count(),
            None => 0,
        };
        CatalogStats {
            source: self.source.clone(),
            loaded_at: self.loaded_at,
            total_items: self.items.len(),
            embedded_items: embedded.len(),
            dimension: self.dimension,
            mismatched_items,
        }
    }
}
