use crate::domain::entities::catalog::Catalog;
use crate::domain::entities::catalog_item::CatalogItem;
use crate::domain::error::DomainError;
use crate::domain::values::embedding::EmbeddingVector;
use crate::domain::values::item_id::ItemId;
use serde::Deserialize;
use std::path::Path;

/// One snapshot entry as written by the embedding precompute step.
///
/// `embedding` stays untyped so one bad vector drops only that embedding
/// instead of failing the whole snapshot.
#[derive(Debug, Deserialize)]
struct SnapshotRecord {
    id: ItemId,
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    description: String,
    image: String,
    #[serde(default)]
    embedding: Option<serde_json::Value>,
}

/// Read and validate a catalog snapshot from disk.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, DomainError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| DomainError::Catalog(format!("cannot read {}: {e}", path.display())))?;
    let catalog = parse_catalog(&raw, &path.display().to_string())?;

    let stats = catalog.stats();
    tracing::info!(
        source = %stats.source,
        total = stats.total_items,
        embedded = stats.embedded_items,
        dimension = ?stats.dimension,
        "catalog loaded"
    );
    if stats.mismatched_items > 0 {
        tracing::warn!(
            mismatched = stats.mismatched_items,
            "catalog items with a different embedding dimension will never be ranked"
        );
    }
    Ok(catalog)
}

/// Parse a snapshot document (a JSON array of items).
pub fn parse_catalog(raw: &str, source: &str) -> Result<Catalog, DomainError> {
    let records: Vec<SnapshotRecord> = serde_json::from_str(raw)
        .map_err(|e| DomainError::Catalog(format!("invalid snapshot {source}: {e}")))?;

    let items = records
        .into_iter()
        .map(|r| {
            let embedding = r.embedding.and_then(|value| match parse_embedding(&value) {
                Some(v) => Some(v),
                None => {
                    tracing::warn!(id = %r.id, "ignoring malformed embedding");
                    None
                }
            });
            CatalogItem::new(r.id, r.name, r.category, r.description, r.image, embedding)
        })
        .collect();

    Catalog::new(items, source)
}

fn parse_embedding(value: &serde_json::Value) -> Option<EmbeddingVector> {
    if value.is_null() {
        return None;
    }
    let values = value
        .as_array()?
        .iter()
        .map(|v| v.as_f64().map(|f| f as f32))
        .collect::<Option<Vec<f32>>>()?;
    let vector = EmbeddingVector::new(values);
    vector.is_valid().then_some(vector)
}
