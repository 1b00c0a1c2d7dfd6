use crate::domain::entities::catalog::Catalog;
use crate::domain::entities::catalog_item::CatalogItem;
use crate::domain::entities::match_result::MatchOptions;
use crate::domain::error::DomainError;
use crate::domain::values::embedding::EmbeddingVector;
use std::sync::Arc;

/// Catalogs larger than this are scanned on the blocking pool.
pub const BLOCKING_SCAN_THRESHOLD: usize = 4096;

/// Position of a scored item in the catalog plus its similarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedHit {
    pub index: usize,
    pub similarity: f64,
}

/// Score every embedded item against `query`, best first.
///
/// Items without an embedding, with a different dimension or with a
/// degenerate vector are skipped. The sort is stable, so equal scores keep
/// catalog order. Hits under `min_similarity` are dropped before truncating
/// to `limit`.
pub fn rank(
    query: &EmbeddingVector,
    items: &[CatalogItem],
    limit: usize,
    min_similarity: Option<f64>,
) -> Vec<RankedHit> {
    let mut hits: Vec<RankedHit> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let embedding = item.embedding.as_ref()?;
            let similarity = query.cosine(embedding)?;
            Some(RankedHit { index, similarity })
        })
        .filter(|hit| min_similarity.map_or(true, |min| hit.similarity >= min))
        .collect();

    hits.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    hits.truncate(limit);
    hits
}

/// Full-scan ranker over the shared catalog.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityRanker {
    limit: usize,
}

impl SimilarityRanker {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub async fn rank_catalog(
        &self,
        query: EmbeddingVector,
        catalog: Arc<Catalog>,
        options: MatchOptions,
    ) -> Result<Vec<RankedHit>, DomainError> {
        let limit = self.limit;
        if catalog.len() <= BLOCKING_SCAN_THRESHOLD {
            return Ok(rank(&query, catalog.items(), limit, options.min_similarity));
        }

        tokio::task::spawn_blocking(move || {
            rank(&query, catalog.items(), limit, options.min_similarity)
        })
        .await
        .map_err(|e| DomainError::Internal(format!("ranking task failed: {e}")))
    }
}
