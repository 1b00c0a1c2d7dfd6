use crate::application::rank::SimilarityRanker;
use crate::application::resolve::{ImageSourceResolver, ResolvedQuery};
use crate::domain::entities::catalog::Catalog;
use crate::domain::entities::match_result::{MatchOptions, MatchResult};
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::values::embedding::EmbeddingVector;
use crate::domain::values::query_input::QueryInput;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tracing::Instrument;

/// Raw match request as sent by clients.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchQuery {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub min_similarity: Option<f64>,
}

impl MatchQuery {
    pub fn inline(data: impl Into<String>) -> Self {
        Self {
            image: Some(data.into()),
            ..Default::default()
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self {
            image_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            query: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_min_similarity(mut self, min: f64) -> Self {
        self.min_similarity = Some(min);
        self
    }

    fn options(&self) -> Result<MatchOptions, DomainError> {
        if let Some(min) = self.min_similarity {
            if !min.is_finite() || !(-1.0..=1.0).contains(&min) {
                return Err(DomainError::InvalidInput(format!(
                    "minSimilarity must be between -1 and 1, got {min}"
                )));
            }
        }
        Ok(MatchOptions {
            min_similarity: self.min_similarity,
        })
    }
}

/// Stages a match request moves through. Any of the first four can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStage {
    Received,
    Resolving,
    Embedding,
    Ranking,
    Responding,
}

impl fmt::Display for MatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStage::Received => write!(f, "received"),
            MatchStage::Resolving => write!(f, "resolving"),
            MatchStage::Embedding => write!(f, "embedding"),
            MatchStage::Ranking => write!(f, "ranking"),
            MatchStage::Responding => write!(f, "responding"),
        }
    }
}

pub struct MatchUseCase {
    catalog: Arc<Catalog>,
    resolver: Arc<ImageSourceResolver>,
    embedder: Arc<dyn EmbeddingProvider>,
    ranker: SimilarityRanker,
    asset_base_url: String,
}

impl MatchUseCase {
    pub fn new(
        catalog: Arc<Catalog>,
        resolver: Arc<ImageSourceResolver>,
        embedder: Arc<dyn EmbeddingProvider>,
        ranker: SimilarityRanker,
        asset_base_url: String,
    ) -> Self {
        Self {
            catalog,
            resolver,
            embedder,
            ranker,
            asset_base_url,
        }
    }

    /// Run one request through resolve, embed, rank and respond.
    ///
    /// Each stage is attempted once. A failure returns no results at all.
    pub async fn execute(&self, query: MatchQuery) -> Result<Vec<MatchResult>, DomainError> {
        let request_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("match", %request_id);
        self.run(query).instrument(span).await
    }

    async fn run(&self, query: MatchQuery) -> Result<Vec<MatchResult>, DomainError> {
        let options = query
            .options()
            .map_err(|e| failed(MatchStage::Received, "unknown", e))?;
        let input = QueryInput::from_fields(query.image, query.image_url, query.query)
            .map_err(|e| failed(MatchStage::Received, "unknown", e))?;
        let shape = input.shape();

        tracing::debug!(stage = %MatchStage::Resolving, input = shape);
        let resolved = self
            .resolver
            .resolve(&input)
            .await
            .map_err(|e| failed(MatchStage::Resolving, shape, e))?;

        tracing::debug!(stage = %MatchStage::Embedding, input = shape);
        let vector = self
            .embed(resolved)
            .await
            .map_err(|e| failed(MatchStage::Embedding, shape, e))?;

        tracing::debug!(stage = %MatchStage::Ranking, input = shape, dimension = vector.dimension());
        let hits = self
            .ranker
            .rank_catalog(vector, self.catalog.clone(), options)
            .await
            .map_err(|e| failed(MatchStage::Ranking, shape, e))?;

        let items = self.catalog.items();
        let results: Vec<MatchResult> = hits
            .into_iter()
            .map(|hit| MatchResult::from_item(&items[hit.index], hit.similarity, &self.asset_base_url))
            .collect();

        tracing::info!(
            stage = %MatchStage::Responding,
            input = shape,
            results = results.len(),
            top = results.first().map(|r| r.similarity),
            "match complete"
        );
        Ok(results)
    }

    async fn embed(&self, resolved: ResolvedQuery) -> Result<EmbeddingVector, DomainError> {
        let vector = match &resolved {
            ResolvedQuery::Image(image) => self.embedder.embed_image(image).await,
            ResolvedQuery::Text(text) => self.embedder.embed_text(text).await,
        }
        .map_err(|e| match e {
            DomainError::Embedding(_) => e,
            other => DomainError::Embedding(other.to_string()),
        })?;

        if !vector.is_valid() {
            return Err(DomainError::Embedding(
                "provider returned an empty or non-finite vector".into(),
            ));
        }
        if let Some(expected) = self.catalog.dimension() {
            if expected != vector.dimension() {
                tracing::warn!(
                    expected,
                    actual = vector.dimension(),
                    "query dimension differs from catalog; no item will be comparable"
                );
            }
        }
        Ok(vector)
    }
}

fn failed(stage: MatchStage, shape: &str, err: DomainError) -> DomainError {
    if err.is_client_error() {
        tracing::warn!(%stage, input = shape, kind = err.kind(), error = %err, "match rejected");
    } else {
        tracing::error!(%stage, input = shape, kind = err.kind(), error = %err, "match failed");
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_field_names() {
        let q: MatchQuery =
            serde_json::from_str(r#"{"imageUrl": "https://x/y.png", "minSimilarity": 0.4}"#)
                .unwrap();
        assert_eq!(q.image_url.as_deref(), Some("https://x/y.png"));
        assert_eq!(q.min_similarity, Some(0.4));
        assert!(q.image.is_none() && q.query.is_none());
    }

    #[test]
    fn test_min_similarity_bounds() {
        assert!(MatchQuery::text("a").with_min_similarity(0.5).options().is_ok());
        assert!(MatchQuery::text("a").with_min_similarity(1.5).options().is_err());
        assert!(MatchQuery::text("a").with_min_similarity(f64::NAN).options().is_err());
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(MatchStage::Resolving.to_string(), "resolving");
        assert_eq!(MatchStage::Responding.to_string(), "responding");
    }
}
