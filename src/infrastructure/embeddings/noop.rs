use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::values::canonical_image::CanonicalImage;
use crate::domain::values::embedding::EmbeddingVector;

/// Stand-in when no embedding model is configured. Catalog browsing keeps
/// working; every match attempt fails with an embedding error.
pub struct NoopProvider;

#[async_trait::async_trait]
impl EmbeddingProvider for NoopProvider {
    async fn embed_image(&self, _image: &CanonicalImage) -> Result<EmbeddingVector, DomainError> {
        Err(DomainError::Embedding("no embedding provider configured".into()))
    }

    async fn embed_text(&self, _text: &str) -> Result<EmbeddingVector, DomainError> {
        Err(DomainError::Embedding("no embedding provider configured".into()))
    }

    fn dimension(&self) -> usize {
        0
    }

    fn descriptor(&self) -> &str {
        "none"
    }
}
