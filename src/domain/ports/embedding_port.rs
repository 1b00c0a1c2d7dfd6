use crate::domain::error::DomainError;
use crate::domain::values::canonical_image::CanonicalImage;
use crate::domain::values::embedding::EmbeddingVector;

/// External model that maps images and text into one shared vector space.
///
/// Both entry points must return vectors of the same dimension so text
/// queries can be ranked against an image-embedded catalog. Failures are
/// reported as [`DomainError::Embedding`].
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed_image(&self, image: &CanonicalImage) -> Result<EmbeddingVector, DomainError>;
    async fn embed_text(&self, text: &str) -> Result<EmbeddingVector, DomainError>;
    /// Expected output dimension, 0 when unknown.
    fn dimension(&self) -> usize;
    /// Model description reported by `/health`.
    fn descriptor(&self) -> &str;
}
