use crate::domain::error::DomainError;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct Asset {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Raw catalog assets served by name.
///
/// Names that try to escape the store and names that do not exist both
/// produce [`DomainError::NotFound`].
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn fetch(&self, name: &str) -> Result<Asset, DomainError>;
}
