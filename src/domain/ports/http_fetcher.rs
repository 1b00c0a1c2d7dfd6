use crate::domain::error::DomainError;
use async_trait::async_trait;

/// Body of a successful GET.
#[derive(Debug, Clone)]
pub struct FetchedBody {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FetchedBody {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Single-attempt network fetch used by the image source resolver.
///
/// Implementations bound each call with a timeout and report transport
/// failures and non-success statuses as [`DomainError::Fetch`].
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchedBody, DomainError>;
}
