use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid image data: {0}")]
    Decode(String),

    #[error("Failed to fetch image: {0}")]
    Fetch(String),

    #[error("Could not find an image on page: {0}")]
    Extraction(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl DomainError {
    /// Stable machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::InvalidInput(_) => "input_validation",
            DomainError::Decode(_) => "decode",
            DomainError::Fetch(_) => "fetch",
            DomainError::Extraction(_) => "extraction",
            DomainError::Embedding(_) => "embedding_compute",
            DomainError::Internal(_) => "internal",
            DomainError::NotFound(_) => "not_found",
            DomainError::Catalog(_) => "catalog",
            DomainError::Config(_) => "config",
        }
    }

    /// Whether the failure was caused by what the client sent.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidInput(_)
                | DomainError::Decode(_)
                | DomainError::Fetch(_)
                | DomainError::Extraction(_)
        )
    }
}

impl From<&str> for DomainError {
    fn from(s: &str) -> Self {
        DomainError::InvalidInput(s.to_string())
    }
}
