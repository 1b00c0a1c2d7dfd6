use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::values::canonical_image::CanonicalImage;
use crate::domain::values::embedding::EmbeddingVector;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for a CLIP-style embedding service.
///
/// The service exposes `POST {base_url}/embed/image` taking a base64 PNG and
/// `POST {base_url}/embed/text` taking a phrase; both answer
/// `{"embedding": [f32, ...]}` in the same vector space.
pub struct HttpEmbeddingProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    dimension: usize,
    descriptor: String,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    image: String,
}

#[derive(Serialize)]
struct TextRequest<'a> {
    model: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl HttpEmbeddingProvider {
    pub fn new(
        base_url: String,
        model: Option<String>,
        api_key: Option<String>,
        dimension: usize,
        timeout: Duration,
    ) -> Self {
        let model = model.unwrap_or_else(|| "clip-ViT-B-32".to_string());
        Self {
            client: Client::builder()
                .user_agent(concat!("visual-matcher/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            descriptor: model.clone(),
            model,
            api_key: api_key.filter(|k| !k.is_empty()),
            dimension,
        }
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<EmbeddingVector, DomainError> {
        let url = format!("{}{path}", self.base_url);
        let mut req = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| DomainError::Embedding(format!("embedding service error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Embedding(format!(
                "embedding service {status}: {body}"
            )));
        }

        let result: EmbedResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Embedding(format!("Parse error: {e}")))?;

        let vector = EmbeddingVector::new(result.embedding);
        if !vector.is_valid() {
            return Err(DomainError::Embedding(
                "embedding service returned an empty or non-finite vector".into(),
            ));
        }
        if self.dimension > 0 && vector.dimension() != self.dimension {
            return Err(DomainError::Embedding(format!(
                "dimension mismatch: expected {}, got {} (model: {})",
                self.dimension,
                vector.dimension(),
                self.model
            )));
        }
        Ok(vector)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed_image(&self, image: &CanonicalImage) -> Result<EmbeddingVector, DomainError> {
        let image = image.clone();
        let png = tokio::task::spawn_blocking(move || image.to_png())
            .await
            .map_err(|e| DomainError::Embedding(format!("PNG encoding task failed: {e}")))??;
        let body = ImageRequest {
            model: &self.model,
            image: STANDARD.encode(png),
        };
        self.post("/embed/image", &body).await
    }

    async fn embed_text(&self, text: &str) -> Result<EmbeddingVector, DomainError> {
        let body = TextRequest {
            model: &self.model,
            text,
        };
        self.post("/embed/text", &body).await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn descriptor(&self) -> &str {
        &self.descriptor
    }
}
