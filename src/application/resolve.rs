use crate::domain::error::DomainError;
use crate::domain::ports::content_page::ContentPageStrategy;
use crate::domain::ports::http_fetcher::HttpFetcher;
use crate::domain::values::canonical_image::{is_data_uri, CanonicalImage};
use crate::domain::values::query_input::QueryInput;
use reqwest::Url;
use std::sync::Arc;

/// Query ready for the embedding provider.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedQuery {
    Image(CanonicalImage),
    Text(String),
}

/// Turns any [`QueryInput`] into a canonical image or a text phrase.
pub struct ImageSourceResolver {
    fetcher: Arc<dyn HttpFetcher>,
    pages: Vec<Arc<dyn ContentPageStrategy>>,
}

impl ImageSourceResolver {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, pages: Vec<Arc<dyn ContentPageStrategy>>) -> Self {
        Self { fetcher, pages }
    }

    pub async fn resolve(&self, input: &QueryInput) -> Result<ResolvedQuery, DomainError> {
        match input {
            QueryInput::InlineImage(data) => {
                decode_inline(data.clone()).await.map(ResolvedQuery::Image)
            }
            QueryInput::ImageUrl(url) => self.resolve_url(url).await.map(ResolvedQuery::Image),
            QueryInput::Text(text) => Ok(ResolvedQuery::Text(text.clone())),
        }
    }

    async fn resolve_url(&self, url: &str) -> Result<CanonicalImage, DomainError> {
        // Inline payloads sometimes arrive in the URL field.
        if is_data_uri(url) {
            return decode_inline(url.to_string()).await;
        }
        validate_url(url)?;

        let direct = match self.pages.iter().find(|p| p.can_handle(url)) {
            Some(page) => {
                let body = self.fetcher.get(url).await?;
                let asset = page.extract(&body.text()).ok_or_else(|| {
                    DomainError::Extraction(format!("no {} image URL found in {url}", page.name()))
                })?;
                tracing::debug!(page = page.name(), %url, %asset, "resolved content page");
                // The page chose this URL, not the client.
                validate_url(&asset).map_err(|e| {
                    DomainError::Extraction(format!(
                        "{} page {url} links an unusable image URL: {e}",
                        page.name()
                    ))
                })?;
                asset
            }
            None => url.to_string(),
        };

        let body = self.fetcher.get(&direct).await?;
        let content_type = body.content_type;
        decode_bytes(body.bytes).await.map_err(|e| match (e, content_type) {
            (DomainError::Decode(msg), Some(ct)) => {
                DomainError::Decode(format!("{msg} (content-type {ct})"))
            }
            (e, _) => e,
        })
    }
}

// Decoding is CPU-bound; keep it off the async workers.
async fn decode_bytes(bytes: Vec<u8>) -> Result<CanonicalImage, DomainError> {
    tokio::task::spawn_blocking(move || CanonicalImage::from_bytes(&bytes))
        .await
        .map_err(|e| DomainError::Internal(format!("image decode task failed: {e}")))?
}

async fn decode_inline(data: String) -> Result<CanonicalImage, DomainError> {
    tokio::task::spawn_blocking(move || CanonicalImage::from_inline(&data))
        .await
        .map_err(|e| DomainError::Internal(format!("image decode task failed: {e}")))?
}

fn validate_url(url: &str) -> Result<(), DomainError> {
    let parsed =
        Url::parse(url).map_err(|e| DomainError::InvalidInput(format!("invalid URL {url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(DomainError::InvalidInput(format!(
            "unsupported URL scheme {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::http_fetcher::FetchedBody;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned bodies and records requested URLs.
    struct CannedFetcher {
        bodies: HashMap<String, Vec<u8>>,
        requested: Mutex<Vec<String>>,
    }

    impl CannedFetcher {
        fn new(bodies: &[(&str, Vec<u8>)]) -> Self {
            Self {
                bodies: bodies.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpFetcher for CannedFetcher {
        async fn get(&self, url: &str) -> Result<FetchedBody, DomainError> {
            self.requested.lock().unwrap().push(url.to_string());
            match self.bodies.get(url) {
                Some(bytes) => Ok(FetchedBody {
                    content_type: None,
                    bytes: bytes.clone(),
                }),
                None => Err(DomainError::Fetch(format!("{url} returned 404 Not Found"))),
            }
        }
    }

    struct ExamplePage;

    impl ContentPageStrategy for ExamplePage {
        fn name(&self) -> &str {
            "example"
        }
        fn can_handle(&self, url: &str) -> bool {
            url.starts_with("https://pages.example.com/")
        }
        fn extract(&self, html: &str) -> Option<String> {
            let start = html.find("https://cdn.example.com/")?;
            let rest = &html[start..];
            let end = rest.find('"').unwrap_or(rest.len());
            Some(rest[..end].to_string())
        }
    }

    /// Photo pages whose embedded link is not a fetchable URL.
    struct ScriptLinkPage;

    impl ContentPageStrategy for ScriptLinkPage {
        fn name(&self) -> &str {
            "script-link"
        }
        fn can_handle(&self, url: &str) -> bool {
            url.starts_with("https://odd.example.com/")
        }
        fn extract(&self, _html: &str) -> Option<String> {
            Some("javascript:alert(1)".to_string())
        }
    }

    fn png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([1, 2, 3]));
        CanonicalImage::from_rgb(img).to_png().unwrap()
    }

    fn resolver(fetcher: Arc<CannedFetcher>) -> ImageSourceResolver {
        let pages: Vec<Arc<dyn ContentPageStrategy>> = vec![Arc::new(ExamplePage)];
        ImageSourceResolver::new(fetcher, pages)
    }

    #[tokio::test]
    async fn test_text_passes_through() {
        let r = resolver(Arc::new(CannedFetcher::new(&[])));
        let resolved = r.resolve(&QueryInput::Text("blue sofa".into())).await.unwrap();
        assert_eq!(resolved, ResolvedQuery::Text("blue sofa".into()));
    }

    #[tokio::test]
    async fn test_direct_url() {
        let fetcher = Arc::new(CannedFetcher::new(&[("https://img.example.com/a.png", png())]));
        let r = resolver(fetcher.clone());
        let resolved = r
            .resolve(&QueryInput::ImageUrl("https://img.example.com/a.png".into()))
            .await
            .unwrap();
        assert!(matches!(resolved, ResolvedQuery::Image(ref img) if img.width() == 2));
        assert_eq!(fetcher.requested.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_content_page_is_followed() {
        let html = br#"<img src="https://cdn.example.com/photo.png">"#.to_vec();
        let fetcher = Arc::new(CannedFetcher::new(&[
            ("https://pages.example.com/photo/1", html),
            ("https://cdn.example.com/photo.png", png()),
        ]));
        let r = resolver(fetcher.clone());
        let resolved = r
            .resolve(&QueryInput::ImageUrl("https://pages.example.com/photo/1".into()))
            .await
            .unwrap();
        assert!(matches!(resolved, ResolvedQuery::Image(_)));
        assert_eq!(
            *fetcher.requested.lock().unwrap(),
            vec![
                "https://pages.example.com/photo/1".to_string(),
                "https://cdn.example.com/photo.png".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_content_page_without_asset_is_extraction_error() {
        let fetcher = Arc::new(CannedFetcher::new(&[(
            "https://pages.example.com/photo/2",
            b"<html>nothing</html>".to_vec(),
        )]));
        let r = resolver(fetcher.clone());
        let err = r
            .resolve(&QueryInput::ImageUrl("https://pages.example.com/photo/2".into()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "extraction");
        assert_eq!(fetcher.requested.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unusable_extracted_url_is_extraction_error() {
        let fetcher = Arc::new(CannedFetcher::new(&[(
            "https://odd.example.com/photo/3",
            b"<html></html>".to_vec(),
        )]));
        let pages: Vec<Arc<dyn ContentPageStrategy>> = vec![Arc::new(ScriptLinkPage)];
        let err = ImageSourceResolver::new(fetcher.clone(), pages)
            .resolve(&QueryInput::ImageUrl("https://odd.example.com/photo/3".into()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "extraction");
        assert_eq!(fetcher.requested.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_data_uri_in_url_field() {
        use base64::Engine;
        let data = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png())
        );
        let fetcher = Arc::new(CannedFetcher::new(&[]));
        let r = resolver(fetcher.clone());
        let resolved = r.resolve(&QueryInput::ImageUrl(data)).await.unwrap();
        assert!(matches!(resolved, ResolvedQuery::Image(_)));
        assert!(fetcher.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bad_urls() {
        let r = resolver(Arc::new(CannedFetcher::new(&[])));
        let err = r.resolve(&QueryInput::ImageUrl("not a url".into())).await.unwrap_err();
        assert_eq!(err.kind(), "input_validation");
        let err = r
            .resolve(&QueryInput::ImageUrl("ftp://example.com/a.png".into()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "input_validation");
    }

    #[tokio::test]
    async fn test_non_image_body_is_decode_error() {
        let fetcher = Arc::new(CannedFetcher::new(&[(
            "https://img.example.com/page.html",
            b"<html></html>".to_vec(),
        )]));
        let err = resolver(fetcher)
            .resolve(&QueryInput::ImageUrl("https://img.example.com/page.html".into()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let err = resolver(Arc::new(CannedFetcher::new(&[])))
            .resolve(&QueryInput::ImageUrl("https://img.example.com/missing.png".into()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "fetch");
    }
}
