//! Shared test helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use base64::Engine;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use visual_matcher::domain::entities::catalog::Catalog;
use visual_matcher::domain::entities::catalog_item::CatalogItem;
use visual_matcher::domain::error::DomainError;
use visual_matcher::domain::ports::content_page::ContentPageStrategy;
use visual_matcher::domain::ports::embedding_port::EmbeddingProvider;
use visual_matcher::domain::values::canonical_image::CanonicalImage;
use visual_matcher::domain::values::embedding::EmbeddingVector;
use visual_matcher::infrastructure::catalog::fs_assets::FsAssetStore;
use visual_matcher::infrastructure::fetch::reqwest_fetcher::ReqwestFetcher;
use visual_matcher::{MatcherOptions, VisualMatcher};

/// Deterministic two-dimensional "model": an image embeds as its mean red and
/// green channels, and a few fixed phrases embed to fixed directions.
#[derive(Default)]
pub struct MeanColorProvider {
    pub calls: AtomicUsize,
}

impl MeanColorProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for MeanColorProvider {
    async fn embed_image(&self, image: &CanonicalImage) -> Result<EmbeddingVector, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let pixels = image.pixels();
        let n = (pixels.width() * pixels.height()) as f32;
        let (mut r, mut g) = (0.0f32, 0.0f32);
        for p in pixels.pixels() {
            r += p[0] as f32;
            g += p[1] as f32;
        }
        Ok(EmbeddingVector::new(vec![r / n, g / n]))
    }

    async fn embed_text(&self, text: &str) -> Result<EmbeddingVector, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let v = match text {
            "red" => vec![1.0, 0.0],
            "green" => vec![0.0, 1.0],
            _ => vec![0.7, 0.7],
        };
        Ok(EmbeddingVector::new(v))
    }

    fn dimension(&self) -> usize {
        2
    }

    fn descriptor(&self) -> &str {
        "mean-color"
    }
}

pub fn item(id: u64, name: &str, embedding: Option<Vec<f32>>) -> CatalogItem {
    CatalogItem::new(
        id.into(),
        name.to_string(),
        "Furniture".to_string(),
        format!("{name} description"),
        format!("{name}.jpg"),
        embedding.map(EmbeddingVector::new),
    )
}

/// p1=[1,0], p2=[0,1], p3=[0.7,0.7] and p4 without an embedding.
pub fn reference_catalog() -> Arc<Catalog> {
    Arc::new(
        Catalog::new(
            vec![
                item(1, "p1", Some(vec![1.0, 0.0])),
                item(2, "p2", Some(vec![0.0, 1.0])),
                item(3, "p3", Some(vec![0.7, 0.7])),
                item(4, "p4", None),
            ],
            "test",
        )
        .unwrap(),
    )
}

pub fn png_bytes(rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb(rgb));
    CanonicalImage::from_rgb(img).to_png().unwrap()
}

pub fn data_uri(bytes: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

pub fn options() -> MatcherOptions {
    MatcherOptions {
        result_limit: 20,
        products_page_size: 50,
        asset_base_url: "/images".to_string(),
    }
}

pub fn setup_with(
    catalog: Arc<Catalog>,
    embedder: Arc<dyn EmbeddingProvider>,
    pages: Vec<Arc<dyn ContentPageStrategy>>,
    asset_dir: &std::path::Path,
) -> VisualMatcher {
    VisualMatcher::with_providers(
        catalog,
        embedder,
        Arc::new(ReqwestFetcher::default()),
        pages,
        Arc::new(FsAssetStore::new(asset_dir)),
        options(),
    )
}

pub fn setup(catalog: Arc<Catalog>, embedder: Arc<MeanColorProvider>) -> VisualMatcher {
    setup_with(
        catalog,
        embedder,
        Vec::new(),
        std::path::Path::new("does-not-exist"),
    )
}
