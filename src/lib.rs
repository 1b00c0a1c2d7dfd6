pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod server;
pub mod settings;
pub mod telemetry;

use crate::application::catalog::CatalogUseCase;
use crate::application::match_products::{MatchQuery, MatchUseCase};
use crate::application::rank::SimilarityRanker;
use crate::application::resolve::ImageSourceResolver;
use crate::domain::entities::catalog::{Catalog, CatalogStats};
use crate::domain::entities::catalog_item::ProductSummary;
use crate::domain::entities::match_result::MatchResult;
use crate::domain::error::DomainError;
use crate::domain::ports::asset_store::{Asset, AssetStore};
use crate::domain::ports::content_page::ContentPageStrategy;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::http_fetcher::HttpFetcher;
use crate::infrastructure::catalog::fs_assets::FsAssetStore;
use crate::infrastructure::catalog::json_snapshot::load_catalog;
use crate::infrastructure::embeddings::http::HttpEmbeddingProvider;
use crate::infrastructure::embeddings::noop::NoopProvider;
use crate::infrastructure::fetch::reqwest_fetcher::ReqwestFetcher;
use crate::infrastructure::pages::pattern::PatternPageStrategy;
use crate::settings::Settings;
use std::sync::Arc;
use std::time::Duration;

/// Knobs shared by the use cases, independent of where adapters come from.
#[derive(Debug, Clone)]
pub struct MatcherOptions {
    pub result_limit: usize,
    pub products_page_size: usize,
    pub asset_base_url: String,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        let s = Settings::default();
        Self::from(&s)
    }
}

impl From<&Settings> for MatcherOptions {
    fn from(s: &Settings) -> Self {
        Self {
            result_limit: s.result_limit,
            products_page_size: s.products_page_size,
            asset_base_url: s.asset_base_url.clone(),
        }
    }
}

pub struct VisualMatcher {
    match_uc: MatchUseCase,
    catalog_uc: CatalogUseCase,
    catalog: Arc<Catalog>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl VisualMatcher {
    /// Wire the production adapters described by `settings`.
    pub fn new(settings: &Settings) -> Result<Self, DomainError> {
        settings.validate()?;

        let catalog = Arc::new(load_catalog(&settings.catalog_path)?);

        let embedder: Arc<dyn EmbeddingProvider> = match settings.embedding.provider.as_str() {
            "noop" => Arc::new(NoopProvider),
            _ => Arc::new(HttpEmbeddingProvider::new(
                settings.embedding.url.clone(),
                settings.embedding.model.clone(),
                settings.embedding.api_key.clone(),
                settings.embedding.dimension,
                Duration::from_secs(settings.embedding.timeout_secs),
            )),
        };

        let fetcher: Arc<dyn HttpFetcher> = Arc::new(ReqwestFetcher::new(
            settings.fetch_timeout(),
            settings.max_fetch_bytes(),
        ));

        let mut pages: Vec<Arc<dyn ContentPageStrategy>> = Vec::new();
        if settings.enable_unsplash {
            pages.push(Arc::new(PatternPageStrategy::unsplash()?));
        }

        let assets: Arc<dyn AssetStore> = Arc::new(FsAssetStore::new(settings.asset_dir.clone()));

        Ok(Self::with_providers(
            catalog,
            embedder,
            fetcher,
            pages,
            assets,
            MatcherOptions::from(settings),
        ))
    }

    pub fn with_providers(
        catalog: Arc<Catalog>,
        embedder: Arc<dyn EmbeddingProvider>,
        fetcher: Arc<dyn HttpFetcher>,
        pages: Vec<Arc<dyn ContentPageStrategy>>,
        assets: Arc<dyn AssetStore>,
        options: MatcherOptions,
    ) -> Self {
        let provider_dim = embedder.dimension();
        if provider_dim > 0 {
            if let Some(catalog_dim) = catalog.dimension() {
                if catalog_dim != provider_dim {
                    tracing::warn!(
                        catalog_dim,
                        provider_dim,
                        "catalog embeddings and provider disagree on dimension; re-embed the catalog"
                    );
                }
            }
        }

        let resolver = Arc::new(ImageSourceResolver::new(fetcher, pages));

        Self {
            match_uc: MatchUseCase::new(
                catalog.clone(),
                resolver,
                embedder.clone(),
                SimilarityRanker::new(options.result_limit),
                options.asset_base_url.clone(),
            ),
            catalog_uc: CatalogUseCase::new(
                catalog.clone(),
                assets,
                options.products_page_size,
                options.asset_base_url,
            ),
            catalog,
            embedder,
        }
    }

    // Delegating methods
    pub async fn match_query(&self, query: MatchQuery) -> Result<Vec<MatchResult>, DomainError> {
        self.match_uc.execute(query).await
    }

    pub fn products(&self, limit: Option<usize>) -> Vec<ProductSummary> {
        self.catalog_uc.products(limit)
    }

    pub fn stats(&self) -> CatalogStats {
        self.catalog_uc.stats()
    }

    pub async fn asset(&self, name: &str) -> Result<Asset, DomainError> {
        self.catalog_uc.asset(name).await
    }

    pub fn model_descriptor(&self) -> &str {
        self.embedder.descriptor()
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }
}
