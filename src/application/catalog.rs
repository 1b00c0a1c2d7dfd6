use crate::domain::entities::catalog::{Catalog, CatalogStats};
use crate::domain::entities::catalog_item::ProductSummary;
use crate::domain::error::DomainError;
use crate::domain::ports::asset_store::{Asset, AssetStore};
use std::sync::Arc;

pub struct CatalogUseCase {
    catalog: Arc<Catalog>,
    assets: Arc<dyn AssetStore>,
    page_size: usize,
    asset_base_url: String,
}

impl CatalogUseCase {
    pub fn new(
        catalog: Arc<Catalog>,
        assets: Arc<dyn AssetStore>,
        page_size: usize,
        asset_base_url: String,
    ) -> Self {
        Self {
            catalog,
            assets,
            page_size,
            asset_base_url,
        }
    }

    /// First page of the catalog without embeddings. `limit` never exceeds
    /// the configured page size.
    pub fn products(&self, limit: Option<usize>) -> Vec<ProductSummary> {
        let limit = limit.unwrap_or(self.page_size).min(self.page_size);
        self.catalog
            .page(limit)
            .iter()
            .map(|item| ProductSummary::from_item(item, &self.asset_base_url))
            .collect()
    }

    pub fn stats(&self) -> CatalogStats {
        self.catalog.stats()
    }

    pub async fn asset(&self, name: &str) -> Result<Asset, DomainError> {
        self.assets.fetch(name).await
    }
}
