use crate::domain::error::DomainError;
use crate::domain::ports::asset_store::{Asset, AssetStore};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Serves catalog assets from a single directory.
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

}

/// Relative path for `name` if it stays inside the store, `None` otherwise.
///
/// Only plain path segments are allowed: no `..`, no `.`, no root or drive
/// prefix, no backslashes and no NUL bytes.
pub fn sanitize_asset_name(name: &str) -> Option<PathBuf> {
    if name.is_empty() || name.contains('\\') || name.contains('\0') {
        return None;
    }
    let path = Path::new(name);
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir
            | Component::ParentDir
            | Component::RootDir
            | Component::Prefix(_) => return None,
        }
    }
    if clean.as_os_str().is_empty() {
        None
    } else {
        Some(clean)
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn fetch(&self, name: &str) -> Result<Asset, DomainError> {
        let relative = sanitize_asset_name(name)
            .ok_or_else(|| DomainError::NotFound(format!("Image not found: {name}")))?;
        let path = self.root.join(&relative);

        let not_found = || DomainError::NotFound(format!("Image not found: {name}"));
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(DomainError::Internal(format!("asset {name}: {e}"))),
        };
        if !metadata.is_file() {
            return Err(not_found());
        }

        let bytes = match tokio::fs::read(&path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(DomainError::Internal(format!("asset {name}: {e}"))),
        };

        Ok(Asset {
            content_type: mime_guess::from_path(&relative)
                .first_or_octet_stream()
                .to_string(),
            bytes,
        })
    }
}
