use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Service configuration.
///
/// Loaded from an optional config file, then `MATCHER_*` environment
/// variables (nested keys use `__`, e.g. `MATCHER_EMBEDDING__URL`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// JSON catalog snapshot read once at startup.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Directory served under `/images`.
    #[serde(default = "default_asset_dir")]
    pub asset_dir: PathBuf,

    /// Prefix joined onto relative asset references in responses. Use an
    /// absolute URL when clients live on another host.
    #[serde(default = "default_asset_base_url")]
    pub asset_base_url: String,

    /// Maximum number of results per match.
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,

    /// Number of items returned by `/products`.
    #[serde(default = "default_products_page_size")]
    pub products_page_size: usize,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Largest remote image or page accepted, in MB.
    #[serde(default = "default_max_fetch_mb")]
    pub max_fetch_mb: usize,

    /// Overall deadline for one HTTP request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Request body limit in MB; inline images are sent in the body.
    #[serde(default = "default_max_body_mb")]
    pub max_body_mb: usize,

    /// Follow Unsplash photo pages to their CDN image.
    #[serde(default = "default_true")]
    pub enable_unsplash: bool,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_json: bool,

    #[serde(default)]
    pub embedding: EmbeddingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingSettings {
    /// `http` or `noop`.
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_embedding_url")]
    pub url: String,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_dimension")]
    pub dimension: usize,

    #[serde(default = "default_embedding_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            url: default_embedding_url(),
            model: None,
            api_key: None,
            dimension: default_dimension(),
            timeout_secs: default_embedding_timeout_secs(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            catalog_path: default_catalog_path(),
            asset_dir: default_asset_dir(),
            asset_base_url: default_asset_base_url(),
            result_limit: default_result_limit(),
            products_page_size: default_products_page_size(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            max_fetch_mb: default_max_fetch_mb(),
            request_timeout_secs: default_request_timeout_secs(),
            max_body_mb: default_max_body_mb(),
            enable_unsplash: default_true(),
            log_level: default_log_level(),
            log_json: false,
            embedding: EmbeddingSettings::default(),
        }
    }
}

impl Settings {
    /// Load from `file` (or `visual-matcher.*` in the working directory when
    /// absent) and the environment, then validate.
    pub fn load(file: Option<&Path>) -> Result<Self, DomainError> {
        let file_source = match file {
            Some(path) => ::config::File::from(path.to_path_buf()).required(true),
            None => ::config::File::with_name("visual-matcher").required(false),
        };

        let settings: Settings = ::config::Config::builder()
            .add_source(file_source)
            .add_source(
                ::config::Environment::with_prefix("MATCHER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| DomainError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.result_limit == 0 {
            return Err(DomainError::Config("result_limit must be greater than 0".into()));
        }
        if self.products_page_size == 0 {
            return Err(DomainError::Config(
                "products_page_size must be greater than 0".into(),
            ));
        }
        match self.embedding.provider.as_str() {
            "http" if self.embedding.url.trim().is_empty() => Err(DomainError::Config(
                "embedding.url is required for the http provider".into(),
            )),
            "http" | "noop" => Ok(()),
            other => Err(DomainError::Config(format!(
                "unknown embedding provider: {other}"
            ))),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, DomainError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|e| DomainError::Config(format!("Invalid address: {e}")))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn max_fetch_bytes(&self) -> usize {
        self.max_fetch_mb * 1024 * 1024
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("products.json")
}

fn default_asset_dir() -> PathBuf {
    PathBuf::from("assets/product")
}

fn default_asset_base_url() -> String {
    "/images".to_string()
}

fn default_result_limit() -> usize {
    20
}

fn default_products_page_size() -> usize {
    50
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_max_fetch_mb() -> usize {
    20
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_body_mb() -> usize {
    20
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_provider() -> String {
    "http".to_string()
}

fn default_embedding_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_dimension() -> usize {
    512
}

fn default_embedding_timeout_secs() -> u64 {
    30
}
