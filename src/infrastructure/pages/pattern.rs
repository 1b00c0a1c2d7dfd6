use crate::domain::error::DomainError;
use crate::domain::ports::content_page::ContentPageStrategy;
use regex::Regex;
use reqwest::Url;

/// Unsplash photo pages embed the image from the `images.unsplash.com` CDN.
const UNSPLASH_HOST: &str = "unsplash.com";
const UNSPLASH_PAGE_PREFIX: &str = "/photos/";
const UNSPLASH_ASSET_PATTERN: &str = r#"https://images\.unsplash\.com/[^"'\s<>]+"#;

/// Content-page strategy driven by a host, a path prefix and an asset regex.
///
/// A URL is handled when its host equals `host` (or is a subdomain of it) and
/// its path starts with `path_prefix`. Extraction returns the first match of
/// `asset_pattern` in the page body.
pub struct PatternPageStrategy {
    name: String,
    host: String,
    path_prefix: String,
    asset_pattern: Regex,
}

impl PatternPageStrategy {
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        path_prefix: impl Into<String>,
        asset_pattern: &str,
    ) -> Result<Self, DomainError> {
        let asset_pattern = Regex::new(asset_pattern)
            .map_err(|e| DomainError::Config(format!("invalid asset pattern: {e}")))?;
        Ok(Self {
            name: name.into(),
            host: host.into().to_ascii_lowercase(),
            path_prefix: path_prefix.into(),
            asset_pattern,
        })
    }

    pub fn unsplash() -> Result<Self, DomainError> {
        Self::new("unsplash", UNSPLASH_HOST, UNSPLASH_PAGE_PREFIX, UNSPLASH_ASSET_PATTERN)
    }

    fn host_matches(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        host == self.host || host.ends_with(&format!(".{}", self.host))
    }
}

impl ContentPageStrategy for PatternPageStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_handle(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        match parsed.host_str() {
            Some(host) => self.host_matches(host) && parsed.path().starts_with(&self.path_prefix),
            None => false,
        }
    }

    fn extract(&self, html: &str) -> Option<String> {
        self.asset_pattern
            .find(html)
            .map(|m| m.as_str().replace("&amp;", "&"))
    }
}
