//! Metadata provider abstractions: movie search and poster download.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub mod noop;
pub mod tmdb;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("not implemented")]
    NotImplemented,
    #[error("request failed: {0}")]
    Network(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

/// Best search hit as reported by the provider, already validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataMatch {
    pub title: String,
    pub overview: String,
    pub release_date: Option<String>,
    /// Provider poster identifier, e.g. `/abc123.jpg`.
    pub poster_path: Option<String>,
}

#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// First result for a free-text title query, or `None` when nothing matches.
    async fn search(&self, title: &str) -> Result<Option<MetadataMatch>, ProviderError>;

    async fn fetch_poster(&self, poster_id: &str) -> Result<Bytes, ProviderError>;
}

#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn MetadataProvider>>,
    pub preferred: Option<String>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, name: &str, provider: Arc<dyn MetadataProvider>) -> Self {
        self.providers.insert(name.to_string(), provider);
        self
    }

    pub fn set_preferred(mut self, name: &str) -> Self {
        self.preferred = Some(name.to_string());
        self
    }

    pub fn provider(&self, name: Option<&str>) -> Result<Arc<dyn MetadataProvider>, ProviderError> {
        let key = name
            .map(str::to_string)
            .or_else(|| self.preferred.clone())
            .ok_or_else(|| {
                ProviderError::UnknownProvider("no metadata provider configured".into())
            })?;
        self.providers
            .get(&key)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownProvider(key))
    }
}
