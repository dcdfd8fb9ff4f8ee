//! TMDB (The Movie Database) v3 client: title search and poster download.

use crate::{MetadataMatch, MetadataProvider, ProviderError};
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const DEFAULT_POSTER_SIZE: &str = "w342";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub image_base_url: String,
    pub poster_size: String,
    pub timeout: Duration,
}

impl TmdbConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            poster_size: DEFAULT_POSTER_SIZE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Clone)]
pub struct TmdbProvider {
    client: Client,
    cfg: Arc<TmdbConfig>,
}

impl TmdbProvider {
    pub fn new(cfg: TmdbConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        Ok(Self {
            client,
            cfg: Arc::new(cfg),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search/movie", self.cfg.base_url.trim_end_matches('/'))
    }

    fn poster_url(&self, poster_id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.cfg.image_base_url.trim_end_matches('/'),
            self.cfg.poster_size,
            poster_id.trim_start_matches('/')
        )
    }
}

// The URL carries the API key, so it is stripped from transport errors.
fn network_error(e: reqwest::Error) -> ProviderError {
    ProviderError::Network(e.without_url().to_string())
}

#[derive(Deserialize)]
struct SearchApiResponse {
    results: Option<Vec<SearchApiResult>>,
}

#[derive(Deserialize)]
struct SearchApiResult {
    title: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    poster_path: Option<String>,
}

fn first_match(body: &[u8]) -> Result<Option<MetadataMatch>, ProviderError> {
    let parsed: SearchApiResponse = serde_json::from_slice(body)
        .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
    let results = parsed
        .results
        .ok_or_else(|| ProviderError::InvalidResponse("missing results array".into()))?;
    let Some(first) = results.into_iter().next() else {
        return Ok(None);
    };
    let title = first
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ProviderError::InvalidResponse("first result has no title".into()))?;
    Ok(Some(MetadataMatch {
        title,
        overview: first.overview.unwrap_or_default(),
        release_date: first.release_date.filter(|d| !d.is_empty()),
        poster_path: first.poster_path.filter(|p| !p.is_empty()),
    }))
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search(&self, title: &str) -> Result<Option<MetadataMatch>, ProviderError> {
        if self.cfg.api_key.trim().is_empty() {
            return Err(ProviderError::Auth("TMDB API key is not configured".into()));
        }
        let url = self.search_url();
        debug!(query = title, "searching TMDB");
        let resp = self
            .client
            .get(&url)
            .query(&[("api_key", self.cfg.api_key.as_str()), ("query", title)])
            .send()
            .await
            .map_err(network_error)?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ProviderError::Auth("TMDB rejected the API key".into()));
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                url,
            });
        }
        let body = resp.bytes().await.map_err(network_error)?;
        let found = first_match(&body)?;
        debug!(query = title, found = found.is_some(), "TMDB search finished");
        Ok(found)
    }

    async fn fetch_poster(&self, poster_id: &str) -> Result<Bytes, ProviderError> {
        let url = self.poster_url(poster_id);
        debug!(%url, "downloading poster");
        let resp = self.client.get(&url).send().await.map_err(network_error)?;
        if !resp.status().is_success() {
            return Err(ProviderError::Status {
                status: resp.status().as_u16(),
                url,
            });
        }
        resp.bytes().await.map_err(network_error)
    }
}
