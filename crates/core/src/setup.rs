//! Wires configuration into a ready-to-use library service.

use crate::config::{AppConfig, API_KEY_ENV};
use crate::error::LibraryError;
use crate::service::LibraryService;
use anyhow::Context;
use providers::noop::NoopProvider;
use providers::tmdb::{TmdbConfig, TmdbProvider};
use providers::ProviderRegistry;
use std::sync::Arc;
use std::time::Duration;
use storage::{JsonLibraryStore, PosterCache};
use tracing::{debug, warn};

/// Registers every provider the configuration allows; TMDB only with an API key.
pub fn build_registry(config: &AppConfig) -> anyhow::Result<ProviderRegistry> {
    let mut reg = ProviderRegistry::new().with_provider("noop", Arc::new(NoopProvider));

    match config.api_key() {
        Some(key) => {
            let provider = TmdbProvider::new(TmdbConfig {
                api_key: key,
                base_url: config.metadata.base_url.clone(),
                image_base_url: config.metadata.image_base_url.clone(),
                poster_size: config.metadata.poster_size.clone(),
                timeout: Duration::from_secs(config.metadata.timeout_secs),
            })
            .context("building TMDB client")?;
            reg = reg.with_provider("tmdb", Arc::new(provider));
        }
        None if config.metadata.provider == "tmdb" => {
            return Err(LibraryError::Auth(format!(
                "no TMDB API key configured; set {API_KEY_ENV} (environment or .env) or metadata.api_key in config/local.toml"
            ))
            .into());
        }
        None => warn!("no TMDB API key configured, TMDB provider unavailable"),
    }

    Ok(reg.set_preferred(&config.metadata.provider))
}

/// Opens the library described by `config`, failing fast on a missing API key
/// or a corrupt library file.
pub fn open_library(config: &AppConfig) -> anyhow::Result<LibraryService> {
    let provider = build_registry(config)?.provider(None)?;
    let data_dir = config.data_dir();
    debug!(data_dir = %data_dir.display(), "opening library");
    let store = JsonLibraryStore::new(config.library_file());
    let posters = PosterCache::new(&data_dir, config.library.poster_dir.clone());
    let service = LibraryService::open(Box::new(store), provider, posters)
        .with_context(|| format!("loading {}", config.library_file().display()))?;
    Ok(service.with_skip_cached_posters(config.posters.skip_cached))
}

/// Opens the library for browsing only; no credentials needed and lookups find nothing.
pub fn open_library_offline(config: &AppConfig) -> anyhow::Result<LibraryService> {
    let store = JsonLibraryStore::new(config.library_file());
    let posters = PosterCache::new(config.data_dir(), config.library.poster_dir.clone());
    LibraryService::open(Box::new(store), Arc::new(NoopProvider), posters)
        .with_context(|| format!("loading {}", config.library_file().display()))
}
