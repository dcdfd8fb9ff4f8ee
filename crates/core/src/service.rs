//! Library service: owns the in-memory library and runs the add-movie workflow.

use crate::error::LibraryError;
use crate::models::{self, MovieRecord};
use providers::MetadataProvider;
use std::path::PathBuf;
use std::sync::Arc;
use storage::{LibraryStore, PosterCache};
use tracing::{debug, info, warn};

pub struct LibraryService {
    store: Box<dyn LibraryStore>,
    provider: Arc<dyn MetadataProvider>,
    posters: PosterCache,
    library: Vec<MovieRecord>,
    skip_cached_posters: bool,
}

impl LibraryService {
    /// Loads the library once; later changes go through [`LibraryService::add_movie`].
    pub fn open(
        store: Box<dyn LibraryStore>,
        provider: Arc<dyn MetadataProvider>,
        posters: PosterCache,
    ) -> Result<Self, LibraryError> {
        let library = store.load()?;
        info!(movies = library.len(), "library opened");
        Ok(Self {
            store,
            provider,
            posters,
            library,
            skip_cached_posters: false,
        })
    }

    pub fn with_skip_cached_posters(mut self, skip: bool) -> Self {
        self.skip_cached_posters = skip;
        self
    }

    pub fn list_movies(&self) -> &[MovieRecord] {
        &self.library
    }

    pub fn get(&self, index: usize) -> Option<&MovieRecord> {
        self.library.get(index)
    }

    pub fn posters(&self) -> &PosterCache {
        &self.posters
    }

    pub fn poster_file(&self, record: &MovieRecord) -> Option<PathBuf> {
        record
            .poster_path
            .as_deref()
            .map(|rel| self.posters.resolve(rel))
    }

    /// Looks the title up, caches the poster, appends the record and saves.
    ///
    /// Nothing is appended unless every step succeeds; a poster written before
    /// a failed save stays behind in the cache.
    pub async fn add_movie(
        &mut self,
        file_path: &str,
        user_title: &str,
    ) -> Result<MovieRecord, LibraryError> {
        let title = user_title.trim();
        if title.is_empty() {
            return Err(LibraryError::EmptyTitle);
        }
        debug!(title, file = file_path, "searching metadata");

        let found = self
            .provider
            .search(title)
            .await?
            .ok_or_else(|| LibraryError::NotFound {
                title: title.to_string(),
            })?;

        let poster_path = match found.poster_path.as_deref() {
            Some(poster_id) => Some(self.cache_poster(poster_id).await?),
            None => None,
        };
        let record = models::record_from_match(&found, poster_path, file_path);

        if self.library.iter().any(|m| m.title == record.title) {
            warn!(title = %record.title, "title already in library, adding another entry");
        }

        let mut next = self.library.clone();
        next.push(record.clone());
        self.store.save(&next)?;
        self.library = next;

        info!(title = %record.title, year = %record.year, movies = self.library.len(), "movie added");
        Ok(record)
    }

    async fn cache_poster(&self, poster_id: &str) -> Result<String, LibraryError> {
        let relative = self.posters.relative_path(poster_id)?;
        if self.skip_cached_posters && self.posters.contains(poster_id) {
            debug!(poster = poster_id, "poster already cached");
            return Ok(relative);
        }
        let bytes = self.provider.fetch_poster(poster_id).await?;
        Ok(self.posters.store(poster_id, &bytes)?)
    }
}
