use crate::{MovieRecord, StorageError};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Flat directory of poster images under the data directory.
///
/// Records store the path relative to `data_dir` so the library file stays
/// portable across machines.
#[derive(Debug, Clone)]
pub struct PosterCache {
    data_dir: PathBuf,
    dir_name: String,
}

impl PosterCache {
    pub fn new(data_dir: impl Into<PathBuf>, dir_name: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            dir_name: dir_name.into(),
        }
    }

    pub fn dir(&self) -> PathBuf {
        self.data_dir.join(&self.dir_name)
    }

    /// Relative path (`posters/abc.jpg`) for a provider poster identifier (`/abc.jpg`).
    pub fn relative_path(&self, poster_id: &str) -> Result<String, StorageError> {
        let name = file_name_for(poster_id)?;
        Ok(format!("{}/{}", self.dir_name, name))
    }

    pub fn contains(&self, poster_id: &str) -> bool {
        match file_name_for(poster_id) {
            Ok(name) => self.dir().join(name).is_file(),
            Err(_) => false,
        }
    }

    /// Writes the image and returns the relative path to record.
    pub fn store(&self, poster_id: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let name = file_name_for(poster_id)?;
        let dir = self.dir();
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(name), bytes)?;
        debug!(poster = name, size = bytes.len(), "poster cached");
        self.relative_path(poster_id)
    }

    /// Absolute location of a relative path stored in a record.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.data_dir.join(relative)
    }

    /// Cached files that no record points at.
    pub fn orphans(&self, library: &[MovieRecord]) -> Result<Vec<PathBuf>, StorageError> {
        let referenced: HashSet<OsString> = library
            .iter()
            .filter_map(|m| m.poster_path.as_deref())
            .filter_map(|p| Path::new(p).file_name().map(|n| n.to_os_string()))
            .collect();

        let entries = match fs::read_dir(self.dir()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut orphans = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() && !referenced.contains(&entry.file_name()) {
                orphans.push(entry.path());
            }
        }
        orphans.sort();
        Ok(orphans)
    }

    pub fn remove_orphans(&self, library: &[MovieRecord]) -> Result<Vec<PathBuf>, StorageError> {
        let orphans = self.orphans(library)?;
        for path in &orphans {
            fs::remove_file(path)?;
            info!(path = %path.display(), "removed orphaned poster");
        }
        Ok(orphans)
    }
}

fn file_name_for(poster_id: &str) -> Result<&str, StorageError> {
    let name = poster_id.trim_start_matches(['/', '\\']);
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(StorageError::InvalidPosterId(poster_id.to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_poster(poster: Option<&str>) -> MovieRecord {
        MovieRecord {
            title: "Heat".into(),
            overview: String::new(),
            year: "1995".into(),
            poster_path: poster.map(str::to_string),
            file_path: "/movies/heat.mkv".into(),
        }
    }

    #[test]
    fn relative_path_strips_leading_separator() {
        let cache = PosterCache::new("/data", "posters");
        assert_eq!(cache.relative_path("/abc123.jpg").unwrap(), "posters/abc123.jpg");
        assert_eq!(cache.relative_path("abc123.jpg").unwrap(), "posters/abc123.jpg");
    }

    #[test]
    fn rejects_identifiers_escaping_the_cache() {
        let cache = PosterCache::new("/data", "posters");
        for bad in ["", "/", "/..", "/a/b.jpg", "..\\x.jpg", "/nested\\x.jpg"] {
            assert!(
                matches!(cache.relative_path(bad), Err(StorageError::InvalidPosterId(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn store_writes_bytes_and_resolves() {
        let temp = tempfile::tempdir().unwrap();
        let cache = PosterCache::new(temp.path(), "posters");
        assert!(!cache.contains("/p.jpg"));

        let rel = cache.store("/p.jpg", b"image").unwrap();
        assert_eq!(rel, "posters/p.jpg");
        assert!(cache.contains("/p.jpg"));
        assert_eq!(fs::read(cache.resolve(&rel)).unwrap(), b"image");

        // Storing again overwrites in place.
        cache.store("/p.jpg", b"newer").unwrap();
        assert_eq!(fs::read(cache.resolve(&rel)).unwrap(), b"newer");
    }

    #[test]
    fn orphans_lists_unreferenced_files() {
        let temp = tempfile::tempdir().unwrap();
        let cache = PosterCache::new(temp.path(), "posters");
        assert!(cache.orphans(&[]).unwrap().is_empty());

        cache.store("/kept.jpg", b"1").unwrap();
        cache.store("/stale.jpg", b"2").unwrap();
        let library = vec![with_poster(Some("posters/kept.jpg")), with_poster(None)];

        let orphans = cache.orphans(&library).unwrap();
        assert_eq!(orphans, vec![cache.dir().join("stale.jpg")]);

        cache.remove_orphans(&library).unwrap();
        assert!(cache.contains("/kept.jpg"));
        assert!(!cache.contains("/stale.jpg"));
    }
}
