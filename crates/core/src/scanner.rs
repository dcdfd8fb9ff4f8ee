//! Walks directories for video files that are not yet in the library.

use crate::models::{self, MovieRecord};
use anyhow::Context;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub path: PathBuf,
    pub suggested_title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct VideoMatcher {
    videos: GlobSet,
    excludes: GlobSet,
}

impl VideoMatcher {
    pub fn new(video_globs: &[String], excludes: &[String]) -> anyhow::Result<Self> {
        Ok(Self {
            videos: build_globset(video_globs)?,
            excludes: build_globset(excludes)?,
        })
    }

    pub fn is_video(&self, path: &Path) -> bool {
        let name_matches = path
            .file_name()
            .map(|n| self.videos.is_match(n))
            .unwrap_or(false);
        name_matches && !is_excluded(path, &self.excludes)
    }
}

/// Found paths are absolute and symlink-free, the same form `add` records.
pub async fn scan(roots: &[PathBuf], matcher: &VideoMatcher) -> anyhow::Result<Vec<PathBuf>> {
    let roots = roots
        .iter()
        .map(|r| {
            r.canonicalize()
                .with_context(|| format!("cannot scan {}", r.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let (tx, mut rx) = mpsc::channel(100);
    let matcher = matcher.clone();

    let walker_handle = task::spawn_blocking(move || {
        for root in roots {
            for entry in WalkDir::new(root)
                .follow_links(true)
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || should_descend(e.path(), &matcher.excludes))
            {
                let entry = match entry {
                    Ok(e) => e,
                    Err(_) => continue,
                };
                let path = entry.path();
                if !entry.file_type().is_file() || !matcher.is_video(path) {
                    continue;
                }
                if tx.blocking_send(path.to_path_buf()).is_err() {
                    // Receiver dropped, stop walking.
                    break;
                }
            }
        }
    });

    let mut found = Vec::new();
    while let Some(path) = rx.recv().await {
        found.push(path);
    }
    walker_handle.await?;
    found.sort();
    debug!(count = found.len(), "video files found");
    Ok(found)
}

/// Found files whose path is not recorded yet.
pub fn uncatalogued(found: Vec<PathBuf>, library: &[MovieRecord]) -> Vec<Candidate> {
    let known: HashSet<&Path> = library.iter().map(|m| Path::new(&m.file_path)).collect();
    found
        .into_iter()
        .filter(|p| !known.contains(p.as_path()))
        .map(|path| Candidate {
            suggested_title: models::suggested_title(&path),
            path,
        })
        .collect()
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = GlobBuilder::new(pat).case_insensitive(true).build()?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

fn should_descend(path: &Path, excludes: &GlobSet) -> bool {
    !is_excluded(path, excludes) && !is_hidden(path)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|s| s.starts_with('.') && s.len() > 1 && s != "..")
        .unwrap_or(false)
}

fn is_excluded(path: &Path, excludes: &GlobSet) -> bool {
    excludes.is_match(path)
}
