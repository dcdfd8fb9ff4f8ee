use chrono::{Datelike, NaiveDate};
use providers::MetadataMatch;
use std::path::Path;

pub use storage::MovieRecord;

/// Year recorded when the provider has no usable release date.
pub const UNKNOWN_YEAR: &str = "unknown";

pub fn year_from_release_date(release_date: Option<&str>) -> String {
    let Some(date) = release_date.map(str::trim).filter(|d| !d.is_empty()) else {
        return UNKNOWN_YEAR.to_string();
    };
    if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return format!("{:04}", parsed.year());
    }
    // Partial dates such as "2010" or "2010-07".
    match date.get(..4) {
        Some(prefix) if prefix.chars().all(|c| c.is_ascii_digit()) => prefix.to_string(),
        _ => UNKNOWN_YEAR.to_string(),
    }
}

/// Default title offered for a video file: its name without the last extension.
pub fn suggested_title(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|s| s.to_string_lossy().trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn record_from_match(
    found: &MetadataMatch,
    poster_path: Option<String>,
    file_path: &str,
) -> MovieRecord {
    MovieRecord {
        title: found.title.clone(),
        overview: found.overview.clone(),
        year: year_from_release_date(found.release_date.as_deref()),
        poster_path,
        file_path: file_path.to_string(),
    }
}
