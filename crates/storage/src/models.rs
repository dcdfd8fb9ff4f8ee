use serde::{Deserialize, Serialize};

/// One catalogued movie. Field order is the on-disk key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    pub overview: String,
    pub year: String,
    /// Relative to the data directory, e.g. `posters/abc.jpg`.
    pub poster_path: Option<String>,
    pub file_path: String,
}
