use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub library: LibraryConfig,
    pub metadata: MetadataConfig,
    pub posters: PosterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Defaults to the platform data directory.
    pub data_dir: Option<String>,
    pub file_name: String,
    pub poster_dir: String,
    pub video_globs: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            file_name: "watchyo_library.json".to_string(),
            poster_dir: "posters".to_string(),
            video_globs: vec!["*.mp4".into(), "*.mkv".into(), "*.avi".into()],
            exclude: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    pub provider: String,
    pub base_url: String,
    pub image_base_url: String,
    pub poster_size: String,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            provider: "tmdb".to_string(),
            base_url: providers::tmdb::DEFAULT_BASE_URL.to_string(),
            image_base_url: providers::tmdb::DEFAULT_IMAGE_BASE_URL.to_string(),
            poster_size: providers::tmdb::DEFAULT_POSTER_SIZE.to_string(),
            timeout_secs: providers::tmdb::DEFAULT_TIMEOUT.as_secs(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PosterConfig {
    /// Reuse a cached poster instead of downloading it again.
    pub skip_cached: bool,
}

impl AppConfig {
    pub fn data_dir(&self) -> PathBuf {
        match self.library.data_dir.as_deref() {
            Some(dir) => expand_home(dir),
            None => dirs::data_dir()
                .map(|d| d.join("watchyo"))
                .unwrap_or_else(|| PathBuf::from(".watchyo")),
        }
    }

    pub fn library_file(&self) -> PathBuf {
        self.data_dir().join(&self.library.file_name)
    }

    /// Configured key, falling back to `TMDB_API_KEY`.
    pub fn api_key(&self) -> Option<String> {
        self.metadata
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

fn expand_home(dir: &str) -> PathBuf {
    if let Some(rest) = dir.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(dir)
}

/// Layers: defaults, `config/default` (or the given file), `config/local`, then
/// `WATCHYO__SECTION__KEY` environment variables.
pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings
        .add_source(config::File::with_name("config/local").required(false))
        .add_source(config::Environment::with_prefix("WATCHYO").separator("__"));
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
