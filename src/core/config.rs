//! Runtime configuration assembled once from the command line and environment

use std::path::PathBuf;
use std::time::Duration;

use crate::core::paths::DataLayout;

/// Default staleness window
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(60 * 60);
/// Default similarity threshold for loose matches
pub const DEFAULT_THRESHOLD: f64 = 0.2;
/// Default cap on returned results
pub const DEFAULT_MAX_RESULTS: usize = 20;
/// Version checks should answer quickly
pub const VERSION_TIMEOUT: Duration = Duration::from_secs(5);
/// Full document downloads get more room
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);
/// Edge length of generated icons, in pixels
pub const DEFAULT_ICON_SIZE: u32 = 64;
/// Shared icon for tokens that are not colors
pub const MONO_ICON_FILE: &str = "icon-mono.png";

/// Remote endpoints for the token source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub version_url: String,
    pub document_url: String,
    pub version_timeout: Duration,
    pub download_timeout: Duration,
}

impl RemoteConfig {
    pub fn new(version_url: impl Into<String>, document_url: impl Into<String>) -> Self {
        Self {
            version_url: version_url.into(),
            document_url: document_url.into(),
            version_timeout: VERSION_TIMEOUT,
            download_timeout: DOWNLOAD_TIMEOUT,
        }
    }
}

/// Search tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub threshold: f64,
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Full runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    /// `None` disables sync entirely
    pub remote: Option<RemoteConfig>,
    pub stale_after: Duration,
    pub search: SearchConfig,
    pub icon_size: u32,
    pub mono_icon: String,
}

impl Config {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            remote: None,
            stale_after: DEFAULT_STALE_AFTER,
            search: SearchConfig::default(),
            icon_size: DEFAULT_ICON_SIZE,
            mono_icon: MONO_ICON_FILE.to_string(),
        }
    }

    /// Attach remote endpoints; both must be present for sync to run
    pub fn with_remote(mut self, version_url: Option<String>, document_url: Option<String>) -> Self {
        self.remote = match (version_url, document_url) {
            (Some(version), Some(document)) if !version.is_empty() && !document.is_empty() => {
                Some(RemoteConfig::new(version, document))
            }
            _ => None,
        };
        self
    }

    pub fn layout(&self) -> DataLayout {
        DataLayout::new(&self.data_dir)
    }
}
