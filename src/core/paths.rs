//! Data directory layout
//!
//! Every persisted artifact lives directly under one data directory so a
//! single rename can swap a document into place.

use std::path::{Path, PathBuf};

/// Token document file name
pub const DOCUMENT_FILE: &str = "tokens.json";
/// Backup of the previously installed document
pub const BACKUP_FILE: &str = "tokens.json.bak";
/// Last successful check, integer seconds since the Unix epoch
pub const LAST_CHECKED_FILE: &str = "last_checked";
/// Short version tag of the document on disk
pub const VERSION_FILE: &str = "version";
/// Pre-rendered icon directory
pub const IMAGES_DIR: &str = "images";

/// Resolved locations of all persisted files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn document(&self) -> PathBuf {
        self.root.join(DOCUMENT_FILE)
    }

    pub fn backup(&self) -> PathBuf {
        self.root.join(BACKUP_FILE)
    }

    pub fn last_checked(&self) -> PathBuf {
        self.root.join(LAST_CHECKED_FILE)
    }

    pub fn version(&self) -> PathBuf {
        self.root.join(VERSION_FILE)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }
}

/// Default data directory: `<platform data dir>/tokensift`, or `.` when the
/// platform has none
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("tokensift"))
        .unwrap_or_else(|| PathBuf::from("."))
}
