//! Document store - Crash-safe replacement of persisted files
//!
//! Every write goes to its own staging file in the same directory and is
//! renamed over the target, so a reader always sees either the old or the new
//! content. Replacing the token document additionally writes the current valid
//! document to the backup slot first.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, warn};

use crate::core::paths::DataLayout;
use crate::error::SyncError;
use crate::store::Corpus;

/// Ensure the data directory exists
pub fn ensure_data_dir(layout: &DataLayout) -> io::Result<PathBuf> {
    let root = layout.root();
    if !root.exists() {
        fs::create_dir_all(root)?;
    }
    Ok(root.to_path_buf())
}

/// Fresh staging file next to `target`, unique per writer
/// (`.<name>.<random>.tmp`)
pub fn staging_file(target: &Path) -> io::Result<NamedTempFile> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "staging".to_string());
    Builder::new()
        .prefix(&format!(".{}.", name))
        .suffix(".tmp")
        .tempfile_in(dir)
}

/// Write `bytes` to a private staging file, flush it to disk, then rename it
/// over `target`
///
/// Concurrent writers never share a staging file, so the last rename wins and
/// `target` always holds one complete write. A failed write removes its
/// staging file when it is dropped.
pub fn write_atomic(target: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut staging = staging_file(target)?;
    staging.write_all(bytes)?;
    staging.as_file().sync_all()?;
    staging.persist(target)?;
    Ok(())
}

/// Current document bytes, `None` when there is no document yet
pub fn read_document(layout: &DataLayout) -> io::Result<Option<Vec<u8>>> {
    match fs::read(layout.document()) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Install a new token document
///
/// The new bytes must parse before anything on disk changes. A valid current
/// document is copied to the backup slot before the rename; an invalid one is
/// left out so the backup keeps the last good copy.
pub fn replace_document(layout: &DataLayout, bytes: &[u8]) -> Result<Corpus, SyncError> {
    let corpus = Corpus::parse(bytes)?;
    ensure_data_dir(layout)?;

    let document = layout.document();
    if let Some(current) = read_document(layout)? {
        match Corpus::parse(&current) {
            Ok(_) => {
                write_atomic(&layout.backup(), &current)?;
                debug!(backup = ?layout.backup(), "backed up previous token document");
            }
            Err(err) => warn!(error = %err, "current token document is invalid; keeping existing backup"),
        }
    }

    write_atomic(&document, bytes)?;
    Ok(corpus)
}
