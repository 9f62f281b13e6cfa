//! Sync metadata persisted beside the token document
//!
//! Two small text files: `last_checked` (seconds since the epoch) and
//! `version` (short version tag of the document on disk). Missing or garbled
//! files read as "never checked" / "no tag".

use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use crate::cache::store::write_atomic;
use crate::core::paths::DataLayout;

/// Future `last_checked` values within this many seconds are clock skew
pub const CLOCK_SKEW_SECS: i64 = 60;

/// Persisted sync bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncState {
    /// Last successful check (seconds since epoch)
    pub last_checked_at: Option<i64>,

    /// Tag of the document currently on disk
    pub version_tag: Option<String>,
}

impl SyncState {
    pub fn read(layout: &DataLayout) -> Self {
        Self {
            last_checked_at: read_trimmed(&layout.last_checked()).and_then(|s| s.parse().ok()),
            version_tag: read_trimmed(&layout.version()),
        }
    }

    /// Checked within `window` of `now`; a timestamp slightly ahead of `now`
    /// still counts, one further ahead does not
    pub fn is_fresh(&self, now: i64, window: Duration) -> bool {
        match self.last_checked_at {
            Some(checked) => {
                let elapsed = now.saturating_sub(checked);
                elapsed > -CLOCK_SKEW_SECS && elapsed.unsigned_abs() < window.as_secs()
            }
            None => false,
        }
    }

    /// Record a successful check at `now`
    ///
    /// The stored time never moves backwards, except that a value more than
    /// `CLOCK_SKEW_SECS` ahead of `now` is replaced, so a clock that jumped
    /// back does not keep every later run stale.
    pub fn record_check(layout: &DataLayout, now: i64) -> io::Result<i64> {
        let checked = match Self::read(layout).last_checked_at {
            Some(previous) if previous.saturating_sub(now) <= CLOCK_SKEW_SECS => previous.max(now),
            _ => now,
        };
        write_atomic(&layout.last_checked(), checked.to_string().as_bytes())?;
        Ok(checked)
    }

    pub fn write_version_tag(layout: &DataLayout, tag: &str) -> io::Result<()> {
        write_atomic(&layout.version(), tag.as_bytes())
    }
}

fn read_trimmed(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let trimmed = content.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
