//! Sync manager - Decides when to refetch the token document
//!
//! Phases:
//!
//! ```text
//! Fresh --window elapses--> Stale --sync--> Checking
//! Checking --same identifier--> Fresh            (only last_checked changes)
//! Checking --new identifier or forced--> Updating --installed--> Fresh
//! Checking | Updating --error--> Failed          (nothing further written)
//! ```
//!
//! A forced sync skips both the freshness short-circuit and the identifier
//! comparison. At most one attempt runs per manager; a concurrent caller gets
//! `SyncOutcome::InFlight` without touching the network.

use anyhow::{Context, Result};
use chrono::DateTime;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cache::meta::SyncState;
use crate::cache::store::{read_document, replace_document};
use crate::core::config::Config;
use crate::core::model::{Item, ResultSet};
use crate::core::paths::DataLayout;
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::{hash_bytes, now_secs, short_tag};
use crate::error::SyncError;
use crate::store::Corpus;
use crate::sync::remote::Remote;

/// Where the manager currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Fresh,
    Stale,
    Checking,
    Updating,
    Failed,
}

impl SyncPhase {
    /// Idle phase implied by persisted state
    pub fn from_state(state: &SyncState, now: i64, window: Duration) -> Self {
        if state.is_fresh(now, window) {
            SyncPhase::Fresh
        } else {
            SyncPhase::Stale
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncPhase::Fresh => "fresh",
            SyncPhase::Stale => "stale",
            SyncPhase::Checking => "checking",
            SyncPhase::Updating => "updating",
            SyncPhase::Failed => "failed",
        }
    }
}

/// Result of one sync call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Checked recently; nothing contacted
    Skipped,
    /// Remote identifier matches the local tag
    Unchanged,
    /// Forced download was byte-identical to the local document
    Identical { version_tag: String },
    /// A new document was installed
    Updated { version_tag: String, tokens: usize },
    /// Another attempt is already running
    InFlight,
}

impl SyncOutcome {
    pub fn replaced_document(&self) -> bool {
        matches!(self, SyncOutcome::Updated { .. })
    }
}

/// Clears the in-flight flag when an attempt ends, however it ends
struct FlightGuard<'a>(&'a AtomicBool);

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard(flag))
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SyncManager<R: Remote> {
    remote: R,
    layout: DataLayout,
    stale_after: Duration,
    phase: Mutex<SyncPhase>,
    in_flight: AtomicBool,
}

impl<R: Remote> SyncManager<R> {
    pub fn new(remote: R, layout: DataLayout, stale_after: Duration) -> Self {
        let phase = SyncPhase::from_state(&SyncState::read(&layout), now_secs(), stale_after);
        Self {
            remote,
            layout,
            stale_after,
            phase: Mutex::new(phase),
            in_flight: AtomicBool::new(false),
        }
    }

    #[allow(dead_code)]
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Current phase; an idle `Fresh` turns `Stale` once the window elapses
    pub fn phase(&self) -> SyncPhase {
        let phase = self.phase.lock().map(|p| *p).unwrap_or(SyncPhase::Failed);
        if phase == SyncPhase::Fresh
            && !SyncState::read(&self.layout).is_fresh(now_secs(), self.stale_after)
        {
            return SyncPhase::Stale;
        }
        phase
    }

    fn set_phase(&self, phase: SyncPhase) {
        if let Ok(mut current) = self.phase.lock() {
            *current = phase;
        }
    }

    /// Run one sync attempt
    pub fn sync(&self, force: bool) -> Result<SyncOutcome, SyncError> {
        let Some(_guard) = FlightGuard::acquire(&self.in_flight) else {
            debug!("sync already in flight");
            return Ok(SyncOutcome::InFlight);
        };

        let now = now_secs();
        let state = SyncState::read(&self.layout);
        if !force && state.is_fresh(now, self.stale_after) {
            debug!(last_checked_at = ?state.last_checked_at, "token data is fresh; skipping check");
            self.set_phase(SyncPhase::Fresh);
            return Ok(SyncOutcome::Skipped);
        }

        self.set_phase(SyncPhase::Checking);
        match self.check_and_update(&state, now, force) {
            Ok(outcome) => {
                self.set_phase(SyncPhase::Fresh);
                Ok(outcome)
            }
            Err(err) => {
                warn!(error = %err, force, "sync attempt failed");
                self.set_phase(SyncPhase::Failed);
                Err(err)
            }
        }
    }

    fn check_and_update(
        &self,
        state: &SyncState,
        now: i64,
        force: bool,
    ) -> Result<SyncOutcome, SyncError> {
        let identifier = self.remote.fetch_version()?;
        let version_tag = short_tag(&identifier);
        if version_tag.is_empty() {
            return Err(SyncError::transient("empty version identifier"));
        }

        let current = read_document(&self.layout)?;
        if !force && current.is_some() && state.version_tag.as_deref() == Some(version_tag.as_str()) {
            SyncState::record_check(&self.layout, now)?;
            debug!(%version_tag, "remote token set unchanged");
            return Ok(SyncOutcome::Unchanged);
        }

        self.set_phase(SyncPhase::Updating);
        let bytes = self.remote.fetch_document()?;

        if current.as_deref() == Some(bytes.as_slice()) {
            // still validate so a broken identical copy is reported
            Corpus::parse(&bytes)?;
            SyncState::write_version_tag(&self.layout, &version_tag)?;
            SyncState::record_check(&self.layout, now)?;
            debug!(%version_tag, "downloaded document identical to local copy");
            return Ok(SyncOutcome::Identical { version_tag });
        }

        let corpus = replace_document(&self.layout, &bytes)?;
        SyncState::write_version_tag(&self.layout, &version_tag)?;
        SyncState::record_check(&self.layout, now)?;
        info!(
            %version_tag,
            tokens = corpus.len(),
            content = %hash_bytes(&bytes),
            "installed new token document"
        );

        Ok(SyncOutcome::Updated {
            version_tag,
            tokens: corpus.len(),
        })
    }
}

/// Status items describing the persisted sync state
pub fn status_items(config: &Config, now: i64) -> ResultSet {
    let layout = config.layout();
    let state = SyncState::read(&layout);
    let mut result_set = ResultSet::new();

    let phase = match config.remote {
        Some(_) => SyncPhase::from_state(&state, now, config.stale_after).as_str(),
        None => "disabled",
    };
    let checked = state
        .last_checked_at
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|at| format!("Last checked {}", at.to_rfc3339()))
        .unwrap_or_else(|| "Never checked".to_string());
    result_set.push(Item::message("status.phase", format!("Sync {}", phase), checked));

    result_set.push(Item::message(
        "status.version",
        match &state.version_tag {
            Some(tag) => format!("Version {}", tag),
            None => "No version tag".to_string(),
        },
        layout.version().display().to_string(),
    ));

    let tokens = match Corpus::load(&layout.document()) {
        Ok(corpus) => format!("{} tokens", corpus.len()),
        Err(err) => format!("No usable token document ({})", err),
    };
    result_set.push(Item::message(
        "status.tokens",
        tokens,
        layout.document().display().to_string(),
    ));

    result_set.push(Item::message(
        "status.backup",
        if layout.backup().exists() {
            "Backup present"
        } else {
            "No backup"
        },
        layout.backup().display().to_string(),
    ));

    result_set
}

/// Print the persisted sync state
pub fn run_status(config: &Config, render_config: RenderConfig) -> Result<()> {
    let result_set = status_items(config, now_secs());
    let renderer = Renderer::with_config(render_config);
    renderer
        .render_to(&result_set, std::io::stdout().lock())
        .context("Failed to write status")?;
    Ok(())
}
