//! Query engine - Answers one launcher request
//!
//! A request runs at most one opportunistic sync, then one search over the
//! in-memory corpus, then pairs each hit with its icon. The corpus is loaded
//! lazily and dropped again whenever a sync installs a new document.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::core::config::Config;
use crate::core::model::{Item, ResultSet};
use crate::core::paths::DataLayout;
use crate::core::render::{RenderConfig, Renderer};
use crate::icons::IconResolver;
use crate::search::scorer::Scorer;
use crate::store::{Corpus, Token};
use crate::sync::{HttpRemote, Remote, SyncManager, SyncOutcome};

/// Query that forces an update instead of searching
pub const UPDATE_COMMAND: &str = "update";

/// Whether `query` is the reserved update command
pub fn is_update_command(query: &str) -> bool {
    query.trim().eq_ignore_ascii_case(UPDATE_COMMAND)
}

/// Rank corpus tokens against `query`, best first, at most `limit`
///
/// A blank query skips scoring and returns the corpus prefix in order.
pub fn rank<'a>(corpus: &'a Corpus, scorer: &Scorer, query: &str, limit: usize) -> Vec<&'a Token> {
    if query.trim().is_empty() {
        return corpus.iter().take(limit).collect();
    }

    let mut scored: Vec<_> = corpus
        .iter()
        .filter_map(|token| scorer.score(query, &token.name).map(|m| (m.rank, token)))
        .collect();
    // stable: equal keys keep corpus order
    scored.sort_by(|a, b| a.0.cmp(&b.0));
    scored.into_iter().take(limit).map(|(_, token)| token).collect()
}

/// Read the local corpus, treating any failure as "no tokens"
fn load_or_empty(layout: &DataLayout) -> Corpus {
    match Corpus::load(&layout.document()) {
        Ok(corpus) => {
            debug!(tokens = corpus.len(), "loaded token document");
            corpus
        }
        Err(err) => {
            warn!(error = %err, "no usable token document; serving empty corpus");
            Corpus::default()
        }
    }
}

/// Request orchestrator owning the process-scoped caches
pub struct QueryEngine<R: Remote> {
    layout: DataLayout,
    scorer: Scorer,
    max_results: usize,
    icons: IconResolver,
    sync: Option<SyncManager<R>>,
    corpus: Option<Corpus>,
}

impl<R: Remote> QueryEngine<R> {
    pub fn new(config: &Config, sync: Option<SyncManager<R>>) -> Self {
        let layout = config.layout();
        Self {
            icons: IconResolver::new(layout.images_dir(), &config.mono_icon),
            scorer: Scorer::new(config.search.threshold),
            max_results: config.search.max_results,
            layout,
            sync,
            corpus: None,
        }
    }

    #[allow(dead_code)]
    pub fn sync_manager(&self) -> Option<&SyncManager<R>> {
        self.sync.as_ref()
    }

    /// The cached corpus, loading it on first use
    #[allow(dead_code)]
    pub fn corpus(&mut self) -> &Corpus {
        let layout = &self.layout;
        self.corpus.get_or_insert_with(|| load_or_empty(layout))
    }

    /// Drop the cached corpus so the next request rereads the document
    pub fn invalidate(&mut self) {
        self.corpus = None;
    }

    /// Search without syncing
    #[allow(dead_code)]
    pub fn search(&mut self, query: &str) -> Vec<Token> {
        let (scorer, limit) = (self.scorer, self.max_results);
        rank(self.corpus(), &scorer, query, limit)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Full request: update command, or opportunistic sync followed by search
    pub fn handle(&mut self, query: &str, auto_sync: bool) -> ResultSet {
        if is_update_command(query) {
            let mut result_set = ResultSet::new();
            result_set.push(self.force_update());
            return result_set;
        }

        if auto_sync {
            self.refresh();
        }

        let layout = &self.layout;
        let corpus = self.corpus.get_or_insert_with(|| load_or_empty(layout));
        rank(corpus, &self.scorer, query, self.max_results)
            .into_iter()
            .map(|token| Item::token(token, self.icons.resolve(token)))
            .collect()
    }

    /// Opportunistic sync; failures are logged and otherwise ignored
    pub fn refresh(&mut self) {
        let Some(sync) = &self.sync else {
            return;
        };
        match sync.sync(false) {
            Ok(outcome) => {
                debug!(?outcome, phase = sync.phase().as_str(), "background sync finished");
                if outcome.replaced_document() {
                    self.invalidate();
                }
            }
            Err(err) if err.is_transient() => {
                debug!(error = %err, "background sync failed; serving local tokens")
            }
            Err(err) => warn!(error = %err, "background sync failed; serving local tokens"),
        }
    }

    /// Forced update reported as a single synthetic item
    pub fn force_update(&mut self) -> Item {
        let Some(sync) = &self.sync else {
            return Item::message(
                UPDATE_COMMAND,
                "Sync is not configured",
                "Set TOKENSIFT_VERSION_URL and TOKENSIFT_DOCUMENT_URL to enable updates",
            );
        };

        match sync.sync(true) {
            Ok(SyncOutcome::Updated { version_tag, tokens }) => {
                info!(%version_tag, tokens, "tokens updated");
                self.invalidate();
                Item::message(
                    UPDATE_COMMAND,
                    "Tokens updated",
                    format!("{} tokens, version {}", tokens, version_tag),
                )
            }
            Ok(SyncOutcome::InFlight) => Item::message(
                UPDATE_COMMAND,
                "Update already running",
                "Another update is in progress",
            ),
            Ok(_) => Item::message(
                UPDATE_COMMAND,
                "Tokens already up to date",
                "No changes in the remote token set",
            ),
            Err(err) => {
                warn!(error = %err, "forced update failed");
                Item::message(UPDATE_COMMAND, "Update failed", err.to_string())
            }
        }
    }
}

/// Sync manager over HTTP when endpoints are configured
fn http_sync(config: &Config) -> Option<SyncManager<HttpRemote>> {
    let remote = config.remote.clone()?;
    match HttpRemote::new(remote) {
        Ok(remote) => Some(SyncManager::new(remote, config.layout(), config.stale_after)),
        Err(err) => {
            warn!(error = %err, "could not set up remote sync");
            None
        }
    }
}

/// Answer one launcher request and print the result
pub fn run_search(config: &Config, query: &str, auto_sync: bool, render_config: RenderConfig) -> Result<()> {
    let mut engine = QueryEngine::new(config, http_sync(config));
    let result_set = engine.handle(query, auto_sync);

    let renderer = Renderer::with_config(render_config);
    renderer
        .render_to(&result_set, std::io::stdout().lock())
        .context("Failed to write results")?;
    Ok(())
}
