//! Sync module - Keeps the local token document in step with the remote source

pub mod manager;
pub mod remote;

pub use manager::{SyncManager, SyncOutcome, SyncPhase};
pub use remote::{HttpRemote, Remote};
