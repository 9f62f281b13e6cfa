//! Cache module - Manages the persisted token data
//!
//! Provides:
//! - Crash-safe document replacement with backup (store)
//! - Last-checked time and version tag bookkeeping (meta)

pub mod meta;
pub mod store;
