//! Common utilities

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use xxhash_rust::xxh3::xxh3_64;

/// Maximum length of a persisted version tag
pub const VERSION_TAG_LEN: usize = 12;

static UNSAFE_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9-]").expect("Invalid UNSAFE_CHARS_RE regex"));

/// Compute a short content hash (XXH3, 16 hex chars)
pub fn hash_bytes(data: &[u8]) -> String {
    format!("{:016x}", xxh3_64(data))
}

/// Shorten a remote version identifier to a version tag
pub fn short_tag(identifier: &str) -> String {
    identifier.trim().chars().take(VERSION_TAG_LEN).collect()
}

/// Filesystem-safe identifier: everything but ASCII alphanumerics and '-'
/// becomes '_'
pub fn safe_name(name: &str) -> String {
    UNSAFE_CHARS_RE.replace_all(name, "_").into_owned()
}

/// Current time in seconds since the Unix epoch
pub fn now_secs() -> i64 {
    Utc::now().timestamp()
}
