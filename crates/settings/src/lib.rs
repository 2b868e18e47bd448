//! Decksync settings: the persisted configuration document.
//!
//! Settings live in a JSON document under the data directory. The document
//! is loaded once at startup and only mutated through [`SettingsStore::merge`],
//! which deep-merges a partial update over the current document and persists
//! the result. Unknown keys survive merges; keys present in the default
//! document are never removed.

mod merge;
mod store;
mod types;

pub use merge::deep_merge;
pub use store::SettingsStore;
pub use types::{ProtonSettings, Settings};

use std::path::PathBuf;

/// Directory name under `~/.local/share` holding all decksync state.
pub const APP_DIR: &str = "decksync";

/// Errors produced by settings persistence.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Returns the user's home directory, `/tmp` as fallback.
pub fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

/// Resolves the decksync data directory (`~/.local/share/decksync`).
pub fn data_dir() -> PathBuf {
    home_dir().join(".local").join("share").join(APP_DIR)
}
