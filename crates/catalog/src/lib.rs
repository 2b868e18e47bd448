//! Game catalog: raw definitions in, fully-resolved games out.
//!
//! The catalog file itself comes from a [`CatalogSource`] collaborator —
//! typically a remote fetch over the sync engine — and each raw
//! [`GameDefinition`] is decorated with every derived path plus on-disk
//! probes into a [`ResolvedGame`]. Decorated snapshots are cached whole
//! and replaced atomically on refresh.

mod catalog;
mod decorate;
mod parse;
mod source;
mod types;

pub use catalog::{Catalog, CatalogSnapshot};
pub use decorate::{decorate, PREFIX_METADATA};
pub use parse::{parse_auto, parse_json, parse_list};
pub use source::{CatalogSource, RemoteCatalogSource};
pub use types::{CatalogFile, GameDefinition, ResolvedGame};

/// Errors produced by catalog loading and lookup.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Remote host and catalog path must both be configured before the
    /// catalog can be fetched.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Lookup by name found nothing. Absence is an error, never an empty
    /// result.
    #[error("game '{0}' was not found in the catalog")]
    NotFound(String),

    /// Lookup by app id found nothing.
    #[error("game with app id {0} was not found in the catalog")]
    NotFoundAppId(u32),

    #[error("catalog parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Sync(#[from] decksync_sync::SyncError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub(crate) fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
