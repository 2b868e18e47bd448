//! Workflow error types.

use decksync_catalog::CatalogError;
use decksync_steam::SteamError;
use decksync_sync::SyncError;

/// What went wrong, independent of how far the workflow got.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowErrorKind {
    /// A workflow precondition was violated: already installed, not
    /// installed, no sync paths configured, nothing copied.
    #[error("{0}")]
    State(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Steam(#[from] SteamError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A failed workflow: the error plus the step log collected before the
/// fatal step, for diagnostics.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct WorkflowError {
    pub kind: WorkflowErrorKind,
    pub steps: Vec<String>,
}

impl WorkflowError {
    pub fn state(message: impl Into<String>) -> Self {
        WorkflowErrorKind::State(message.into()).into()
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        WorkflowErrorKind::Configuration(message.into()).into()
    }
}

impl From<WorkflowErrorKind> for WorkflowError {
    fn from(kind: WorkflowErrorKind) -> Self {
        Self {
            kind,
            steps: Vec::new(),
        }
    }
}

impl From<CatalogError> for WorkflowError {
    fn from(e: CatalogError) -> Self {
        WorkflowErrorKind::from(e).into()
    }
}

impl From<SyncError> for WorkflowError {
    fn from(e: SyncError) -> Self {
        WorkflowErrorKind::from(e).into()
    }
}

impl From<SteamError> for WorkflowError {
    fn from(e: SteamError) -> Self {
        WorkflowErrorKind::from(e).into()
    }
}

impl From<std::io::Error> for WorkflowError {
    fn from(e: std::io::Error) -> Self {
        WorkflowErrorKind::from(e).into()
    }
}
