//! Workflow orchestration: install, remove, save sync.
//!
//! Each workflow runs its steps strictly in order, classifying every
//! step outcome as done, warning or fatal. Warnings land in the step log
//! and the workflow continues; a fatal outcome aborts the remaining
//! steps and propagates as a [`WorkflowError`] carrying the log
//! collected so far. No step is retried automatically — re-invoking a
//! workflow re-runs completed idempotent steps harmlessly.

mod deps;
mod error;
mod orchestrator;
mod prefix;
mod saves;
mod types;

pub use deps::{DependencyInstaller, Protontricks};
pub use error::{WorkflowError, WorkflowErrorKind};
pub use orchestrator::Orchestrator;
pub use prefix::{provision_prefix, PrefixMetadata, ProvisionOutcome};
pub use types::{StepOutcome, SyncAllReport, WorkflowReport};

pub(crate) fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
