//! Workflow result types and the step log.

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{WorkflowError, WorkflowErrorKind};

/// Classification of one workflow step.
#[derive(Debug)]
pub enum StepOutcome {
    /// Step completed; message goes to the log.
    Done(String),
    /// Step failed but the workflow continues; message goes to the log
    /// as a warning.
    Warning(String),
    /// Step failed and the workflow aborts.
    Fatal(WorkflowErrorKind),
}

/// Result of a completed workflow invocation.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowReport {
    pub message: String,
    /// Ordered human-readable step outcomes, warnings included.
    pub steps: Vec<String>,
    pub timestamp: String,
}

/// Result of a whole-catalog save sync.
#[derive(Debug, Clone, Serialize)]
pub struct SyncAllReport {
    pub ok: bool,
    pub synced: usize,
    /// One `"name: reason"` entry per game that failed.
    pub failures: Vec<String>,
    pub timestamp: String,
}

/// Append-only log of step outcomes for one workflow invocation.
#[derive(Debug, Default)]
pub(crate) struct StepLog {
    steps: Vec<String>,
}

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a step outcome: done and warning entries accumulate, a
    /// fatal outcome converts into the workflow error carrying the log
    /// so far.
    pub fn record(&mut self, outcome: StepOutcome) -> Result<(), WorkflowError> {
        match outcome {
            StepOutcome::Done(message) => {
                info!("{message}");
                self.steps.push(message);
                Ok(())
            }
            StepOutcome::Warning(message) => {
                warn!("{message}");
                self.steps.push(message);
                Ok(())
            }
            StepOutcome::Fatal(kind) => Err(self.fatal(kind)),
        }
    }

    pub fn done(&mut self, message: impl Into<String>) {
        let _ = self.record(StepOutcome::Done(message.into()));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        let _ = self.record(StepOutcome::Warning(message.into()));
    }

    /// Wraps an error with the steps collected so far.
    pub fn fatal(&self, kind: impl Into<WorkflowErrorKind>) -> WorkflowError {
        WorkflowError {
            kind: kind.into(),
            steps: self.steps.clone(),
        }
    }

    pub fn into_report(self, message: impl Into<String>) -> WorkflowReport {
        WorkflowReport {
            message: message.into(),
            steps: self.steps,
            timestamp: crate::now_iso(),
        }
    }
}
