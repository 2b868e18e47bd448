//! Rsync invocation.

use decksync_settings::Settings;
use tracing::debug;

use crate::job::MirrorJob;
use crate::SyncError;

const TOOL: &str = "rsync";
const HINT: &str = "Install rsync to enable remote sync.";

/// The rsync engine: a remote host plus the configured flag set.
#[derive(Debug, Clone)]
pub struct Rsync {
    host: String,
    flags: Vec<String>,
}

impl Rsync {
    /// Builds an engine from settings.
    ///
    /// A missing remote host is a configuration error, fatal to the call.
    pub fn from_settings(settings: &Settings) -> Result<Self, SyncError> {
        let host = settings.remote_host.trim();
        if host.is_empty() {
            return Err(SyncError::Configuration(
                "remote host is not configured".into(),
            ));
        }
        Ok(Self {
            host: host.to_string(),
            flags: settings
                .rsync_flags
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        })
    }

    /// Runs one mirror job to completion.
    ///
    /// The job must select exactly one direction; both or neither fails
    /// with a configuration error before rsync is spawned. A non-zero
    /// exit becomes [`SyncError::Failed`] carrying the captured error
    /// output; a missing rsync binary becomes
    /// [`SyncError::ToolUnavailable`].
    pub async fn mirror(&self, job: &MirrorJob) -> Result<(), SyncError> {
        let (source, destination) = match (job.pull, job.push) {
            (true, false) => (format!("{}:{}", self.host, job.remote), job.local.clone()),
            (false, true) => (job.local.clone(), format!("{}:{}", self.host, job.remote)),
            _ => {
                return Err(SyncError::Configuration(
                    "exactly one of pull or push must be selected".into(),
                ));
            }
        };

        let mut cmd = tokio::process::Command::new(TOOL);
        cmd.args(&self.flags);
        if job.delete {
            cmd.arg("--delete");
        }
        cmd.arg(&source).arg(&destination);

        debug!(%source, %destination, delete = job.delete, "running rsync");

        let output = cmd
            .output()
            .await
            .map_err(|e| SyncError::from_spawn(TOOL, HINT, e))?;

        if !output.status.success() {
            return Err(SyncError::from_output(TOOL, &output));
        }

        Ok(())
    }
}
