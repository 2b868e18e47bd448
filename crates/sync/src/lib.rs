//! Directional file/directory mirroring over rsync.
//!
//! One primitive, [`Rsync::mirror`], parameterized by a [`MirrorJob`]:
//! direction (pull or push), deletion policy, and the flag set from
//! settings. Catalog refresh, game-file transfer and save transfer all go
//! through it.
//!
//! Retrying a mirror without `--delete` is safe. With `--delete` the
//! destination becomes an exact replica of the source, destination-only
//! entries included, so it is reserved for targets fully derived from the
//! source.

mod job;
mod rsync;

pub use job::MirrorJob;
pub use rsync::Rsync;

/// Errors produced by the sync engine.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A required setting is missing or the mirror request is malformed.
    /// Raised before any subprocess is spawned.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The external binary is not installed on this host.
    #[error("{tool} is not available on this system. {hint}")]
    ToolUnavailable { tool: String, hint: String },

    /// The external tool exited non-zero. Carries its error output
    /// (standard output when stderr was empty).
    #[error("{tool} failed ({code}): {output}")]
    Failed {
        tool: String,
        code: i32,
        output: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Captures a finished process's failure output, preferring stderr.
    pub fn from_output(tool: &str, output: &std::process::Output) -> Self {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let captured = if stderr.is_empty() {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        } else {
            stderr
        };
        Self::Failed {
            tool: tool.into(),
            code: output.status.code().unwrap_or(-1),
            output: captured,
        }
    }

    /// Maps a spawn error, turning "binary not found" into
    /// [`SyncError::ToolUnavailable`] with a remediation hint.
    pub fn from_spawn(tool: &str, hint: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::ToolUnavailable {
                tool: tool.into(),
                hint: hint.into(),
            }
        } else {
            Self::Io(err)
        }
    }
}
