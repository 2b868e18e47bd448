//! Mirror job description.

use std::path::Path;

/// Describes one mirror invocation: a remote path, a local path, a
/// direction and a deletion policy.
///
/// Exactly one of [`MirrorJob::pull`] / [`MirrorJob::push`] must be
/// selected before the job runs; selecting both or neither is rejected by
/// the engine before any subprocess is spawned.
#[derive(Debug, Clone, Default)]
pub struct MirrorJob {
    pub(crate) remote: String,
    pub(crate) local: String,
    pub(crate) pull: bool,
    pub(crate) push: bool,
    pub(crate) delete: bool,
}

impl MirrorJob {
    /// Directory mirror. Both sides are trailing-separator-qualified so
    /// rsync copies directory contents instead of nesting the directory.
    pub fn directory(remote: &str, local: &Path) -> Self {
        Self {
            remote: with_trailing_slash(remote),
            local: with_trailing_slash(&local.to_string_lossy()),
            ..Self::default()
        }
    }

    /// Single-file transfer. The local side is the file's containing
    /// directory, trailing-separator-qualified so rsync treats it as a
    /// directory target rather than a rename.
    pub fn single_file(remote_file: &str, local_dir: &Path) -> Self {
        Self {
            remote: remote_file.to_string(),
            local: with_trailing_slash(&local_dir.to_string_lossy()),
            ..Self::default()
        }
    }

    /// Remote → local.
    pub fn pull(mut self) -> Self {
        self.pull = true;
        self
    }

    /// Local → remote.
    pub fn push(mut self) -> Self {
        self.push = true;
        self
    }

    /// Make the destination an exact mirror, deleting destination-only
    /// entries. Destructive; only for destinations fully derived from the
    /// source.
    pub fn delete_extraneous(mut self) -> Self {
        self.delete = true;
        self
    }
}

fn with_trailing_slash(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    format!("{trimmed}/")
}
