//! Local file operations shared by the save-sync and install/remove flows.

use std::io;
use std::path::Path;

/// Marker file written into a backup directory after every successful
/// save copy. Its entire trimmed content is the timestamp.
pub const SYNC_MARKER: &str = ".last_sync";

/// Creates a directory tree, setting 755 on the leaf on Unix.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    std::fs::create_dir_all(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    }

    Ok(())
}

/// Copies a file or directory to `destination`.
///
/// Directories replace any existing destination wholesale; files get their
/// parent directories created and are copied over in place.
pub fn copy_any(source: &Path, destination: &Path) -> io::Result<()> {
    if source.is_dir() {
        if destination.exists() {
            std::fs::remove_dir_all(destination)?;
        }
        copy_tree(source, destination)
    } else {
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(source, destination)?;
        Ok(())
    }
}

fn copy_tree(source: &Path, destination: &Path) -> io::Result<()> {
    std::fs::create_dir_all(destination)?;
    for entry in std::fs::read_dir(source)? {
        let entry = entry?;
        let target = destination.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Recursively deletes `path` if it exists. Returns whether anything was
/// removed. Refuses to operate on a filesystem root.
pub fn remove_dir_if_exists(path: &Path) -> io::Result<bool> {
    if path.parent().is_none() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("refusing to delete root path: {}", path.display()),
        ));
    }
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_dir_all(path)?;
    tracing::info!(path = %path.display(), "deleted directory");
    Ok(true)
}

/// Reads the `.last_sync` marker under `dir`, trimmed. `None` when the
/// marker is missing or unreadable.
pub fn read_marker(dir: &Path) -> Option<String> {
    let marker = dir.join(SYNC_MARKER);
    std::fs::read_to_string(marker)
        .ok()
        .map(|text| text.trim().to_string())
}

/// Writes the `.last_sync` marker under `dir`.
pub fn write_marker(dir: &Path, timestamp: &str) -> io::Result<()> {
    std::fs::create_dir_all(dir)?;
    std::fs::write(dir.join(SYNC_MARKER), timestamp)
}
