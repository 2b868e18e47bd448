//! Steam installation paths and userdata discovery.

use std::path::{Path, PathBuf};

use crate::SteamError;

/// Locates the Steam base directory and per-user config paths.
#[derive(Debug, Clone)]
pub struct SteamPaths {
    base: PathBuf,
}

impl SteamPaths {
    /// Auto-detects the Steam base directory.
    ///
    /// Checks `~/.local/share/Steam` first (stock Linux install), then
    /// the `~/.steam/steam` symlink.
    pub fn new() -> Result<Self, SteamError> {
        let home = decksync_settings::home_dir();
        let candidates = [
            home.join(".local/share/Steam"),
            home.join(".steam/steam"),
        ];
        candidates
            .into_iter()
            .find(|p| p.exists())
            .map(|base| Self { base })
            .ok_or(SteamError::NotFound)
    }

    /// Uses an explicit base directory (tests, unusual installs).
    pub fn with_base(base: &Path) -> Self {
        Self {
            base: base.to_path_buf(),
        }
    }

    pub fn userdata_dir(&self) -> PathBuf {
        self.base.join("userdata")
    }

    /// Numeric user ids under userdata, skipping the temporary `0`
    /// directory Steam sometimes leaves behind.
    pub fn users(&self) -> Result<Vec<String>, SteamError> {
        let entries = std::fs::read_dir(self.userdata_dir()).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SteamError::NotFound
            } else {
                SteamError::Io(e.to_string())
            }
        })?;

        let mut users = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SteamError::Io(e.to_string()))?;
            if !entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
                continue;
            }
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name == "0" || name.parse::<u64>().is_err() {
                continue;
            }
            users.push(name.into_owned());
        }
        users.sort();
        Ok(users)
    }

    pub fn shortcuts_path(&self, user_id: &str) -> PathBuf {
        self.userdata_dir()
            .join(user_id)
            .join("config")
            .join("shortcuts.vdf")
    }

    /// First user that already has a shortcuts file, else the first user.
    pub fn primary_user(&self) -> Result<String, SteamError> {
        let users = self.users()?;
        users
            .iter()
            .find(|u| self.shortcuts_path(u).exists())
            .or_else(|| users.first())
            .cloned()
            .ok_or(SteamError::NotFound)
    }
}
