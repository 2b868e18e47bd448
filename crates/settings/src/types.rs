//! Typed view of the settings document.

use serde::{Deserialize, Serialize};

/// Proton-specific configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProtonSettings {
    /// Root directory holding one compatibility prefix per app id.
    pub compatdata_path: String,
    /// Proton build used when a game does not declare its own.
    pub default_version: String,
}

impl Default for ProtonSettings {
    fn default() -> Self {
        let home = crate::home_dir();
        Self {
            compatdata_path: home
                .join(".local/share/Steam/steamapps/compatdata")
                .to_string_lossy()
                .into_owned(),
            default_version: "GE-Proton10-25".into(),
        }
    }
}

/// The full settings document.
///
/// Every field has a default, so a partially-populated document on disk
/// always deserializes. The on-disk key names are camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// SSH host (or `user@host`) games and saves are mirrored against.
    pub remote_host: String,
    /// Path of the game catalog file on the remote host.
    pub remote_config_path: String,
    /// Root directory for local game installs.
    pub local_games_path: String,
    pub proton: ProtonSettings,
    /// Root directory for per-game save backups.
    pub save_backup_path: String,
    /// Flags passed to every rsync invocation, whitespace-separated.
    pub rsync_flags: String,
}

impl Default for Settings {
    fn default() -> Self {
        let home = crate::home_dir();
        Self {
            remote_host: String::new(),
            remote_config_path: String::new(),
            local_games_path: home.join("Games").to_string_lossy().into_owned(),
            proton: ProtonSettings::default(),
            save_backup_path: crate::data_dir().join("saves").to_string_lossy().into_owned(),
            rsync_flags: "-avz".into(),
        }
    }
}

impl Settings {
    /// True when both the remote host and the remote catalog path are set.
    pub fn remote_available(&self) -> bool {
        !self.remote_host.trim().is_empty() && !self.remote_config_path.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_populated() {
        let s = Settings::default();
        assert!(s.local_games_path.ends_with("Games"));
        assert!(s.proton.compatdata_path.ends_with("compatdata"));
        assert_eq!(s.rsync_flags, "-avz");
        assert!(!s.remote_available());
    }

    #[test]
    fn json_field_names_are_camel_case() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(json.contains("\"remoteHost\""));
        assert!(json.contains("\"localGamesPath\""));
        assert!(json.contains("\"compatdataPath\""));
        assert!(json.contains("\"defaultVersion\""));
    }

    #[test]
    fn partial_document_deserializes() {
        let s: Settings = serde_json::from_str(r#"{"remoteHost":"deck@host"}"#).unwrap();
        assert_eq!(s.remote_host, "deck@host");
        assert_eq!(s.rsync_flags, "-avz");
    }

    #[test]
    fn remote_available_requires_both() {
        let mut s = Settings::default();
        s.remote_host = "host".into();
        assert!(!s.remote_available());
        s.remote_config_path = "/srv/games/games.json".into();
        assert!(s.remote_available());
    }
}
