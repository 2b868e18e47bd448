//! Catalog data types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A raw catalog entry, exactly as the catalog file declares it.
/// Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameDefinition {
    /// Unique key within a catalog.
    pub name: String,
    /// Remote-relative location of the game files under the remote games
    /// base. Plays no part in local placement.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    /// Explicit remote subpath, overriding `path`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub remote_path: String,
    pub steam_appid: u32,
    /// Proton build override; the settings default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proton_version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub proton_dependencies: Vec<String>,
    /// Save locations relative to the prefix, `%TOKEN%` patterns allowed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub proton_sync_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub executable: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub launch_options: String,
}

/// Parsed catalog file: the definition sequence plus the optional remote
/// save location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    pub games: Vec<GameDefinition>,
    #[serde(default, rename = "savesPath")]
    pub saves_path: String,
}

/// A catalog entry decorated with derived paths and on-disk probes.
///
/// Rebuilt on every catalog refresh and never mutated in place.
/// `installed` and `prefix_ready` are snapshots taken at decoration time;
/// callers needing freshness re-trigger a refresh.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedGame {
    pub name: String,
    pub steam_appid: u32,
    /// Effective remote subpath: `remote_path`, else `path`, else the
    /// name slug.
    pub remote_subpath: String,
    /// Resolved Proton build: the definition's override or the settings
    /// default.
    pub proton_version: String,
    pub proton_dependencies: Vec<String>,
    pub proton_sync_paths: Vec<String>,
    pub executable: String,
    pub categories: Vec<String>,
    pub launch_options: String,

    pub local_path: PathBuf,
    pub prefix_path: PathBuf,
    pub backup_path: PathBuf,
    pub installed: bool,
    pub prefix_ready: bool,
    /// Trimmed content of the backup directory's `.last_sync` marker.
    pub last_backup: Option<String>,
    pub remote_available: bool,
    /// Present when the per-prefix metadata stamp exists on disk.
    pub metadata_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_minimal_json() {
        let def: GameDefinition =
            serde_json::from_str(r#"{"name": "Hades", "steam_appid": 1145360}"#).unwrap();
        assert_eq!(def.name, "Hades");
        assert_eq!(def.steam_appid, 1145360);
        assert!(def.path.is_empty());
        assert!(def.proton_version.is_none());
        assert!(def.proton_sync_paths.is_empty());
    }

    #[test]
    fn definition_serialization_omits_empty_fields() {
        let def = GameDefinition {
            name: "X".into(),
            steam_appid: 1,
            ..Default::default()
        };
        let json = serde_json::to_string(&def).unwrap();
        assert!(!json.contains("remote_path"));
        assert!(!json.contains("proton_dependencies"));
        assert!(!json.contains("launch_options"));
    }

    #[test]
    fn catalog_file_saves_path_key() {
        let file: CatalogFile =
            serde_json::from_str(r#"{"games": [], "savesPath": "/srv/saves"}"#).unwrap();
        assert_eq!(file.saves_path, "/srv/saves");
    }
}
