//! Definition decoration: derived paths plus on-disk probes.

use decksync_paths as paths;
use decksync_settings::Settings;

use crate::types::{GameDefinition, ResolvedGame};

/// File name of the metadata stamp written into a provisioned prefix.
pub const PREFIX_METADATA: &str = "decksync.json";

/// Combines a raw definition with resolved paths and existence probes.
///
/// Pure given the definition, settings and the filesystem snapshot at
/// call time. Not memoized — the catalog caches decorated sequences.
pub fn decorate(def: &GameDefinition, settings: &Settings) -> ResolvedGame {
    let local_path = paths::local_install_path(settings, &def.name);
    let prefix_path = paths::prefix_path(settings, def.steam_appid);
    let backup_path = paths::backup_path(settings, &def.name);

    let remote_subpath = if !def.remote_path.is_empty() {
        def.remote_path.clone()
    } else if !def.path.is_empty() {
        def.path.clone()
    } else {
        paths::slugify(&def.name)
    };

    let metadata = prefix_path.join(PREFIX_METADATA);

    ResolvedGame {
        name: def.name.clone(),
        steam_appid: def.steam_appid,
        remote_subpath,
        proton_version: def
            .proton_version
            .clone()
            .unwrap_or_else(|| settings.proton.default_version.clone()),
        proton_dependencies: def.proton_dependencies.clone(),
        proton_sync_paths: def.proton_sync_paths.clone(),
        executable: def.executable.clone(),
        categories: def.categories.clone(),
        launch_options: def.launch_options.clone(),

        installed: local_path.exists(),
        prefix_ready: prefix_path.join("pfx").exists(),
        last_backup: decksync_fsops::read_marker(&backup_path),
        remote_available: settings.remote_available(),
        metadata_path: metadata.exists().then_some(metadata),

        local_path,
        prefix_path,
        backup_path,
    }
}
