//! The workflow orchestrator.

use std::path::Path;

use decksync_catalog::{Catalog, CatalogError, CatalogSnapshot, ResolvedGame};
use decksync_fsops as fsops;
use decksync_settings::{Settings, SettingsStore};
use decksync_steam::{ShortcutEntry, ShortcutRegistry};
use decksync_sync::{MirrorJob, Rsync};
use tracing::warn;

use crate::deps::DependencyInstaller;
use crate::error::{WorkflowError, WorkflowErrorKind};
use crate::prefix::provision_prefix;
use crate::saves;
use crate::types::{StepLog, SyncAllReport, WorkflowReport};

/// Conventional executable names probed when a game declares none.
const EXECUTABLE_CANDIDATES: [&str; 2] = ["game.exe", "Game.exe"];

/// Sequences install, remove and save-sync workflows over the settings
/// store, catalog and collaborators. Holds no per-workflow state; each
/// invocation builds its own step log.
pub struct Orchestrator {
    settings: SettingsStore,
    catalog: Catalog,
    installer: Box<dyn DependencyInstaller>,
    registry: Box<dyn ShortcutRegistry>,
}

impl Orchestrator {
    pub fn new(
        settings: SettingsStore,
        catalog: Catalog,
        installer: Box<dyn DependencyInstaller>,
        registry: Box<dyn ShortcutRegistry>,
    ) -> Self {
        Self {
            settings,
            catalog,
            installer,
            registry,
        }
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> Settings {
        self.settings.get()
    }

    /// Merges a partial settings update and persists it.
    pub fn update_settings(
        &mut self,
        partial: &serde_json::Value,
    ) -> Result<Settings, decksync_settings::SettingsError> {
        self.settings.merge(partial)
    }

    /// Reloads the catalog, refreshing every decorated snapshot.
    pub async fn refresh_catalog(
        &self,
    ) -> Result<std::sync::Arc<CatalogSnapshot>, CatalogError> {
        self.catalog.load(&self.settings.get()).await
    }

    /// Cached catalog, loading on first use.
    pub async fn catalog_snapshot(
        &self,
    ) -> Result<std::sync::Arc<CatalogSnapshot>, CatalogError> {
        self.catalog.snapshot(&self.settings.get()).await
    }

    /// Installs a game end to end: download, prefix, dependencies, save
    /// import, Steam shortcut.
    pub async fn install(&self, name: &str) -> Result<WorkflowReport, WorkflowError> {
        let settings = self.settings.get();
        let snapshot = self.catalog.snapshot(&settings).await?;
        let game = find_game(&snapshot, name)?;

        if game.installed {
            return Err(WorkflowError::state(format!(
                "game '{name}' is already installed"
            )));
        }
        if settings.remote_host.trim().is_empty() {
            return Err(WorkflowError::configuration(
                "remote host is not configured",
            ));
        }

        let mut log = StepLog::new();

        // Step 1: download game files. Fatal.
        let engine = Rsync::from_settings(&settings).map_err(|e| log.fatal(e))?;
        let remote_base = Path::new(settings.remote_config_path.trim())
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let remote_target = remote_base.join(&game.remote_subpath);
        fsops::ensure_dir(&game.local_path).map_err(|e| log.fatal(e))?;
        engine
            .mirror(&MirrorJob::directory(&remote_target.to_string_lossy(), &game.local_path).pull())
            .await
            .map_err(|e| log.fatal(e))?;
        log.done("Downloaded game files");

        // Step 2: provision the Proton prefix. Only directory creation
        // is fatal; bootstrap and stamp issues arrive as warnings.
        let outcome =
            provision_prefix(&settings, &game.name, game.steam_appid, &game.proton_version)
                .await
                .map_err(|e| log.fatal(e))?;
        log.done("Created Proton prefix");
        for warning in outcome.warnings {
            log.warning(warning);
        }

        // Step 3: dependencies. Non-fatal.
        if !game.proton_dependencies.is_empty() {
            let mut failed = Vec::new();
            for dep in &game.proton_dependencies {
                if let Err(e) = self.installer.install(game.steam_appid, dep).await {
                    warn!(dependency = %dep, error = %e, "dependency install failed");
                    failed.push(format!("{dep}: {e}"));
                }
            }
            if failed.is_empty() {
                log.done(format!(
                    "Installed dependencies: {}",
                    game.proton_dependencies.join(", ")
                ));
            } else {
                log.warning(format!(
                    "Dependency installation had issues: {}",
                    failed.join("; ")
                ));
            }
        }

        // Step 4: import saves from remote. Non-fatal.
        if !snapshot.saves_path.is_empty() {
            match saves::import_saves(&engine, &snapshot.saves_path, &game).await {
                Ok(()) => log.done("Imported saves from remote"),
                Err(e) => log.warning(format!("Save import had issues: {e}")),
            }
        }

        // Step 5: resolve the executable and register the shortcut. Fatal.
        let executable = resolve_executable(&game).ok_or_else(|| {
            log.fatal(WorkflowErrorKind::State(
                "no executable found and none specified".into(),
            ))
        })?;
        let exe_path = game.local_path.join(&executable);
        let app_id = decksync_steam::effective_app_id(
            game.steam_appid,
            &exe_path.to_string_lossy(),
            &game.name,
        );
        let entry = ShortcutEntry {
            app_id,
            name: game.name.clone(),
            exe: exe_path,
            start_dir: game.local_path.clone(),
            launch_options: decksync_steam::compat_launch_options(
                &game.prefix_path,
                &game.launch_options,
            ),
            categories: game.categories.clone(),
        };
        self.registry
            .register(&entry)
            .await
            .map_err(|e| log.fatal(e))?;
        log.done("Added to Steam library");

        self.reload_after(&settings, &mut log).await;
        Ok(log.into_report(format!("Game '{name}' installed successfully")))
    }

    /// Removes a game: save backup, shortcut removal, file deletion.
    pub async fn remove(&self, name: &str) -> Result<WorkflowReport, WorkflowError> {
        let settings = self.settings.get();
        let snapshot = self.catalog.snapshot(&settings).await?;
        let game = find_game(&snapshot, name)?;

        if !game.installed {
            return Err(WorkflowError::state(format!(
                "game '{name}' is not installed"
            )));
        }

        let mut log = StepLog::new();

        // Step 1: back up saves. Non-fatal.
        match saves::sync_game_saves(&settings, &snapshot.saves_path, &game).await {
            Ok(_) => log.done("Backed up saves"),
            Err(e) => log.warning(format!("Save backup had issues: {e}")),
        }

        // Step 2: unregister the shortcut. Non-fatal.
        let app_id = match resolve_executable(&game) {
            Some(exe) => decksync_steam::effective_app_id(
                game.steam_appid,
                &game.local_path.join(exe).to_string_lossy(),
                &game.name,
            ),
            None => game.steam_appid,
        };
        match self.registry.unregister(app_id).await {
            Ok(()) => log.done("Removed from Steam library"),
            Err(e) => log.warning(format!("Steam removal had issues: {e}")),
        }

        // Step 3: delete the game folder. Fatal.
        match fsops::remove_dir_if_exists(&game.local_path) {
            Ok(true) => log.done("Deleted game folder"),
            Ok(false) => {}
            Err(e) => return Err(log.fatal(e)),
        }

        // Step 4: delete the Proton prefix. Non-fatal.
        match fsops::remove_dir_if_exists(&game.prefix_path) {
            Ok(true) => log.done("Deleted Proton prefix"),
            Ok(false) => {}
            Err(e) => log.warning(format!("Prefix deletion had issues: {e}")),
        }

        self.reload_after(&settings, &mut log).await;
        Ok(log.into_report(format!("Game '{name}' removed successfully")))
    }

    /// Syncs one game's saves to the backup store (and remote, when
    /// configured).
    pub async fn sync_saves(&self, name: &str) -> Result<WorkflowReport, WorkflowError> {
        let settings = self.settings.get();
        let snapshot = self.catalog.snapshot(&settings).await?;
        let game = find_game(&snapshot, name)?;
        saves::sync_game_saves(&settings, &snapshot.saves_path, &game).await
    }

    /// Syncs saves for every installed game, collecting per-game
    /// failures instead of aborting.
    pub async fn sync_all_saves(&self) -> Result<SyncAllReport, WorkflowError> {
        let settings = self.settings.get();
        let snapshot = self.catalog.snapshot(&settings).await?;

        let mut synced = 0usize;
        let mut failures = Vec::new();
        for game in snapshot.games.iter().filter(|g| g.installed) {
            match saves::sync_game_saves(&settings, &snapshot.saves_path, game).await {
                Ok(_) => synced += 1,
                Err(e) => failures.push(format!("{}: {}", game.name, e)),
            }
        }

        Ok(SyncAllReport {
            ok: failures.is_empty(),
            synced,
            failures,
            timestamp: crate::now_iso(),
        })
    }

    /// Provisions (or re-provisions) a game's prefix without installing.
    pub async fn provision_prefix(&self, app_id: u32) -> Result<WorkflowReport, WorkflowError> {
        let settings = self.settings.get();
        let game = self.catalog.find_by_app_id(&settings, app_id).await?;

        let mut log = StepLog::new();
        let outcome =
            provision_prefix(&settings, &game.name, game.steam_appid, &game.proton_version)
                .await
                .map_err(|e| log.fatal(e))?;
        log.done(format!(
            "Prepared Proton prefix for {} at {}",
            game.name,
            outcome.prefix_path.display()
        ));
        for warning in outcome.warnings {
            log.warning(warning);
        }
        Ok(log.into_report(format!("Prefix ready for {}", game.name)))
    }

    /// Post-workflow catalog refresh so cached `installed` flags reflect
    /// the new state. Refresh trouble is worth a warning, not a failure
    /// of the already-completed workflow.
    async fn reload_after(&self, settings: &Settings, log: &mut StepLog) {
        if let Err(e) = self.catalog.load(settings).await {
            log.warning(format!("Catalog refresh had issues: {e}"));
        }
    }
}

fn find_game(snapshot: &CatalogSnapshot, name: &str) -> Result<ResolvedGame, WorkflowError> {
    snapshot
        .games
        .iter()
        .find(|g| g.name == name)
        .cloned()
        .ok_or_else(|| CatalogError::NotFound(name.to_string()).into())
}

/// The declared executable, or the first conventional candidate present
/// under the install directory.
fn resolve_executable(game: &ResolvedGame) -> Option<String> {
    if !game.executable.is_empty() {
        return Some(game.executable.clone());
    }
    EXECUTABLE_CANDIDATES
        .iter()
        .map(|c| c.to_string())
        .chain(std::iter::once(format!("{}.exe", game.name)))
        .find(|candidate| game.local_path.join(candidate).exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use decksync_catalog::{CatalogFile, CatalogSource, GameDefinition};
    use decksync_settings::SettingsStore;
    use decksync_steam::SteamError;
    use decksync_sync::SyncError;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};

    struct StaticSource {
        file: CatalogFile,
    }

    impl CatalogSource for StaticSource {
        fn fetch(
            &self,
            _settings: &Settings,
        ) -> Pin<Box<dyn Future<Output = Result<(CatalogFile, String), CatalogError>> + Send + '_>>
        {
            let file = self.file.clone();
            Box::pin(async move { Ok((file, "memory".to_string())) })
        }
    }

    /// Installer that always succeeds; install flows that reach it are
    /// covered by precondition tests, not end-to-end transfers.
    struct MockInstaller;

    impl DependencyInstaller for MockInstaller {
        fn install(
            &self,
            _app_id: u32,
            _dependency: &str,
        ) -> Pin<Box<dyn Future<Output = Result<(), SyncError>> + Send + '_>> {
            Box::pin(async move { Ok(()) })
        }
    }

    #[derive(Default)]
    struct MockRegistry {
        registered: Arc<Mutex<Vec<ShortcutEntry>>>,
        unregistered: Arc<Mutex<Vec<u32>>>,
    }

    impl ShortcutRegistry for MockRegistry {
        fn register(
            &self,
            entry: &ShortcutEntry,
        ) -> Pin<Box<dyn Future<Output = Result<(), SteamError>> + Send + '_>> {
            self.registered.lock().unwrap().push(entry.clone());
            Box::pin(async move { Ok(()) })
        }

        fn unregister(
            &self,
            app_id: u32,
        ) -> Pin<Box<dyn Future<Output = Result<(), SteamError>> + Send + '_>> {
            self.unregistered.lock().unwrap().push(app_id);
            Box::pin(async move { Ok(()) })
        }
    }

    fn test_settings(root: &Path) -> SettingsStore {
        let mut store = SettingsStore::open(root.join("settings.json")).unwrap();
        store
            .merge(&serde_json::json!({
                "localGamesPath": root.join("games").to_string_lossy(),
                "saveBackupPath": root.join("saves").to_string_lossy(),
                "proton": {"compatdataPath": root.join("compat").to_string_lossy()},
            }))
            .unwrap();
        store
    }

    fn game(name: &str, app_id: u32, sync_paths: Vec<String>) -> GameDefinition {
        GameDefinition {
            name: name.into(),
            steam_appid: app_id,
            proton_sync_paths: sync_paths,
            ..Default::default()
        }
    }

    struct RegistryHandles {
        registered: Arc<Mutex<Vec<ShortcutEntry>>>,
        unregistered: Arc<Mutex<Vec<u32>>>,
    }

    fn orchestrator(root: &Path, games: Vec<GameDefinition>) -> (Orchestrator, RegistryHandles) {
        let registry = MockRegistry::default();
        let handles = RegistryHandles {
            registered: registry.registered.clone(),
            unregistered: registry.unregistered.clone(),
        };
        let orch = Orchestrator::new(
            test_settings(root),
            Catalog::new(Box::new(StaticSource {
                file: CatalogFile {
                    games,
                    saves_path: String::new(),
                },
            })),
            Box::new(MockInstaller),
            Box::new(registry),
        );
        (orch, handles)
    }

    fn mark_installed(root: &Path, name: &str) {
        std::fs::create_dir_all(root.join("games").join(decksync_paths::slugify(name))).unwrap();
    }

    fn populate_save(root: &Path, app_id: u32, relative_dir: &str) {
        let prefix = root.join("compat").join(app_id.to_string());
        let dir = decksync_paths::user_profile(&prefix).join(relative_dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("slot1.sav"), b"SAVE").unwrap();
    }

    // -----------------------------------------------------------------------
    // install preconditions
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn install_unknown_game_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let (orch, _) = orchestrator(tmp.path(), vec![game("Hades", 1, vec![])]);
        let err = orch.install("Nope").await.unwrap_err();
        assert!(matches!(
            err.kind,
            WorkflowErrorKind::Catalog(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn install_already_installed_is_a_state_error() {
        let tmp = tempfile::tempdir().unwrap();
        mark_installed(tmp.path(), "Hades");
        let (orch, _) = orchestrator(tmp.path(), vec![game("Hades", 1, vec![])]);
        let err = orch.install("Hades").await.unwrap_err();
        assert!(matches!(err.kind, WorkflowErrorKind::State(_)));
        assert!(err.kind.to_string().contains("already installed"));
    }

    #[tokio::test]
    async fn install_without_remote_host_fails_before_touching_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let (orch, _) = orchestrator(tmp.path(), vec![game("Hades", 1, vec![])]);
        let err = orch.install("Hades").await.unwrap_err();
        assert!(matches!(err.kind, WorkflowErrorKind::Configuration(_)));
        assert!(err.steps.is_empty());
        // No local install directory was created.
        assert!(!tmp.path().join("games").join("hades").exists());
    }

    // -----------------------------------------------------------------------
    // remove
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn remove_not_installed_is_a_state_error() {
        let tmp = tempfile::tempdir().unwrap();
        let (orch, registry) = orchestrator(tmp.path(), vec![game("Hades", 1, vec![])]);
        let err = orch.remove("Hades").await.unwrap_err();
        assert!(matches!(err.kind, WorkflowErrorKind::State(_)));
        assert!(err.steps.is_empty());
        assert!(registry.unregistered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_deletes_files_and_unregisters() {
        let tmp = tempfile::tempdir().unwrap();
        mark_installed(tmp.path(), "Hades");
        let prefix = tmp.path().join("compat").join("1145360");
        std::fs::create_dir_all(prefix.join("pfx")).unwrap();

        let (orch, registry) =
            orchestrator(tmp.path(), vec![game("Hades", 1145360, vec![])]);
        let report = orch.remove("Hades").await.unwrap();

        assert!(!tmp.path().join("games").join("hades").exists());
        assert!(!prefix.exists());
        assert_eq!(registry.unregistered.lock().unwrap().as_slice(), &[1145360]);
        // Removal never registers anything.
        assert!(registry.registered.lock().unwrap().is_empty());
        assert!(report.steps.iter().any(|s| s == "Deleted game folder"));
        assert!(report.steps.iter().any(|s| s == "Deleted Proton prefix"));
        // No sync paths configured, so the save backup degraded to a warning.
        assert!(report
            .steps
            .iter()
            .any(|s| s.contains("Save backup had issues")));
    }

    #[tokio::test]
    async fn remove_backs_up_saves_first() {
        let tmp = tempfile::tempdir().unwrap();
        mark_installed(tmp.path(), "Hades");
        populate_save(tmp.path(), 1145360, "Documents/Hades");
        std::fs::create_dir_all(tmp.path().join("compat/1145360/pfx")).unwrap();

        let (orch, _) = orchestrator(
            tmp.path(),
            vec![game(
                "Hades",
                1145360,
                vec!["%USERPROFILE%/Documents/Hades".into()],
            )],
        );
        let report = orch.remove("Hades").await.unwrap();

        assert!(report.steps.iter().any(|s| s == "Backed up saves"));
        let backup = tmp
            .path()
            .join("saves/hades/%USERPROFILE%/Documents/Hades/slot1.sav");
        assert!(backup.exists());
    }

    // -----------------------------------------------------------------------
    // sync_saves / sync_all_saves
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn sync_saves_requires_declared_paths() {
        let tmp = tempfile::tempdir().unwrap();
        mark_installed(tmp.path(), "Hades");
        let (orch, _) = orchestrator(tmp.path(), vec![game("Hades", 1, vec![])]);
        let err = orch.sync_saves("Hades").await.unwrap_err();
        assert!(matches!(err.kind, WorkflowErrorKind::State(_)));
    }

    #[tokio::test]
    async fn sync_all_saves_collects_per_game_failures() {
        let tmp = tempfile::tempdir().unwrap();
        for (name, app_id) in [("Alpha", 10u32), ("Beta", 20), ("Gamma", 30)] {
            mark_installed(tmp.path(), name);
            populate_save(tmp.path(), app_id, "Documents/Data");
        }

        let games = vec![
            game("Alpha", 10, vec!["%USERPROFILE%/Documents/Data".into()]),
            game("Beta", 20, vec!["%USERPROFILE%/Documents/Data".into()]),
            // Gamma declares no sync paths and must fail.
            game("Gamma", 30, vec![]),
        ];
        let (orch, _) = orchestrator(tmp.path(), games);

        let report = orch.sync_all_saves().await.unwrap();
        assert!(!report.ok);
        assert_eq!(report.synced, 2);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].starts_with("Gamma:"));
    }

    #[tokio::test]
    async fn sync_all_saves_skips_uninstalled_games() {
        let tmp = tempfile::tempdir().unwrap();
        mark_installed(tmp.path(), "Alpha");
        populate_save(tmp.path(), 10, "Documents/Data");

        let games = vec![
            game("Alpha", 10, vec!["%USERPROFILE%/Documents/Data".into()]),
            // Never installed; would fail if visited.
            game("Ghost", 99, vec![]),
        ];
        let (orch, _) = orchestrator(tmp.path(), games);

        let report = orch.sync_all_saves().await.unwrap();
        assert!(report.ok);
        assert_eq!(report.synced, 1);
        assert!(report.failures.is_empty());
    }

    // -----------------------------------------------------------------------
    // prefix provisioning via the orchestrator
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn provision_prefix_reports_location() {
        let tmp = tempfile::tempdir().unwrap();
        let (orch, _) = orchestrator(tmp.path(), vec![game("Hades", 1145360, vec![])]);
        let report = orch.provision_prefix(1145360).await.unwrap();
        assert!(report.steps[0].contains("Prepared Proton prefix for Hades"));
        assert!(tmp.path().join("compat/1145360/pfx/drive_c").is_dir());
    }

    #[tokio::test]
    async fn provision_prefix_unknown_app_id() {
        let tmp = tempfile::tempdir().unwrap();
        let (orch, _) = orchestrator(tmp.path(), vec![game("Hades", 1145360, vec![])]);
        let err = orch.provision_prefix(42).await.unwrap_err();
        assert!(matches!(
            err.kind,
            WorkflowErrorKind::Catalog(CatalogError::NotFoundAppId(42))
        ));
    }

    // -----------------------------------------------------------------------
    // executable resolution
    // -----------------------------------------------------------------------

    #[test]
    fn resolve_executable_prefers_declared() {
        let tmp = tempfile::tempdir().unwrap();
        let mut def = game("Hades", 1, vec![]);
        def.executable = "hades.exe".into();
        let settings = test_settings(tmp.path()).get();
        let resolved = decksync_catalog::decorate(&def, &settings);
        assert_eq!(resolve_executable(&resolved).as_deref(), Some("hades.exe"));
    }

    #[test]
    fn resolve_executable_probes_conventions() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = test_settings(tmp.path()).get();
        let def = game("Hades", 1, vec![]);
        let resolved = decksync_catalog::decorate(&def, &settings);

        assert_eq!(resolve_executable(&resolved), None);

        std::fs::create_dir_all(&resolved.local_path).unwrap();
        std::fs::write(resolved.local_path.join("Game.exe"), b"MZ").unwrap();
        assert_eq!(resolve_executable(&resolved).as_deref(), Some("Game.exe"));

        std::fs::write(resolved.local_path.join("game.exe"), b"MZ").unwrap();
        assert_eq!(resolve_executable(&resolved).as_deref(), Some("game.exe"));
    }
}
