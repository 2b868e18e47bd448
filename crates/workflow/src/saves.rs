//! Save transfer: backup to the local save store, restore into the
//! prefix, and mirroring against the remote save location.

use std::path::Path;

use decksync_catalog::ResolvedGame;
use decksync_fsops as fsops;
use decksync_paths as paths;
use decksync_settings::Settings;
use decksync_sync::{MirrorJob, Rsync};

use crate::error::{WorkflowError, WorkflowErrorKind};
use crate::types::{StepLog, WorkflowReport};

/// Copies a game's declared save paths out of its prefix into the backup
/// directory, then pushes the backup to the remote save location when
/// one is known.
///
/// Declared paths missing on disk are skipped with a warning; copying
/// nothing at all is fatal and leaves no marker behind. The remote push,
/// unlike the local skips, is fatal when it fails.
pub async fn sync_game_saves(
    settings: &Settings,
    remote_saves_path: &str,
    game: &ResolvedGame,
) -> Result<WorkflowReport, WorkflowError> {
    if game.proton_sync_paths.is_empty() {
        return Err(WorkflowError::state(format!(
            "{} has no sync paths configured",
            game.name
        )));
    }

    let mut log = StepLog::new();
    fsops::ensure_dir(&game.backup_path).map_err(|e| log.fatal(e))?;

    let mut copied = 0usize;
    for relative in &game.proton_sync_paths {
        let resolved = paths::resolve_environment_path(&game.prefix_path, relative);
        if !resolved.exists() {
            log.warning(format!("Save path missing: {relative}"));
            continue;
        }
        let target = game.backup_path.join(paths::sanitize_relative(relative));
        fsops::copy_any(&resolved, &target).map_err(|e| log.fatal(e))?;
        log.done(format!("Copied {relative}"));
        copied += 1;
    }

    if copied == 0 {
        return Err(log.fatal(WorkflowErrorKind::State(format!(
            "no save paths for {} were copied; ensure the prefix exists",
            game.name
        ))));
    }

    fsops::write_marker(&game.backup_path, &crate::now_iso()).map_err(|e| log.fatal(e))?;

    if !settings.remote_host.trim().is_empty() && !remote_saves_path.is_empty() {
        let engine = Rsync::from_settings(settings).map_err(|e| log.fatal(e))?;
        let remote_target = Path::new(remote_saves_path).join(paths::slugify(&game.name));
        engine
            .mirror(&MirrorJob::directory(&remote_target.to_string_lossy(), &game.backup_path).push())
            .await
            .map_err(|e| log.fatal(e))?;
        log.done("Pushed saves to remote");
    }

    let message = format!(
        "Saves for {} copied to {}",
        game.name,
        game.backup_path.display()
    );
    Ok(log.into_report(message))
}

/// Pulls a game's saves from the remote save location into the backup
/// directory, then restores each declared path into the prefix.
///
/// The backup directory is fully derived from the remote here, so it is
/// replaced wholesale before the pull.
pub async fn import_saves(
    engine: &Rsync,
    remote_saves_path: &str,
    game: &ResolvedGame,
) -> Result<(), WorkflowErrorKind> {
    let remote_source = Path::new(remote_saves_path).join(paths::slugify(&game.name));

    fsops::remove_dir_if_exists(&game.backup_path)?;
    fsops::ensure_dir(&game.backup_path)?;
    engine
        .mirror(&MirrorJob::directory(&remote_source.to_string_lossy(), &game.backup_path).pull())
        .await?;

    for relative in &game.proton_sync_paths {
        let source = game.backup_path.join(paths::sanitize_relative(relative));
        if source.exists() {
            let target = paths::resolve_environment_path(&game.prefix_path, relative);
            fsops::copy_any(&source, &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use decksync_catalog::{decorate, GameDefinition};

    fn settings(root: &Path) -> Settings {
        let mut s = Settings::default();
        s.local_games_path = root.join("games").to_string_lossy().into_owned();
        s.save_backup_path = root.join("saves").to_string_lossy().into_owned();
        s.proton.compatdata_path = root.join("compat").to_string_lossy().into_owned();
        s
    }

    fn game_with_saves(root: &Path, sync_paths: Vec<String>) -> ResolvedGame {
        let def = GameDefinition {
            name: "Hades".into(),
            steam_appid: 1145360,
            proton_sync_paths: sync_paths,
            ..Default::default()
        };
        decorate(&def, &settings(root))
    }

    #[tokio::test]
    async fn copies_declared_paths_and_writes_marker() {
        let tmp = tempfile::tempdir().unwrap();
        let s = settings(tmp.path());
        let game = game_with_saves(
            tmp.path(),
            vec!["%USERPROFILE%/Documents/Saved Games/Hades".into()],
        );

        let save_dir = decksync_paths::user_profile(&game.prefix_path)
            .join("Documents/Saved Games/Hades");
        std::fs::create_dir_all(&save_dir).unwrap();
        std::fs::write(save_dir.join("slot1.sav"), b"SAVE").unwrap();

        let report = sync_game_saves(&s, "", &game).await.unwrap();

        let backed_up = game
            .backup_path
            .join("%USERPROFILE%/Documents/Saved Games/Hades")
            .join("slot1.sav");
        assert!(backed_up.exists());
        assert!(decksync_fsops::read_marker(&game.backup_path).is_some());
        assert!(report.steps.iter().any(|s| s.starts_with("Copied")));
    }

    #[tokio::test]
    async fn all_paths_missing_is_fatal_and_leaves_no_marker() {
        let tmp = tempfile::tempdir().unwrap();
        let s = settings(tmp.path());
        let game = game_with_saves(tmp.path(), vec!["%APPDATA%/Hades".into()]);

        let err = sync_game_saves(&s, "", &game).await.unwrap_err();
        assert!(matches!(err.kind, WorkflowErrorKind::State(_)));
        assert!(err.kind.to_string().contains("were copied"));
        assert!(decksync_fsops::read_marker(&game.backup_path).is_none());
        // The skip made it into the diagnostic log.
        assert!(err.steps.iter().any(|s| s.contains("missing")));
    }

    #[tokio::test]
    async fn no_sync_paths_is_a_state_error() {
        let tmp = tempfile::tempdir().unwrap();
        let s = settings(tmp.path());
        let game = game_with_saves(tmp.path(), Vec::new());

        let err = sync_game_saves(&s, "", &game).await.unwrap_err();
        assert!(matches!(err.kind, WorkflowErrorKind::State(_)));
        assert!(err.kind.to_string().contains("no sync paths"));
    }

    #[tokio::test]
    async fn partial_copy_succeeds_with_warning() {
        let tmp = tempfile::tempdir().unwrap();
        let s = settings(tmp.path());
        let game = game_with_saves(
            tmp.path(),
            vec![
                "%USERPROFILE%/Documents/Hades".into(),
                "%APPDATA%/HadesCloud".into(),
            ],
        );

        let present = decksync_paths::user_profile(&game.prefix_path).join("Documents/Hades");
        std::fs::create_dir_all(&present).unwrap();
        std::fs::write(present.join("run.sav"), b"X").unwrap();

        let report = sync_game_saves(&s, "", &game).await.unwrap();
        assert!(report.steps.iter().any(|s| s.contains("missing")));
        assert!(report
            .steps
            .iter()
            .any(|s| s.contains("Copied %USERPROFILE%/Documents/Hades")));
    }
}
