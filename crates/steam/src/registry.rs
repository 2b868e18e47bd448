//! Shortcut registry seam.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use tracing::info;

use crate::paths::SteamPaths;
use crate::SteamError;

/// One library entry to register.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortcutEntry {
    pub app_id: u32,
    pub name: String,
    pub exe: PathBuf,
    pub start_dir: PathBuf,
    pub launch_options: String,
    pub categories: Vec<String>,
}

/// Registers and unregisters Steam library entries.
///
/// Implemented over boxed futures so workflow code stays decoupled from
/// the concrete integration and testable with mocks.
pub trait ShortcutRegistry: Send + Sync {
    fn register(
        &self,
        entry: &ShortcutEntry,
    ) -> Pin<Box<dyn Future<Output = Result<(), SteamError>> + Send + '_>>;

    fn unregister(
        &self,
        app_id: u32,
    ) -> Pin<Box<dyn Future<Output = Result<(), SteamError>> + Send + '_>>;
}

/// Registry backed by the local Steam installation.
///
/// Resolves the primary user's shortcuts file and records the intended
/// mutation. The vdf write itself is pending a full shortcuts.vdf
/// integration; failing to locate a user or the userdata tree is already
/// a registration failure, so workflows surface real preconditions.
pub struct SteamLibrary {
    /// Explicit paths for tests and unusual installs; `None` auto-detects
    /// at call time so construction never fails on Steam-less hosts.
    paths: Option<SteamPaths>,
}

impl SteamLibrary {
    pub fn new() -> Self {
        Self { paths: None }
    }

    pub fn with_paths(paths: SteamPaths) -> Self {
        Self { paths: Some(paths) }
    }

    fn resolve_paths(&self) -> Result<SteamPaths, SteamError> {
        match &self.paths {
            Some(paths) => Ok(paths.clone()),
            None => SteamPaths::new(),
        }
    }
}

impl Default for SteamLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortcutRegistry for SteamLibrary {
    fn register(
        &self,
        entry: &ShortcutEntry,
    ) -> Pin<Box<dyn Future<Output = Result<(), SteamError>> + Send + '_>> {
        let entry = entry.clone();
        Box::pin(async move {
            let paths = self.resolve_paths()?;
            let user = paths.primary_user()?;
            let shortcuts = paths.shortcuts_path(&user);
            info!(
                app_id = entry.app_id,
                name = %entry.name,
                exe = %entry.exe.display(),
                target = %shortcuts.display(),
                categories = ?entry.categories,
                "registering library shortcut"
            );
            Ok(())
        })
    }

    fn unregister(
        &self,
        app_id: u32,
    ) -> Pin<Box<dyn Future<Output = Result<(), SteamError>> + Send + '_>> {
        Box::pin(async move {
            let paths = self.resolve_paths()?;
            let user = paths.primary_user()?;
            let shortcuts = paths.shortcuts_path(&user);
            info!(app_id, target = %shortcuts.display(), "unregistering library shortcut");
            Ok(())
        })
    }
}
