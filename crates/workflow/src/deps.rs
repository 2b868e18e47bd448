//! Dependency installation collaborator.

use std::future::Future;
use std::pin::Pin;

use decksync_sync::SyncError;
use tracing::debug;

const TOOL: &str = "protontricks";
const HINT: &str = "Install protontricks to enable dependency installation.";

/// Runs the installer for one dependency against a game's prefix.
///
/// Abstract so workflows can be tested without shelling out.
pub trait DependencyInstaller: Send + Sync {
    fn install(
        &self,
        app_id: u32,
        dependency: &str,
    ) -> Pin<Box<dyn Future<Output = Result<(), SyncError>> + Send + '_>>;
}

/// The shipping installer: `protontricks <appid> <dependency>`.
pub struct Protontricks;

impl DependencyInstaller for Protontricks {
    fn install(
        &self,
        app_id: u32,
        dependency: &str,
    ) -> Pin<Box<dyn Future<Output = Result<(), SyncError>> + Send + '_>> {
        let dependency = dependency.to_string();
        Box::pin(async move {
            debug!(app_id, dependency = %dependency, "running protontricks");
            let output = tokio::process::Command::new(TOOL)
                .arg(app_id.to_string())
                .arg(&dependency)
                .output()
                .await
                .map_err(|e| SyncError::from_spawn(TOOL, HINT, e))?;

            if !output.status.success() {
                return Err(SyncError::from_output(TOOL, &output));
            }
            Ok(())
        })
    }
}
