//! Proton prefix provisioning.

use std::path::PathBuf;

use decksync_catalog::PREFIX_METADATA;
use decksync_paths as paths;
use decksync_settings::Settings;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Metadata stamp written into every provisioned prefix. Read back only
/// for display, never for control decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixMetadata {
    pub name: String,
    pub proton_version: String,
    pub updated_at: String,
}

/// Result of provisioning: where the prefix lives plus any non-fatal
/// issues hit along the way.
#[derive(Debug)]
pub struct ProvisionOutcome {
    pub prefix_path: PathBuf,
    pub warnings: Vec<String>,
}

/// Creates the prefix directory tree for a game and stamps it.
///
/// Directory creation failures are returned to the caller (fatal there);
/// the compatibility-layer bootstrap and the metadata stamp are
/// best-effort and only produce warnings.
pub async fn provision_prefix(
    settings: &Settings,
    name: &str,
    app_id: u32,
    proton_version: &str,
) -> Result<ProvisionOutcome, std::io::Error> {
    let prefix = paths::prefix_path(settings, app_id);
    let pfx = prefix.join("pfx");
    let profile = paths::user_profile(&prefix);

    for dir in [
        prefix.clone(),
        pfx.clone(),
        paths::drive_c(&prefix),
        profile.join("Documents"),
        profile.join("AppData").join("Local"),
        profile.join("AppData").join("Roaming"),
    ] {
        decksync_fsops::ensure_dir(&dir)?;
    }

    let mut warnings = Vec::new();

    // Best-effort wine bootstrap so the prefix carries a populated
    // registry before first launch.
    match tokio::process::Command::new("wineboot")
        .arg("-u")
        .env("WINEPREFIX", &pfx)
        .output()
        .await
    {
        Ok(output) if !output.status.success() => {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(app_id, error = %stderr, "prefix bootstrap exited non-zero");
            warnings.push(format!("Prefix bootstrap had issues: {stderr}"));
        }
        Err(e) => {
            warn!(app_id, error = %e, "wineboot unavailable, skipping prefix bootstrap");
            warnings.push("Prefix bootstrap skipped: wineboot is not available".into());
        }
        _ => {}
    }

    let stamp = PrefixMetadata {
        name: name.to_string(),
        proton_version: proton_version.to_string(),
        updated_at: crate::now_iso(),
    };
    match serde_json::to_string_pretty(&stamp) {
        Ok(json) => {
            if let Err(e) = std::fs::write(prefix.join(PREFIX_METADATA), json) {
                warn!(app_id, error = %e, "failed to write prefix metadata");
                warnings.push(format!("Prefix metadata not written: {e}"));
            }
        }
        Err(e) => warnings.push(format!("Prefix metadata not written: {e}")),
    }

    Ok(ProvisionOutcome {
        prefix_path: prefix,
        warnings,
    })
}
