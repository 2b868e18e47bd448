//! Catalog source collaborator.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use decksync_settings::Settings;
use decksync_sync::{MirrorJob, Rsync};
use tracing::debug;

use crate::parse;
use crate::types::CatalogFile;
use crate::CatalogError;

/// Produces the raw catalog for a load.
///
/// The shipping implementation fetches from the remote host; tests supply
/// in-memory catalogs. Returns the parsed file plus a human-readable
/// description of where it came from.
pub trait CatalogSource: Send + Sync {
    fn fetch(
        &self,
        settings: &Settings,
    ) -> Pin<Box<dyn Future<Output = Result<(CatalogFile, String), CatalogError>> + Send + '_>>;
}

/// Fetches the catalog file from the remote host into the local data
/// directory, then parses it.
pub struct RemoteCatalogSource {
    data_dir: PathBuf,
}

impl RemoteCatalogSource {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Local cache path the remote file lands at: the remote file's base
    /// name under the data directory.
    fn cache_path(&self, remote_config_path: &str) -> PathBuf {
        let file_name = std::path::Path::new(remote_config_path)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "games.json".into());
        self.data_dir.join(file_name)
    }
}

impl CatalogSource for RemoteCatalogSource {
    fn fetch(
        &self,
        settings: &Settings,
    ) -> Pin<Box<dyn Future<Output = Result<(CatalogFile, String), CatalogError>> + Send + '_>>
    {
        let settings = settings.clone();
        Box::pin(async move {
            let remote_config = settings.remote_config_path.trim().to_string();
            if !settings.remote_available() {
                return Err(CatalogError::Configuration(
                    "remote host and catalog path must be configured".into(),
                ));
            }

            std::fs::create_dir_all(&self.data_dir)?;
            let engine = Rsync::from_settings(&settings)?;
            engine
                .mirror(&MirrorJob::single_file(&remote_config, &self.data_dir).pull())
                .await?;

            let cached = self.cache_path(&remote_config);
            debug!(path = %cached.display(), "catalog fetched");
            let text = tokio::fs::read_to_string(&cached).await?;
            let file = parse::parse_auto(&text)?;
            Ok((file, cached.display().to_string()))
        })
    }
}
