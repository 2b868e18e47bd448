//! Catalog service: load, cache, lookup.

use std::sync::Arc;

use decksync_settings::Settings;
use tokio::sync::RwLock;
use tracing::info;

use crate::decorate::decorate;
use crate::source::CatalogSource;
use crate::types::ResolvedGame;
use crate::CatalogError;

/// One complete decorated catalog. Snapshots are immutable; a refresh
/// produces a new one.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub games: Vec<ResolvedGame>,
    /// Remote save location declared by the catalog file, if any.
    pub saves_path: String,
    /// Where the catalog was read from.
    pub source: String,
    pub refreshed_at: String,
}

/// The catalog service.
///
/// The cached snapshot is the only shared mutable state in the system:
/// a single writer replaces it wholesale after a successful load, so
/// readers always see either the old or the new complete snapshot.
pub struct Catalog {
    source: Box<dyn CatalogSource>,
    cache: RwLock<Option<Arc<CatalogSnapshot>>>,
}

impl Catalog {
    pub fn new(source: Box<dyn CatalogSource>) -> Self {
        Self {
            source,
            cache: RwLock::new(None),
        }
    }

    /// Fetches, parses and decorates the catalog, replacing the cached
    /// snapshot atomically.
    pub async fn load(&self, settings: &Settings) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        let (file, source) = self.source.fetch(settings).await?;

        let games: Vec<ResolvedGame> = file
            .games
            .iter()
            .map(|def| decorate(def, settings))
            .collect();

        let snapshot = Arc::new(CatalogSnapshot {
            games,
            saves_path: file.saves_path,
            source,
            refreshed_at: crate::now_iso(),
        });

        *self.cache.write().await = Some(snapshot.clone());
        info!(games = snapshot.games.len(), source = %snapshot.source, "catalog loaded");
        Ok(snapshot)
    }

    /// Returns the cached snapshot, loading first if the cache is empty.
    pub async fn snapshot(&self, settings: &Settings) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        if let Some(snapshot) = self.cache.read().await.clone() {
            return Ok(snapshot);
        }
        self.load(settings).await
    }

    /// Looks a game up by name, loading the catalog if needed.
    pub async fn find_by_name(
        &self,
        settings: &Settings,
        name: &str,
    ) -> Result<ResolvedGame, CatalogError> {
        let snapshot = self.snapshot(settings).await?;
        snapshot
            .games
            .iter()
            .find(|g| g.name == name)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    /// Looks a game up by platform app id, loading the catalog if needed.
    pub async fn find_by_app_id(
        &self,
        settings: &Settings,
        app_id: u32,
    ) -> Result<ResolvedGame, CatalogError> {
        let snapshot = self.snapshot(settings).await?;
        snapshot
            .games
            .iter()
            .find(|g| g.steam_appid == app_id)
            .cloned()
            .ok_or(CatalogError::NotFoundAppId(app_id))
    }
}
