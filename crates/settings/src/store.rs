//! On-disk settings store with atomic-replace semantics.

use std::path::PathBuf;

use serde_json::Value;

use crate::merge::deep_merge;
use crate::types::Settings;
use crate::SettingsError;

/// Holds the settings document in memory and mirrors it to disk.
///
/// The document is the source of truth; [`SettingsStore::get`] projects it
/// onto the typed [`Settings`] view. Writes go through
/// [`SettingsStore::merge`] only, which replaces the whole document.
pub struct SettingsStore {
    path: PathBuf,
    document: Value,
}

impl SettingsStore {
    /// Opens the store at the default location
    /// (`~/.local/share/decksync/settings.json`).
    pub fn open_default() -> Result<Self, SettingsError> {
        Self::open(crate::data_dir().join("settings.json"))
    }

    /// Opens the store at `path`.
    ///
    /// If no document exists yet, the built-in defaults are persisted
    /// verbatim. Otherwise the stored document is merged over the defaults
    /// (so fields added in newer releases pick up their default) and the
    /// merged result is written back.
    pub fn open(path: PathBuf) -> Result<Self, SettingsError> {
        let defaults = serde_json::to_value(Settings::default())?;

        let document = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<Value>(&content) {
                Ok(stored) => deep_merge(&defaults, &stored),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to parse settings, using defaults"
                    );
                    defaults
                }
            }
        } else {
            defaults
        };

        let store = Self { path, document };
        store.persist()?;
        Ok(store)
    }

    /// Returns the raw settings document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Returns the typed view of the current document.
    ///
    /// Unknown keys are ignored; a document that no longer matches the
    /// schema falls back to defaults with a warning rather than failing.
    pub fn get(&self) -> Settings {
        serde_json::from_value(self.document.clone()).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "settings document has invalid shape, using defaults");
            Settings::default()
        })
    }

    /// Deep-merges `partial` into the document, persists, and returns the
    /// new typed view.
    pub fn merge(&mut self, partial: &Value) -> Result<Settings, SettingsError> {
        self.document = deep_merge(&self.document, partial);
        self.persist()?;
        tracing::info!("settings saved");
        Ok(self.get())
    }

    fn persist(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.document)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
