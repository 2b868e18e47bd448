//! Catalog file parsing.
//!
//! Two source formats produce the same [`CatalogFile`]: a JSON document
//! with a top-level `games` list, and a minimal line-oriented list format
//! for hand-maintained catalogs. The rest of the system is indifferent to
//! which was used — this module is the replaceable seam in front of the
//! raw definition sequence.

use crate::types::{CatalogFile, GameDefinition};
use crate::CatalogError;

/// Parses either supported format, sniffing JSON by the leading `{`.
pub fn parse_auto(text: &str) -> Result<CatalogFile, CatalogError> {
    if text.trim_start().starts_with('{') {
        parse_json(text)
    } else {
        parse_list(text)
    }
}

/// Parses the JSON catalog format:
/// `{ "games": [...], "savesPath": "..." }`.
pub fn parse_json(text: &str) -> Result<CatalogFile, CatalogError> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| CatalogError::Parse(format!("invalid JSON in catalog file: {e}")))?;

    if !value.is_object() {
        return Err(CatalogError::Parse(
            "catalog file must contain an object at the root level".into(),
        ));
    }
    if let Some(games) = value.get("games")
        && !games.is_array()
    {
        return Err(CatalogError::Parse(
            "catalog 'games' key must contain a list".into(),
        ));
    }

    serde_json::from_value(value).map_err(|e| CatalogError::Parse(e.to_string()))
}

/// Parses the line-oriented list format.
///
/// `key: value` lines build up a game; a line consisting of `-` (or a
/// blank line) closes the current record. The three list-valued fields
/// take comma-separated values. A `savesPath` line outside any record
/// sets the catalog-wide save location.
pub fn parse_list(text: &str) -> Result<CatalogFile, CatalogError> {
    let mut file = CatalogFile::default();
    let mut current: Option<GameDefinition> = None;

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line == "-" {
            if let Some(def) = current.take() {
                file.games.push(def);
            }
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        let (key, value) = line.split_once(':').ok_or_else(|| {
            CatalogError::Parse(format!("line {}: expected 'key: value'", line_no + 1))
        })?;
        let key = key.trim();
        let value = value.trim();

        if current.is_none() && (key == "savesPath" || key == "saves_path") {
            file.saves_path = value.to_string();
            continue;
        }

        let def = current.get_or_insert_with(GameDefinition::default);
        match key {
            "name" => def.name = value.to_string(),
            "path" => def.path = value.to_string(),
            "remote_path" => def.remote_path = value.to_string(),
            "steam_appid" => {
                def.steam_appid = value.parse().map_err(|_| {
                    CatalogError::Parse(format!("line {}: invalid app id '{value}'", line_no + 1))
                })?;
            }
            "proton_version" => def.proton_version = Some(value.to_string()),
            "proton_dependencies" => def.proton_dependencies = split_list(value),
            "proton_sync_paths" => def.proton_sync_paths = split_list(value),
            "executable" => def.executable = value.to_string(),
            "categories" => def.categories = split_list(value),
            "launch_options" => def.launch_options = value.to_string(),
            other => {
                tracing::warn!(key = other, line = line_no + 1, "unknown catalog key, ignored");
            }
        }
    }
    if let Some(def) = current.take() {
        file.games.push(def);
    }

    if let Some(nameless) = file.games.iter().find(|g| g.name.is_empty()) {
        return Err(CatalogError::Parse(format!(
            "game record without a name (app id {})",
            nameless.steam_appid
        )));
    }

    Ok(file)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
