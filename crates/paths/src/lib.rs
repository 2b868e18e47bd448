//! Path derivation for catalogued games.
//!
//! Everything in this crate is a pure function of its inputs: no probing,
//! no I/O. Given a game definition and the settings document these
//! functions produce every filesystem location the rest of the system
//! needs — local install path, backup path, Proton prefix path, and
//! environment-token-resolved save locations inside a prefix.

use std::path::{Path, PathBuf};

use decksync_settings::Settings;

/// Windows user name Proton provisions inside every prefix.
pub const PREFIX_USER: &str = "steamuser";

/// Derives a filesystem-safe slug from a game name.
///
/// Keeps alphanumerics, collapses every run of other characters into a
/// single hyphen, trims leading/trailing hyphens and lowercases. Names
/// that reduce to nothing fall back to `"game"`. Idempotent.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_hyphen = false;
    for ch in value.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }
    if slug.is_empty() { "game".into() } else { slug }
}

/// Expands a leading `~` against `$HOME`.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        decksync_settings::home_dir().join(rest)
    } else if path == "~" {
        decksync_settings::home_dir()
    } else {
        PathBuf::from(path)
    }
}

/// Local install path for a game: always `localGamesPath/<slug>`.
///
/// The catalog's `path` field is a remote-relative location and plays no
/// part in local placement, so two catalogs naming the same game land it
/// in the same directory.
pub fn local_install_path(settings: &Settings, name: &str) -> PathBuf {
    expand_home(&settings.local_games_path).join(slugify(name))
}

/// Proton prefix path for an app id: `compatdataPath/<appid>`.
pub fn prefix_path(settings: &Settings, app_id: u32) -> PathBuf {
    expand_home(&settings.proton.compatdata_path).join(app_id.to_string())
}

/// Save-backup path for a game: `saveBackupPath/<slug>`.
pub fn backup_path(settings: &Settings, name: &str) -> PathBuf {
    expand_home(&settings.save_backup_path).join(slugify(name))
}

/// The Windows drive root inside a prefix.
pub fn drive_c(prefix: &Path) -> PathBuf {
    prefix.join("pfx").join("drive_c")
}

/// The emulated user-profile directory inside a prefix.
pub fn user_profile(prefix: &Path) -> PathBuf {
    drive_c(prefix).join("users").join(PREFIX_USER)
}

/// Resolves a save-path pattern against a prefix.
///
/// Absolute inputs (including `~` forms) are returned as-is after home
/// expansion. Relative inputs have backslashes normalized and the literal
/// placeholders `%USERPROFILE%`, `%APPDATA%`, `%LOCALAPPDATA%`,
/// `%DOCUMENTS%` and `%DRIVE_C%` substituted with their location under
/// the prefix's drive root. Substitution is plain text replacement done
/// before the result becomes a path; unmatched placeholders stay literal.
pub fn resolve_environment_path(prefix: &Path, relative: &str) -> PathBuf {
    if relative.starts_with('~') || Path::new(relative).is_absolute() {
        return expand_home(relative);
    }

    let cleaned = relative.replace('\\', "/");
    let drive = drive_c(prefix);
    let drive = drive.to_string_lossy();
    let profile = format!("{drive}/users/{PREFIX_USER}");

    let resolved = cleaned
        .replace("%USERPROFILE%", &profile)
        .replace("%APPDATA%", &format!("{profile}/AppData/Roaming"))
        .replace("%LOCALAPPDATA%", &format!("{profile}/AppData/Local"))
        .replace("%DOCUMENTS%", &format!("{profile}/Documents"))
        .replace("%DRIVE_C%", &drive);

    PathBuf::from(resolved)
}

/// Normalizes a save-path pattern into a relative path usable under the
/// backup directory: backslashes become slashes, surrounding whitespace
/// and separators are stripped.
pub fn sanitize_relative(value: &str) -> String {
    value
        .replace('\\', "/")
        .trim()
        .trim_matches('/')
        .to_string()
}
