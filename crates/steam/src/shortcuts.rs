//! Shortcut app ids and launch options.

use std::path::Path;

use crc32fast::Hasher;

/// App ids below this are real Steam titles; catalog entries using small
/// ids get a generated non-Steam shortcut id instead.
pub const NON_STEAM_THRESHOLD: u32 = 1_000_000;

/// Generates a Steam shortcut app id from executable path and name.
///
/// Matches Steam's algorithm: `CRC32(exe + name) | 0x80000000 | 0x02000000`.
pub fn generate_app_id(exe: &str, name: &str) -> u32 {
    let key = format!("{exe}{name}");
    let mut hasher = Hasher::new();
    hasher.update(key.as_bytes());
    (hasher.finalize() | 0x80000000) | 0x02000000
}

/// The id a shortcut is registered under: the catalog's id when it is a
/// real Steam app id, otherwise a generated one.
pub fn effective_app_id(catalog_app_id: u32, exe: &str, name: &str) -> u32 {
    if catalog_app_id >= NON_STEAM_THRESHOLD {
        catalog_app_id
    } else {
        generate_app_id(exe, name)
    }
}

/// Builds the launch-option string pointing Proton at the game's prefix,
/// with any catalog-declared options appended.
pub fn compat_launch_options(prefix_path: &Path, extra: &str) -> String {
    let base = format!(
        "STEAM_COMPAT_DATA_PATH={} %command%",
        prefix_path.display()
    );
    if extra.trim().is_empty() {
        base
    } else {
        format!("{base} {}", extra.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_app_id_deterministic() {
        let a = generate_app_id("/games/hades/hades.exe", "Hades");
        let b = generate_app_id("/games/hades/hades.exe", "Hades");
        assert_eq!(a, b);
    }

    #[test]
    fn generate_app_id_high_bits_set() {
        let id = generate_app_id("/bin/x", "X");
        assert_ne!(id & 0x80000000, 0);
        assert_ne!(id & 0x02000000, 0);
    }

    #[test]
    fn effective_app_id_keeps_real_steam_ids() {
        assert_eq!(effective_app_id(1145360, "/x", "Hades"), 1145360);
    }

    #[test]
    fn effective_app_id_generates_for_small_ids() {
        let id = effective_app_id(42, "/games/x/x.exe", "X");
        assert_ne!(id, 42);
        assert_eq!(id, generate_app_id("/games/x/x.exe", "X"));
    }

    #[test]
    fn launch_options_without_extra() {
        let opts = compat_launch_options(Path::new("/compat/42"), "");
        assert_eq!(opts, "STEAM_COMPAT_DATA_PATH=/compat/42 %command%");
    }

    #[test]
    fn launch_options_appends_extra() {
        let opts = compat_launch_options(Path::new("/compat/42"), "-windowed");
        assert_eq!(
            opts,
            "STEAM_COMPAT_DATA_PATH=/compat/42 %command% -windowed"
        );
    }
}
