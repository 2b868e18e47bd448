//! Steam library integration seam.
//!
//! The orchestrator only needs "register/unregister an executable as a
//! library entry with launch options and categories". That contract is
//! the [`ShortcutRegistry`] trait; [`SteamLibrary`] is the shipping
//! implementation, which resolves the target user's shortcuts file and
//! records the mutation. The shortcuts.vdf wire format itself is out of
//! scope here — the trait is the seam a full writer plugs into.

mod paths;
mod registry;
mod shortcuts;

pub use paths::SteamPaths;
pub use registry::{ShortcutEntry, ShortcutRegistry, SteamLibrary};
pub use shortcuts::{compat_launch_options, effective_app_id, generate_app_id};

/// Errors produced by Steam integration.
#[derive(Debug, thiserror::Error)]
pub enum SteamError {
    #[error("steam userdata directory not found")]
    NotFound,

    #[error("I/O error: {0}")]
    Io(String),

    #[error("shortcut registration failed: {0}")]
    Registration(String),
}
