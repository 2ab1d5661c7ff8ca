//! Locating the mod root, the directory holding `config/` and `db/`.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Environment variable that pins the mod root explicitly.
pub const ROOT_ENV: &str = "GUNSMITH_TWEAKS_ROOT";

/// Config file path relative to the mod root. Its presence marks a mod root.
pub const CONFIG_FILE: &str = "config/config.json";

/// Cached mod root for the current process.
static MOD_ROOT: LazyLock<PathBuf> = LazyLock::new(detect_mod_root);

/// The resolved mod root.
pub fn mod_root() -> &'static Path {
    &MOD_ROOT
}

/// Construct a path relative to the resolved mod root.
pub fn mod_path(relative: impl AsRef<Path>) -> PathBuf {
    MOD_ROOT.join(relative)
}

/// Resolve the most likely mod root directory.
fn detect_mod_root() -> PathBuf {
    if let Some(root) = env::var_os(ROOT_ENV) {
        return PathBuf::from(root);
    }

    // Workspace checkout first, then a flattened `data/`.
    let mut candidates = vec![PathBuf::from("gunsmith_tweaks/data"), PathBuf::from("data")];

    if let Ok(exe_path) = env::current_exe()
        && let Some(dir) = exe_path.parent()
    {
        candidates.push(dir.to_path_buf());
        candidates.push(dir.join("data"));
        if let Some(parent) = dir.parent() {
            candidates.push(parent.join("gunsmith_tweaks/data"));
            candidates.push(parent.join("data"));
        }
    }

    find_mod_root(candidates).unwrap_or_else(|| PathBuf::from("gunsmith_tweaks/data"))
}

/// First candidate that contains a mod config file.
pub fn find_mod_root(candidates: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    candidates
        .into_iter()
        .find(|candidate| candidate.join(CONFIG_FILE).is_file())
}
