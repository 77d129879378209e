// Cache path utilities.
// Locates the platform cache directory for persisted dashboard data.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/octobar on Linux,
/// ~/Library/Caches/octobar on macOS).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "octobar").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the platform config directory, used for the preferences file.
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "octobar").map(|dirs| dirs.config_dir().to_path_buf())
}
