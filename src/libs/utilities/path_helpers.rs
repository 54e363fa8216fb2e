// Our custom logging macros.
use crate::{log_debug, log_warn};
use colored::Colorize;
use std::path::PathBuf;

/// Name of the per-user directory holding `config.yaml`.
pub const APP_DIR_NAME: &str = ".uni-project-starter";
/// File name of the configuration inside [`APP_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.yaml";
/// Environment variable that points at an alternative application directory.
pub const APP_DIR_ENV: &str = "UNI_PROJECT_STARTER_HOME";

/// Resolves paths that start with a tilde `~` to the user's home directory.
///
/// Only the first `~` is replaced. When the home directory cannot be
/// determined the path is returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return PathBuf::from(path.replacen('~', &home.to_string_lossy(), 1));
        }
    }
    PathBuf::from(path)
}

/// Returns the application directory, typically `~/.uni-project-starter`.
///
/// `UNI_PROJECT_STARTER_HOME` overrides the location. Without a home
/// directory the current directory is used.
pub fn app_dir() -> PathBuf {
    if let Ok(custom) = std::env::var(APP_DIR_ENV) {
        if !custom.trim().is_empty() {
            let dir = expand_tilde(custom.trim());
            log_debug!("[Paths] Application directory from {}: {}", APP_DIR_ENV, dir.display().to_string().cyan());
            return dir;
        }
    }

    match dirs::home_dir() {
        Some(home) => {
            let dir = home.join(APP_DIR_NAME);
            log_debug!("[Paths] Application directory resolved to: {}", dir.display().to_string().cyan());
            dir
        }
        None => {
            log_warn!("[Paths] Could not determine the home directory, using the current directory");
            PathBuf::from(".").join(APP_DIR_NAME)
        }
    }
}

/// Resolves the configuration file: an explicit `--config` value wins,
/// otherwise `<app_dir>/config.yaml`.
pub fn resolve_config_path(explicit: Option<&str>) -> PathBuf {
    match explicit {
        Some(path) => expand_tilde(path),
        None => app_dir().join(CONFIG_FILE_NAME),
    }
}
