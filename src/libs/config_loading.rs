use crate::schemas::config::StarterConfig;
use crate::{log_debug, log_info};
use colored::Colorize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}. Please check its YAML syntax")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0} already exists, use --force to overwrite it")]
    AlreadyExists(PathBuf),
}

/// Loads the configuration at `path`.
///
/// A missing file yields the defaults (nothing is required to be configured).
/// An unreadable or malformed file is an error.
pub fn load_config(path: &Path) -> Result<StarterConfig, ConfigError> {
    log_debug!("[Config] Attempting to load configuration from: {}", path.display().to_string().blue());

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log_debug!("[Config] No configuration at {}, using defaults", path.display());
            return Ok(StarterConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    // An empty file deserializes to `null`, treat it like a missing one.
    if contents.trim().is_empty() {
        return Ok(StarterConfig::default());
    }

    let config: StarterConfig = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    log_info!(
        "[Config] Loaded configuration from {}",
        path.display().to_string().green()
    );
    Ok(config)
}

/// Writes `contents` to `path`, creating parent directories. Existing files are
/// only replaced when `force` is set.
pub fn write_config_template(path: &Path, contents: &str, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    fs::write(path, contents).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package_managers::ManagerKind;
    use crate::schemas::config::FailurePolicy;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, StarterConfig::default());
    }

    #[test]
    fn empty_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "\n").unwrap();
        assert_eq!(load_config(&path).unwrap(), StarterConfig::default());
    }

    #[test]
    fn full_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            r#"
package_manager: pacman
include_extended: true
on_failure: continue
packages:
  - name: htop
    native_names:
      pacman: htop
      apt: htop
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.package_manager, Some(ManagerKind::Pacman));
        assert!(config.include_extended);
        assert_eq!(config.on_failure, FailurePolicy::Continue);
        assert_eq!(config.packages.len(), 1);
        assert_eq!(config.packages[0].native_name("pacman"), Some("htop"));
        assert!(config.packages[0].system_package);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "packagemanager: apt\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn template_is_not_overwritten_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        write_config_template(&path, "include_extended: false\n", false).unwrap();
        assert!(matches!(
            write_config_template(&path, "include_extended: true\n", false),
            Err(ConfigError::AlreadyExists(_))
        ));
        write_config_template(&path, "include_extended: true\n", true).unwrap();
        assert!(load_config(&path).unwrap().include_extended);
    }
}
