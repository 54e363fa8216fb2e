//! # Host OS Identification
//!
//! Determines the id, name and version of the running operating system.
//! The id is handed to the package managers (NixOS needs special handling)
//! and shown by `check`.
//!
//! - **Linux**: parsed from `/etc/os-release`
//! - **macOS**: read via `sysctl kern.osproductversion` / `kern.osversion`
//! - **Windows**: fixed values, nothing is probed

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OsInfoError {
    #[error("unable to read system information: {0}")]
    Unreadable(String),
    #[error("failed to run sysctl {key}: {reason}")]
    Sysctl { key: String, reason: String },
}

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsInfo {
    /// Lowercase distribution id (`ubuntu`, `fedora`, `nixos`, ...).
    pub id: String,
    pub name: String,
    pub version: String,
}

impl Default for OsInfo {
    fn default() -> Self {
        OsInfo {
            id: UNKNOWN.to_string(),
            name: UNKNOWN.to_string(),
            version: UNKNOWN.to_string(),
        }
    }
}

/// Reads information about the host operating system.
pub fn info() -> Result<OsInfo, OsInfoError> {
    platform_info()
}

#[cfg(target_os = "linux")]
fn platform_info() -> Result<OsInfo, OsInfoError> {
    let content = std::fs::read_to_string("/etc/os-release")
        .map_err(|e| OsInfoError::Unreadable(format!("/etc/os-release: {}", e)))?;
    Ok(parse_os_release(&content))
}

#[cfg(target_os = "macos")]
fn platform_info() -> Result<OsInfo, OsInfoError> {
    Ok(OsInfo {
        id: sysctl_value("kern.osversion")?,
        name: "macOS".to_string(),
        version: sysctl_value("kern.osproductversion")?,
    })
}

#[cfg(target_os = "windows")]
fn platform_info() -> Result<OsInfo, OsInfoError> {
    Ok(OsInfo {
        id: "windows".to_string(),
        name: "Windows".to_string(),
        version: UNKNOWN.to_string(),
    })
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn platform_info() -> Result<OsInfo, OsInfoError> {
    Ok(OsInfo {
        id: std::env::consts::OS.to_string(),
        ..OsInfo::default()
    })
}

#[cfg(target_os = "macos")]
fn sysctl_value(key: &str) -> Result<String, OsInfoError> {
    let output = std::process::Command::new("sysctl")
        .arg(key)
        .output()
        .map_err(|e| OsInfoError::Sysctl {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
    if !output.status.success() {
        return Err(OsInfoError::Sysctl {
            key: key.to_string(),
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(strip_sysctl_key(key, &String::from_utf8_lossy(&output.stdout)))
}

/// Removes the `"<key>: "` prefix sysctl prints in front of the value.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn strip_sysctl_key(key: &str, output: &str) -> String {
    let prefix = format!("{}: ", key);
    output
        .strip_prefix(prefix.as_str())
        .unwrap_or(output)
        .trim()
        .to_string()
}

/// Parses the `KEY=VALUE` lines of an os-release file.
/// Fields that are not present keep the value `Unknown`.
pub fn parse_os_release(content: &str) -> OsInfo {
    let mut result = OsInfo::default();

    for line in content.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"');
        match key.trim() {
            "ID" => result.id = value.to_lowercase(),
            "NAME" => result.name = value.to_string(),
            "VERSION_ID" => result.version = value.to_string(),
            _ => {}
        }
    }
    result
}
