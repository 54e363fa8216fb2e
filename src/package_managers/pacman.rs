// pacman (Arch Linux and derivatives).
// `pacman -Si` queries the sync databases, `pacman -Q` the local one.
// Both exit non-zero for unknown packages.

use super::{ManagerKind, PackageManager, PackageManagerError, Probe, probe_target, run_probe};
use crate::log_debug;
use crate::schemas::packages::Package;
use regex::Regex;
use std::sync::LazyLock;

static SYNC_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Version\s*:\s+(.*)$").expect("version pattern is valid"));

/// pacman backend. Installs use `--noconfirm` so they never wait on a prompt.
pub struct Pacman {
    os_id: String,
}

impl Pacman {
    pub fn new(os_id: String) -> Self {
        Pacman { os_id }
    }
}

impl PackageManager for Pacman {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Pacman
    }

    fn package_available(&self, pkg: &Package) -> Result<Probe, PackageManagerError> {
        let Some(native) = probe_target(self.kind(), pkg) else {
            return Ok(Probe::missing());
        };
        log_debug!("[Pacman] Sync info for '{}' (os: {})", native, self.os_id);
        let output = run_probe("pacman", &["-Si", native], &[])?;
        if !output.success {
            return Ok(Probe::missing());
        }
        Ok(Probe::found(parse_sync_version(&output.stdout)))
    }

    fn package_installed(&self, pkg: &Package) -> Result<Probe, PackageManagerError> {
        let Some(native) = probe_target(self.kind(), pkg) else {
            return Ok(Probe::missing());
        };
        let output = run_probe("pacman", &["-Q", native], &[])?;
        if !output.success {
            return Ok(Probe::missing());
        }
        Ok(Probe::found(parse_query_version(native, &output.stdout)))
    }

    fn install_command(&self, pkg: &Package) -> Option<String> {
        let native = pkg.native_name(self.kind().catalog_key())?;
        Some(format!("pacman -S {} --noconfirm", native))
    }
}

/// Version from `pacman -Si` output.
pub fn parse_sync_version(output: &str) -> Option<String> {
    SYNC_VERSION
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Version from `pacman -Q` output, e.g. `git 2.44.0-1`.
pub fn parse_query_version(native: &str, output: &str) -> Option<String> {
    output
        .lines()
        .find(|line| line.split_whitespace().next() == Some(native))
        .and_then(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_info_version() {
        let output = "Repository      : extra\n\
Name            : jdk17-openjdk\n\
Version         : 17.0.10.u7-1\n\
Description     : OpenJDK Java 17 development kit\n";
        assert_eq!(parse_sync_version(output).as_deref(), Some("17.0.10.u7-1"));
    }

    #[test]
    fn sync_info_without_version() {
        assert_eq!(parse_sync_version("error: package 'nope' was not found\n"), None);
    }

    #[test]
    fn local_query_version() {
        assert_eq!(
            parse_query_version("git", "git 2.44.0-1\n").as_deref(),
            Some("2.44.0-1")
        );
        assert_eq!(parse_query_version("git", "git-lfs 3.5.1-1\n"), None);
    }

    #[test]
    fn install_command() {
        let pacman = Pacman::new("arch".to_string());
        assert_eq!(
            pacman.install_command(&Package::uniform("podman")).as_deref(),
            Some("pacman -S podman --noconfirm")
        );
    }
}
