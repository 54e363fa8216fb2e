// Chocolatey (Windows).
// With `--limit-output` choco prints one `name|version` pair per line, which
// is used for both the remote search and the local listing. There is no sudo
// on Windows: installs run as the current user and the shell has to be an
// elevated (Administrator) one.

use super::{
    Elevation, ManagerKind, PackageManager, PackageManagerError, Probe, probe_target, run_probe,
};
use crate::schemas::packages::Package;
use crate::{log_info, log_warn};
use std::process::Command;

const BOOTSTRAP: &str = "Set-ExecutionPolicy Bypass -Scope Process -Force; \
[System.Net.ServicePointManager]::SecurityProtocol = \
[System.Net.ServicePointManager]::SecurityProtocol -bor 3072; \
iex ((New-Object System.Net.WebClient).DownloadString('https://community.chocolatey.org/install.ps1'))";

/// Chocolatey backend.
pub struct Chocolatey {
    os_id: String,
}

impl Chocolatey {
    pub fn new(os_id: String) -> Self {
        Chocolatey { os_id }
    }

    fn query(&self, args: &[&str], native: &str) -> Result<Probe, PackageManagerError> {
        let output = run_probe("choco", args, &[])?;
        if !output.success {
            return Ok(Probe::missing());
        }
        Ok(parse_limited_output(native, &output.stdout))
    }
}

impl PackageManager for Chocolatey {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Choco
    }

    fn package_available(&self, pkg: &Package) -> Result<Probe, PackageManagerError> {
        let Some(native) = probe_target(self.kind(), pkg) else {
            return Ok(Probe::missing());
        };
        self.query(&["search", "--exact", "--limit-output", native], native)
    }

    fn package_installed(&self, pkg: &Package) -> Result<Probe, PackageManagerError> {
        let Some(native) = probe_target(self.kind(), pkg) else {
            return Ok(Probe::missing());
        };
        self.query(
            &["list", "--local-only", "--exact", "--limit-output", native],
            native,
        )
    }

    fn install_command(&self, pkg: &Package) -> Option<String> {
        let native = pkg.native_name(self.kind().catalog_key())?;
        Some(format!("choco install {} -y", native))
    }

    fn elevation(&self) -> Elevation {
        Elevation::None
    }

    /// Installs Chocolatey through its PowerShell bootstrap when `choco` is not on PATH.
    fn ensure_installed(&self) -> Result<(), PackageManagerError> {
        if which::which("choco").is_ok() {
            log_info!("[Choco] Chocolatey is already installed");
            return Ok(());
        }

        log_warn!("[Choco] Chocolatey not found on {}, bootstrapping it", self.os_id);
        let status = Command::new("powershell")
            .args(["-NoProfile", "-ExecutionPolicy", "Bypass", "-Command", BOOTSTRAP])
            .status()
            .map_err(|e| PackageManagerError::Bootstrap {
                manager: "Chocolatey".to_string(),
                reason: e.to_string(),
            })?;
        if !status.success() {
            return Err(PackageManagerError::Bootstrap {
                manager: "Chocolatey".to_string(),
                reason: format!("bootstrap exited with code {}", status.code().unwrap_or(-1)),
            });
        }
        Ok(())
    }
}

/// Finds the `name|version` line for `native` (case-insensitive, as choco ids are).
pub fn parse_limited_output(native: &str, output: &str) -> Probe {
    output
        .lines()
        .filter_map(|line| line.trim().split_once('|'))
        .find(|(name, _)| name.eq_ignore_ascii_case(native))
        .map(|(_, version)| Probe::found(Some(version.trim().to_string())))
        .unwrap_or_default()
}
