//! # Homebrew Package Manager
//!
//! Probes formulae and casks through `brew info --json=v2 <name>`, which
//! reports both the installable version and the installed versions:
//!
//! ```json
//! {
//!   "formulae": [{ "name": "git", "versions": { "stable": "2.44.0" }, "installed": [{ "version": "2.44.0" }] }],
//!   "casks": []
//! }
//! ```
//!
//! `visual-studio-code` is a cask, everything else in the catalog is a formula;
//! `brew install` handles both. Homebrew refuses to run as root, so install
//! commands run without elevation.

use super::{
    Elevation, ManagerKind, PackageManager, PackageManagerError, Probe, probe_target, run_probe,
};
use crate::schemas::packages::Package;
use crate::{log_info, log_warn};
use colored::Colorize;
use serde::Deserialize;
use std::process::Command;

const INSTALL_SCRIPT: &str =
    "$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)";

/// Top level of `brew info --json=v2`. Exactly one of the lists is filled.
#[derive(Debug, Default, Deserialize)]
pub struct BrewInfo {
    #[serde(default)]
    pub formulae: Vec<Formula>,
    #[serde(default)]
    pub casks: Vec<Cask>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Formula {
    #[serde(default)]
    pub versions: FormulaVersions,
    #[serde(default)]
    pub installed: Vec<InstalledKeg>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FormulaVersions {
    pub stable: Option<String>,
}

/// One installed version of a formula, oldest first.
#[derive(Debug, Default, Deserialize)]
pub struct InstalledKeg {
    pub version: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Cask {
    pub version: Option<String>,
    /// Installed version, `null` when the cask is not installed.
    pub installed: Option<String>,
}

/// Homebrew backend for formulae and casks.
pub struct Homebrew {
    os_id: String,
}

impl Homebrew {
    pub fn new(os_id: String) -> Self {
        Homebrew { os_id }
    }

    fn info(&self, native: &str) -> Result<Option<BrewInfo>, PackageManagerError> {
        let output = run_probe("brew", &["info", "--json=v2", native], &[])?;
        if !output.success {
            return Ok(None);
        }
        parse_info(&output.stdout).map(Some)
    }
}

impl PackageManager for Homebrew {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Brew
    }

    fn package_available(&self, pkg: &Package) -> Result<Probe, PackageManagerError> {
        let Some(native) = probe_target(self.kind(), pkg) else {
            return Ok(Probe::missing());
        };
        Ok(self.info(native)?.map(|info| info.available()).unwrap_or_default())
    }

    fn package_installed(&self, pkg: &Package) -> Result<Probe, PackageManagerError> {
        let Some(native) = probe_target(self.kind(), pkg) else {
            return Ok(Probe::missing());
        };
        Ok(self.info(native)?.map(|info| info.installed()).unwrap_or_default())
    }

    fn install_command(&self, pkg: &Package) -> Option<String> {
        let native = pkg.native_name(self.kind().catalog_key())?;
        Some(format!("brew install {}", native))
    }

    fn elevation(&self) -> Elevation {
        Elevation::None
    }

    /// Runs the official Homebrew install script when `brew` is not usable.
    fn ensure_installed(&self) -> Result<(), PackageManagerError> {
        if Command::new("brew")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            log_info!("[Brew] Homebrew is already installed");
            return Ok(());
        }

        log_warn!(
            "[Brew] Homebrew not found on {}, running the official install script",
            self.os_id.bold()
        );
        let status = Command::new("/bin/bash")
            .args(["-c", INSTALL_SCRIPT])
            .status()
            .map_err(|e| PackageManagerError::Bootstrap {
                manager: "Homebrew".to_string(),
                reason: e.to_string(),
            })?;
        if !status.success() {
            return Err(PackageManagerError::Bootstrap {
                manager: "Homebrew".to_string(),
                reason: format!("install script exited with code {}", status.code().unwrap_or(-1)),
            });
        }
        Ok(())
    }
}

impl BrewInfo {
    fn available(&self) -> Probe {
        if let Some(formula) = self.formulae.first() {
            return Probe::found(formula.versions.stable.clone());
        }
        if let Some(cask) = self.casks.first() {
            return Probe::found(cask.version.clone());
        }
        Probe::missing()
    }

    fn installed(&self) -> Probe {
        if let Some(formula) = self.formulae.first() {
            return match formula.installed.last() {
                Some(keg) => Probe::found(Some(keg.version.clone())),
                None => Probe::missing(),
            };
        }
        match self.casks.first().and_then(|c| c.installed.clone()) {
            Some(version) => Probe::found(Some(version)),
            None => Probe::missing(),
        }
    }
}

pub fn parse_info(output: &str) -> Result<BrewInfo, PackageManagerError> {
    serde_json::from_str(output).map_err(|e| PackageManagerError::Parse {
        command: "brew info --json=v2".to_string(),
        reason: e.to_string(),
    })
}
