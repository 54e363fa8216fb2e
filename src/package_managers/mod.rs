//! # Package Managers
//!
//! A thin dispatch layer over the native package managers. Every supported
//! manager implements [`PackageManager`]: it knows how to ask its binary
//! whether a package is available, whether it is installed (and in which
//! version), and which command line installs it.
//!
//! ## Detection
//!
//! [`detect`] walks a fixed, per-platform list of candidate binaries and picks
//! the first one found on `PATH`:
//!
//! - **Linux**: `apt`, `dnf`, `pacman`, `zypper`, `nix-env`
//! - **macOS**: `brew`
//! - **Windows**: `choco`
//!
//! ## Probing conventions
//!
//! - Packages that are not system packages are never probed; they are
//!   reported as neither available nor installed.
//! - A package without a native name for the manager is not available.
//! - A probe command that exits non-zero means "not found". Failing to spawn
//!   the binary at all is a [`PackageManagerError`].

use crate::libs::utilities::command_runner::{CommandOutput, run_capture};
use crate::schemas::packages::Package;
use crate::{log_debug, log_info};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod apt;
pub mod brew;
pub mod choco;
pub mod dnf;
pub mod nixpkgs;
pub mod pacman;
pub mod zypper;

#[derive(Debug, Error)]
pub enum PackageManagerError {
    #[error("failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unexpected output from '{command}': {reason}")]
    Parse { command: String, reason: String },
    #[error("'{command}' failed with exit code {code}: {stderr}")]
    Failed {
        command: String,
        code: i32,
        stderr: String,
    },
    #[error("failed to bootstrap {manager}: {reason}")]
    Bootstrap { manager: String, reason: String },
}

/// The supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ManagerKind {
    Apt,
    Dnf,
    Pacman,
    Zypper,
    Nix,
    Brew,
    Choco,
}

impl ManagerKind {
    /// Key used in [`Package::native_names`].
    pub fn catalog_key(self) -> &'static str {
        match self {
            ManagerKind::Apt => "apt",
            ManagerKind::Dnf => "dnf",
            ManagerKind::Pacman => "pacman",
            ManagerKind::Zypper => "zypper",
            ManagerKind::Nix => "nixpkgs",
            ManagerKind::Brew => "brew",
            ManagerKind::Choco => "choco",
        }
    }

    /// Name of the executable looked up on PATH.
    pub fn binary(self) -> &'static str {
        match self {
            ManagerKind::Apt => "apt",
            ManagerKind::Dnf => "dnf",
            ManagerKind::Pacman => "pacman",
            ManagerKind::Zypper => "zypper",
            ManagerKind::Nix => "nix-env",
            ManagerKind::Brew => "brew",
            ManagerKind::Choco => "choco",
        }
    }
}

impl fmt::Display for ManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.catalog_key())
    }
}

/// Result of an availability or installed check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Probe {
    pub found: bool,
    pub version: Option<String>,
}

impl Probe {
    pub fn missing() -> Self {
        Probe::default()
    }

    pub fn found(version: Option<String>) -> Self {
        Probe {
            found: true,
            version: version.filter(|v| !v.is_empty()),
        }
    }
}

/// How an install command has to be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elevation {
    /// Through `sudo -S`, which needs the user's password.
    Sudo,
    /// As the current user.
    None,
}

/// Interface every native package manager implements.
///
/// Implementations shell out to the manager binary and parse its output. They
/// keep no state across calls apart from caches of earlier probe results.
pub trait PackageManager {
    /// Which manager this is. Also selects the catalog key for native names.
    fn kind(&self) -> ManagerKind;

    /// Short name used in log messages, e.g. `apt` or `nixpkgs`.
    fn name(&self) -> &'static str {
        self.kind().catalog_key()
    }

    /// Checks whether the repositories offer the package. The version is the
    /// one that would be installed.
    fn package_available(&self, pkg: &Package) -> Result<Probe, PackageManagerError>;

    /// Checks whether the package is installed. The version is the installed one.
    fn package_installed(&self, pkg: &Package) -> Result<Probe, PackageManagerError>;

    /// Command line installing the package, or `None` without a native name.
    fn install_command(&self, pkg: &Package) -> Option<String>;

    /// How install commands must run. System package managers need root.
    fn elevation(&self) -> Elevation {
        Elevation::Sudo
    }

    /// Installs the package manager itself if it is missing.
    fn ensure_installed(&self) -> Result<(), PackageManagerError> {
        Ok(())
    }
}

/// Candidate managers for the platform this binary was built for, in probing order.
pub fn platform_candidates() -> &'static [ManagerKind] {
    if cfg!(target_os = "macos") {
        &[ManagerKind::Brew]
    } else if cfg!(target_os = "windows") {
        &[ManagerKind::Choco]
    } else {
        &[
            ManagerKind::Apt,
            ManagerKind::Dnf,
            ManagerKind::Pacman,
            ManagerKind::Zypper,
            ManagerKind::Nix,
        ]
    }
}

/// Returns the first candidate for which `on_path` reports its binary present.
pub fn detect_kind_with<F>(candidates: &[ManagerKind], on_path: F) -> Option<ManagerKind>
where
    F: Fn(&str) -> bool,
{
    candidates.iter().copied().find(|kind| {
        let present = on_path(kind.binary());
        log_debug!(
            "[Package Manager] Probing '{}' on PATH: {}",
            kind.binary(),
            if present { "found".green() } else { "not found".dimmed() }
        );
        present
    })
}

/// Finds the package manager of this host.
pub fn detect(os_id: &str) -> Option<Box<dyn PackageManager>> {
    let kind = detect_kind_with(platform_candidates(), |binary| which::which(binary).is_ok())?;
    log_info!("[Package Manager] Detected package manager: {}", kind.to_string().bold());
    Some(from_kind(kind, os_id))
}

/// Builds the manager for `kind`, regardless of what is on PATH.
pub fn from_kind(kind: ManagerKind, os_id: &str) -> Box<dyn PackageManager> {
    let os_id = os_id.to_string();
    match kind {
        ManagerKind::Apt => Box::new(apt::Apt::new(os_id)),
        ManagerKind::Dnf => Box::new(dnf::Dnf::new(os_id)),
        ManagerKind::Pacman => Box::new(pacman::Pacman::new(os_id)),
        ManagerKind::Zypper => Box::new(zypper::Zypper::new(os_id)),
        ManagerKind::Nix => Box::new(nixpkgs::Nixpkgs::new(os_id)),
        ManagerKind::Brew => Box::new(brew::Homebrew::new(os_id)),
        ManagerKind::Choco => Box::new(choco::Chocolatey::new(os_id)),
    }
}

/// Looks up the native name of `pkg` for `kind`. Returns `None` (and logs why)
/// for non-system packages and packages without a name for this manager.
pub(crate) fn probe_target<'a>(kind: ManagerKind, pkg: &'a Package) -> Option<&'a str> {
    if !pkg.system_package {
        log_debug!(
            "[{}] '{}' is not a system package, skipping probe",
            kind,
            pkg.name
        );
        return None;
    }
    let native = pkg.native_name(kind.catalog_key());
    if native.is_none() {
        log_debug!("[{}] No native package name for '{}'", kind, pkg.name);
    }
    native
}

/// Runs a probe command, turning a spawn failure into [`PackageManagerError::Spawn`].
///
/// A command that runs and exits non-zero is returned as output with
/// `success == false`. Each manager decides what that means, usually "not found".
pub(crate) fn run_probe(
    program: &str,
    args: &[&str],
    envs: &[(&str, &str)],
) -> Result<CommandOutput, PackageManagerError> {
    run_capture(program, args, envs).map_err(|source| PackageManagerError::Spawn {
        command: format!("{} {}", program, args.join(" ")),
        source,
    })
}
