// DNF (Fedora, RHEL and derivatives).
// `dnf info <pkg>` succeeds when the repositories know the package,
// `dnf info installed <pkg>` only when it is installed. Both print a
// `Version      : 2.44.0` line.

use super::{ManagerKind, PackageManager, PackageManagerError, Probe, probe_target, run_probe};
use crate::log_debug;
use crate::schemas::packages::Package;

/// DNF backend.
pub struct Dnf {
    os_id: String,
    /// Binary the probes run, `dnf` outside of tests.
    program: String,
}

impl Dnf {
    pub fn new(os_id: String) -> Self {
        Dnf {
            os_id,
            program: "dnf".to_string(),
        }
    }

    #[cfg(test)]
    fn with_program(mut self, program: &str) -> Self {
        self.program = program.to_string();
        self
    }

    fn info(&self, args: &[&str]) -> Result<Probe, PackageManagerError> {
        log_debug!("[Dnf] Querying {:?} (os: {})", args, self.os_id);
        let mut full_args = vec!["info"];
        full_args.extend_from_slice(args);
        let output = run_probe(&self.program, &full_args, &[])?;
        if !output.success {
            return Ok(Probe::missing());
        }
        Ok(Probe::found(parse_version(&output.stdout)))
    }
}

impl PackageManager for Dnf {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Dnf
    }

    fn package_available(&self, pkg: &Package) -> Result<Probe, PackageManagerError> {
        match probe_target(self.kind(), pkg) {
            Some(native) => self.info(&[native]),
            None => Ok(Probe::missing()),
        }
    }

    fn package_installed(&self, pkg: &Package) -> Result<Probe, PackageManagerError> {
        match probe_target(self.kind(), pkg) {
            Some(native) => self.info(&["installed", native]),
            None => Ok(Probe::missing()),
        }
    }

    fn install_command(&self, pkg: &Package) -> Option<String> {
        let native = pkg.native_name(self.kind().catalog_key())?;
        Some(format!("dnf install {} -y", native))
    }
}

/// Extracts the value of the first `Version : x` line of `dnf info` output.
pub fn parse_version(output: &str) -> Option<String> {
    output
        .lines()
        .filter(|line| line.starts_with("Version"))
        .find_map(|line| line.split_once(':'))
        .map(|(_, value)| value.trim().to_string())
}
