//! # APT (Debian, Ubuntu and derivatives)
//!
//! Both checks use `apt list -qq <package>`, which prints one line per
//! matching package:
//!
//! ```text
//! git/jammy-updates,now 1:2.34.1-1ubuntu1.10 amd64 [installed]
//! ```
//!
//! The first field is `<name>/<suites>`, the second the version, and an
//! `[installed...]` marker appears for installed packages. `apt` colors its
//! output on some terminals, so escape sequences are stripped first.

use super::{ManagerKind, PackageManager, PackageManagerError, Probe, probe_target, run_probe};
use crate::schemas::packages::Package;
use crate::log_debug;
use regex::Regex;
use std::sync::LazyLock;

static ESCAPE_SEQUENCES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").expect("escape sequence pattern is valid")
});

/// APT backend. `os_id` only shows up in debug logs.
pub struct Apt {
    os_id: String,
}

impl Apt {
    pub fn new(os_id: String) -> Self {
        Apt { os_id }
    }

    fn list(&self, native: &str) -> Result<String, PackageManagerError> {
        log_debug!("[Apt] Listing '{}' (os: {})", native, self.os_id);
        let output = run_probe("apt", &["list", "-qq", native], &[("LANGUAGE", "en")])?;
        Ok(output.stdout)
    }
}

impl PackageManager for Apt {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Apt
    }

    fn package_available(&self, pkg: &Package) -> Result<Probe, PackageManagerError> {
        let Some(native) = probe_target(self.kind(), pkg) else {
            return Ok(Probe::missing());
        };
        Ok(parse_list_output(native, &self.list(native)?).0)
    }

    fn package_installed(&self, pkg: &Package) -> Result<Probe, PackageManagerError> {
        let Some(native) = probe_target(self.kind(), pkg) else {
            return Ok(Probe::missing());
        };
        Ok(parse_list_output(native, &self.list(native)?).1)
    }

    fn install_command(&self, pkg: &Package) -> Option<String> {
        let native = pkg.native_name(self.kind().catalog_key())?;
        Some(format!("apt install {} -y", native))
    }
}

pub fn remove_escape_sequences(input: &str) -> String {
    ESCAPE_SEQUENCES.replace_all(input, "").into_owned()
}

/// Parses `apt list -qq` output into `(available, installed)` probes.
pub fn parse_list_output(native: &str, output: &str) -> (Probe, Probe) {
    let cleaned = remove_escape_sequences(output);
    let prefix = format!("{}/", native);

    let Some(line) = cleaned.lines().find(|line| line.starts_with(&prefix)) else {
        return (Probe::missing(), Probe::missing());
    };

    let version = line.split_whitespace().nth(1).map(str::to_string);
    let available = Probe::found(version.clone());
    let installed = if line.contains("[installed") {
        Probe::found(version)
    } else {
        Probe::missing()
    };
    (available, installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installed_package_reports_version() {
        let output = "git/jammy-updates,jammy-security,now 1:2.34.1-1ubuntu1.10 amd64 [installed]\n";
        let (available, installed) = parse_list_output("git", output);
        assert!(available.found);
        assert!(installed.found);
        assert_eq!(installed.version.as_deref(), Some("1:2.34.1-1ubuntu1.10"));
    }

    #[test]
    fn automatic_installs_count_as_installed() {
        let output = "podman/jammy 3.4.4+ds1-1ubuntu1 amd64 [installed,automatic]\n";
        assert!(parse_list_output("podman", output).1.found);
    }

    #[test]
    fn available_but_not_installed() {
        let output = "openjdk-17-jdk/jammy-updates 17.0.10+7-1~22.04.1 amd64\n";
        let (available, installed) = parse_list_output("openjdk-17-jdk", output);
        assert!(available.found);
        assert_eq!(available.version.as_deref(), Some("17.0.10+7-1~22.04.1"));
        assert!(!installed.found);
    }

    #[test]
    fn similarly_named_packages_do_not_match() {
        let output = "git-all/jammy 1:2.34.1-1ubuntu1 all\ngit-doc/jammy 1:2.34.1-1ubuntu1 all\n";
        let (available, _) = parse_list_output("git", output);
        assert!(!available.found);
    }

    #[test]
    fn colored_output_is_cleaned() {
        let output = "\x1b[32mcode\x1b[0m/stable 1.87.2-1711626826 amd64\n";
        let (available, _) = parse_list_output("code", output);
        assert!(available.found);
        assert_eq!(available.version.as_deref(), Some("1.87.2-1711626826"));
    }

    #[test]
    fn empty_output_means_unavailable() {
        let (available, installed) = parse_list_output("code", "");
        assert!(!available.found && !installed.found);
    }

    #[test]
    fn install_command_uses_native_name() {
        let apt = Apt::new("ubuntu".to_string());
        let pkg = Package::uniform("vscode").with_native("apt", "code");
        assert_eq!(apt.install_command(&pkg).as_deref(), Some("apt install code -y"));
    }
}
