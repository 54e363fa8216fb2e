// zypper (openSUSE, SLES).
// `zypper info <pkg>` answers both questions at once: the block starts with
// `Information for package <pkg>:` when the package exists, and contains an
// `Installed : Yes` line when it is installed. The output is localized, so the
// probe forces an English locale.

use super::{ManagerKind, PackageManager, PackageManagerError, Probe, probe_target, run_probe};
use crate::log_debug;
use crate::schemas::packages::Package;
use regex::Regex;
use std::sync::LazyLock;

static VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Version\s*:(.*)$").expect("version pattern is valid"));
static INSTALLED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Installed\s*:\s*Yes\s*$").expect("installed pattern is valid"));

const ENGLISH: [(&str, &str); 2] = [("LANGUAGE", "en_US.UTF-8"), ("LC_ALL", "en_US.UTF-8")];

/// zypper backend. Probes force an English locale, since the parsers match
/// the English field names.
pub struct Zypper {
    os_id: String,
}

impl Zypper {
    pub fn new(os_id: String) -> Self {
        Zypper { os_id }
    }

    fn info(&self, native: &str) -> Result<Option<String>, PackageManagerError> {
        log_debug!("[Zypper] Info for '{}' (os: {})", native, self.os_id);
        let output = run_probe("zypper", &["info", native], &ENGLISH)?;
        Ok(output.success.then_some(output.stdout))
    }
}

impl PackageManager for Zypper {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Zypper
    }

    fn package_available(&self, pkg: &Package) -> Result<Probe, PackageManagerError> {
        let Some(native) = probe_target(self.kind(), pkg) else {
            return Ok(Probe::missing());
        };
        Ok(match self.info(native)? {
            Some(output) => parse_info(&output).0,
            None => Probe::missing(),
        })
    }

    fn package_installed(&self, pkg: &Package) -> Result<Probe, PackageManagerError> {
        let Some(native) = probe_target(self.kind(), pkg) else {
            return Ok(Probe::missing());
        };
        Ok(match self.info(native)? {
            Some(output) => parse_info(&output).1,
            None => Probe::missing(),
        })
    }

    fn install_command(&self, pkg: &Package) -> Option<String> {
        let native = pkg.native_name(self.kind().catalog_key())?;
        Some(format!("zypper in -y {}", native))
    }
}

/// Parses `zypper info` output into `(available, installed)` probes.
pub fn parse_info(output: &str) -> (Probe, Probe) {
    if !output.contains("Information for package") {
        return (Probe::missing(), Probe::missing());
    }
    let version = VERSION
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string());

    let installed = if INSTALLED.is_match(output) {
        Probe::found(version.clone())
    } else {
        Probe::missing()
    };
    (Probe::found(version), installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSTALLED_GIT: &str = "Loading repository data...\n\
Reading installed packages...\n\
\n\
Information for package git:\n\
----------------------------\n\
Repository     : Main Repository (OSS)\n\
Name           : git\n\
Version        : 2.43.0-1.1\n\
Arch           : x86_64\n\
Installed Size : 40.4 KiB\n\
Installed      : Yes\n\
Status         : up-to-date\n";

    #[test]
    fn installed_package() {
        let (available, installed) = parse_info(INSTALLED_GIT);
        assert!(available.found);
        assert!(installed.found);
        assert_eq!(installed.version.as_deref(), Some("2.43.0-1.1"));
    }

    #[test]
    fn installed_size_line_is_not_an_installed_flag() {
        let output = INSTALLED_GIT.replace("Installed      : Yes", "Installed      : No");
        let (available, installed) = parse_info(&output);
        assert!(available.found);
        assert!(!installed.found);
    }

    #[test]
    fn unknown_package() {
        let output = "Loading repository data...\nReading installed packages...\n\npackage 'nope' not found.\n";
        let (available, installed) = parse_info(output);
        assert!(!available.found && !installed.found);
    }

    #[test]
    fn install_command() {
        let zypper = Zypper::new("opensuse-tumbleweed".to_string());
        let pkg = Package::uniform("openjdk").with_native("zypper", "java-17-openjdk-devel");
        assert_eq!(
            zypper.install_command(&pkg).as_deref(),
            Some("zypper in -y java-17-openjdk-devel")
        );
    }
}
