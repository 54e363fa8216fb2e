//! # Nix (nix-env)
//!
//! Packages are addressed by attribute path (`nixpkgs.git`, or `nixos.git`
//! on NixOS where the channel is called `nixos`). `nix-env --json` prints a
//! map from attribute path to package details:
//!
//! ```json
//! { "nixpkgs.git": { "name": "git-2.44.0", "pname": "git", "version": "2.44.0" } }
//! ```
//!
//! Installs go into the user's profile, so no elevation is needed. On NixOS
//! a tool is often part of the system configuration instead of the profile;
//! in that case the closure of `/run/current-system` is scanned as a fallback.

use super::{
    Elevation, ManagerKind, PackageManager, PackageManagerError, Probe, probe_target, run_probe,
};
use crate::log_debug;
use crate::schemas::packages::Package;
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;

/// Value side of the `nix-env --json` map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NixPackageDetail {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pname: String,
    #[serde(default)]
    pub version: String,
}

/// Nix backend, working on the user's `nix-env` profile.
pub struct Nixpkgs {
    os_id: String,
    /// Details seen by availability probes, keyed by package name. Used to
    /// resolve the pname for installed checks.
    available: RefCell<HashMap<String, NixPackageDetail>>,
}

impl Nixpkgs {
    pub fn new(os_id: String) -> Self {
        Nixpkgs {
            os_id,
            available: RefCell::new(HashMap::new()),
        }
    }

    fn is_nixos(&self) -> bool {
        self.os_id == "nixos"
    }

    fn attribute_path(&self, native: &str) -> String {
        let channel = if self.is_nixos() { "nixos" } else { "nixpkgs" };
        format!("{}.{}", channel, native)
    }

    fn in_system_closure(&self, pname: &str, library: bool) -> Result<bool, PackageManagerError> {
        let output = run_probe(
            "nix-store",
            &["--query", "--requisites", "/run/current-system"],
            &[],
        )?;
        if !output.success {
            return Ok(false);
        }
        Ok(closure_contains(&output.stdout, pname, library))
    }
}

impl PackageManager for Nixpkgs {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Nix
    }

    fn package_available(&self, pkg: &Package) -> Result<Probe, PackageManagerError> {
        let Some(native) = probe_target(self.kind(), pkg) else {
            return Ok(Probe::missing());
        };
        let attribute = self.attribute_path(native);
        let output = run_probe("nix-env", &["--json", "-qaA", &attribute], &[])?;
        if !output.success {
            return Ok(Probe::missing());
        }
        let details = parse_details(&attribute, &output.stdout)?;
        let Some(detail) = details.into_values().next() else {
            return Ok(Probe::missing());
        };
        log_debug!("[Nix] '{}' resolves to {:?}", attribute, detail);

        let version = detail.version.clone();
        self.available
            .borrow_mut()
            .insert(pkg.name.clone(), detail);
        if version.is_empty() {
            Ok(Probe::missing())
        } else {
            Ok(Probe::found(Some(version)))
        }
    }

    fn package_installed(&self, pkg: &Package) -> Result<Probe, PackageManagerError> {
        let Some(native) = probe_target(self.kind(), pkg) else {
            return Ok(Probe::missing());
        };
        let pname = self
            .available
            .borrow()
            .get(&pkg.name)
            .map(|d| d.pname.clone())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| native.to_string());

        let output = run_probe("nix-env", &["--json", "-q"], &[])?;
        if output.success {
            let installed = parse_details("nix-env -q", &output.stdout)?;
            if let Some(detail) = installed.values().find(|d| d.pname == pname) {
                return Ok(Probe::found(Some(detail.version.clone())));
            }
        } else if !self.is_nixos() {
            // No system closure to fall back on.
            return Err(PackageManagerError::Failed {
                command: "nix-env --json -q".to_string(),
                code: output.code.unwrap_or(-1),
                stderr: output.stderr.trim().to_string(),
            });
        }

        if self.is_nixos() && self.in_system_closure(&pname, pkg.library)? {
            log_debug!("[Nix] '{}' found in the system closure", pname);
            return Ok(Probe::found(None));
        }
        Ok(Probe::missing())
    }

    fn install_command(&self, pkg: &Package) -> Option<String> {
        let native = pkg.native_name(self.kind().catalog_key())?;
        Some(format!("nix-env -iA {}", self.attribute_path(native)))
    }

    fn elevation(&self) -> Elevation {
        Elevation::None
    }
}

/// Parses the JSON map printed by `nix-env --json`.
pub fn parse_details(
    command: &str,
    output: &str,
) -> Result<HashMap<String, NixPackageDetail>, PackageManagerError> {
    if output.trim().is_empty() {
        return Ok(HashMap::new());
    }
    serde_json::from_str(output).map_err(|e| PackageManagerError::Parse {
        command: command.to_string(),
        reason: e.to_string(),
    })
}

/// Checks whether a store path of the system closure belongs to `pname`.
/// Store paths look like `/nix/store/<hash>-<pname>-<version>[-<output>]`.
/// Libraries only count when their `dev` output is present.
pub fn closure_contains(output: &str, pname: &str, library: bool) -> bool {
    output
        .lines()
        .filter_map(|path| path.trim().rsplit('/').next())
        .filter_map(|base| base.split_once('-').map(|(_, rest)| rest))
        .filter(|rest| {
            rest.strip_prefix(pname)
                .is_some_and(|tail| tail.is_empty() || tail.starts_with('-'))
        })
        .any(|rest| !library || rest.ends_with("dev"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nix_env_json() {
        let output = r#"{"nixpkgs.git":{"name":"git-2.44.0","pname":"git","version":"2.44.0","system":"x86_64-linux"}}"#;
        let details = parse_details("nix-env", output).unwrap();
        let git = &details["nixpkgs.git"];
        assert_eq!(git.pname, "git");
        assert_eq!(git.version, "2.44.0");
    }

    #[test]
    fn empty_output_is_an_empty_map() {
        assert!(parse_details("nix-env", "  \n").unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse_details("nix-env", "error: attribute missing").unwrap_err();
        assert!(matches!(err, PackageManagerError::Parse { .. }));
    }

    #[test]
    fn closure_matches_exact_pname() {
        let closure = "/nix/store/abc123-git-2.44.0\n/nix/store/def456-gitui-0.26.0\n";
        assert!(closure_contains(closure, "git", false));
        assert!(closure_contains(closure, "gitui", false));
        assert!(!closure_contains(closure, "gi", false));
        assert!(!closure_contains(closure, "podman", false));
    }

    #[test]
    fn libraries_need_dev_output() {
        let closure = "/nix/store/aaa-openssl-3.0.13\n";
        assert!(!closure_contains(closure, "openssl", true));
        let with_dev = "/nix/store/aaa-openssl-3.0.13\n/nix/store/bbb-openssl-3.0.13-dev\n";
        assert!(closure_contains(with_dev, "openssl", true));
    }

    #[test]
    fn attribute_path_depends_on_channel() {
        let nixos = Nixpkgs::new("nixos".to_string());
        let other = Nixpkgs::new("ubuntu".to_string());
        let pkg = Package::uniform("openjdk").with_native("nixpkgs", "jdk17");
        assert_eq!(nixos.install_command(&pkg).as_deref(), Some("nix-env -iA nixos.jdk17"));
        assert_eq!(other.install_command(&pkg).as_deref(), Some("nix-env -iA nixpkgs.jdk17"));
        assert_eq!(other.elevation(), Elevation::None);
    }
}
