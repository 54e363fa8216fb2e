//! # Package Catalog
//!
//! Describes the development tools uni-project-starter knows about and how each
//! of them is called by the different native package managers.
//!
//! A [`Package`] carries a map from a manager's catalog key (`apt`, `dnf`,
//! `pacman`, `zypper`, `nixpkgs`, `brew`, `choco`) to the package name that
//! manager uses. The same tool often has very different names: the JDK is
//! `openjdk-17-jdk` on Debian, `java-17-openjdk-devel` on Fedora and
//! `openjdk@17` on Homebrew.
//!
//! Two catalogs exist:
//! - [`core_requirements`]: the tools a Java web project needs (git, a JDK,
//!   a container engine and an editor). The platform manager checks these.
//! - [`extended_catalog`]: the core tools plus build tooling (maven, gradle,
//!   gcc), used for the dependency overview and when `include_extended` is set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single installable tool together with its native names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Name shown to the user (e.g. `openjdk`).
    pub name: String,

    /// Native package name per manager catalog key.
    #[serde(default)]
    pub native_names: BTreeMap<String, String>,

    /// `false` for tools that are not distributed by the system package
    /// manager. Those are never probed and reported as unavailable.
    #[serde(default = "default_true")]
    pub system_package: bool,

    /// Optional tools are listed separately in the install plan.
    #[serde(default)]
    pub optional: bool,

    /// Library packages need their development output on NixOS.
    #[serde(default)]
    pub library: bool,
}

fn default_true() -> bool {
    true
}

impl Package {
    /// Creates a system package with the same native name for every manager.
    pub fn uniform(name: &str) -> Self {
        let native_names = ALL_MANAGER_KEYS
            .iter()
            .map(|key| (key.to_string(), name.to_string()))
            .collect();
        Package {
            name: name.to_string(),
            native_names,
            system_package: true,
            optional: false,
            library: false,
        }
    }

    /// Overrides the native name used by one manager.
    pub fn with_native(mut self, manager_key: &str, native: &str) -> Self {
        self.native_names
            .insert(manager_key.to_string(), native.to_string());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Returns the package name for the given manager key, if the catalog has one.
    pub fn native_name(&self, manager_key: &str) -> Option<&str> {
        self.native_names
            .get(manager_key)
            .map(String::as_str)
            .filter(|name| !name.trim().is_empty())
    }
}

/// Catalog keys of every supported package manager.
pub const ALL_MANAGER_KEYS: [&str; 7] = ["apt", "dnf", "pacman", "zypper", "nixpkgs", "brew", "choco"];

fn git() -> Package {
    Package::uniform("git")
}

fn openjdk() -> Package {
    Package::uniform("openjdk")
        .with_native("apt", "openjdk-17-jdk")
        .with_native("dnf", "java-17-openjdk-devel")
        .with_native("pacman", "jdk17-openjdk")
        .with_native("zypper", "java-17-openjdk-devel")
        .with_native("nixpkgs", "jdk17")
        .with_native("brew", "openjdk@17")
        .with_native("choco", "openjdk17")
}

fn podman() -> Package {
    Package::uniform("podman")
}

fn vscode() -> Package {
    Package::uniform("vscode")
        .with_native("apt", "code")
        .with_native("dnf", "code")
        .with_native("pacman", "code")
        .with_native("zypper", "code")
        .with_native("nixpkgs", "vscode")
        .with_native("brew", "visual-studio-code")
        .with_native("choco", "vscode")
}

/// The tools every project needs, sorted by name.
pub fn core_requirements() -> Vec<Package> {
    vec![git(), openjdk(), podman(), vscode()]
}

/// Core tools plus build tooling. Podman, vscode and gradle are optional here.
pub fn extended_catalog() -> Vec<Package> {
    let mut packages = vec![
        Package::uniform("gcc")
            .with_native("apt", "build-essential")
            .with_native("choco", "mingw"),
        git(),
        Package::uniform("gradle").optional(),
        Package::uniform("maven"),
        openjdk(),
        podman().optional(),
        vscode().optional(),
    ];
    packages.sort_by(|a, b| a.name.cmp(&b.name));
    packages
}

/// Merges user supplied packages into a catalog. An entry with the same name
/// replaces the built-in one; new names are appended. The result is sorted by name.
pub fn merge_catalog(mut base: Vec<Package>, extra: &[Package]) -> Vec<Package> {
    for package in extra {
        match base.iter_mut().find(|p| p.name == package.name) {
            Some(existing) => *existing = package.clone(),
            None => base.push(package.clone()),
        }
    }
    base.sort_by(|a, b| a.name.cmp(&b.name));
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_requirements_are_the_four_project_tools() {
        let names: Vec<String> = core_requirements().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["git", "openjdk", "podman", "vscode"]);
    }

    #[test]
    fn native_names_differ_per_manager() {
        let jdk = openjdk();
        assert_eq!(jdk.native_name("apt"), Some("openjdk-17-jdk"));
        assert_eq!(jdk.native_name("pacman"), Some("jdk17-openjdk"));
        assert_eq!(jdk.native_name("brew"), Some("openjdk@17"));
        assert_eq!(vscode().native_name("brew"), Some("visual-studio-code"));
        assert_eq!(git().native_name("unknown"), None);
    }

    #[test]
    fn blank_native_name_counts_as_missing() {
        let pkg = Package::uniform("tool").with_native("apt", "  ");
        assert_eq!(pkg.native_name("apt"), None);
        assert_eq!(pkg.native_name("dnf"), Some("tool"));
    }

    #[test]
    fn extended_catalog_is_sorted_and_marks_optional_tools() {
        let catalog = extended_catalog();
        let names: Vec<&str> = catalog.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["gcc", "git", "gradle", "maven", "openjdk", "podman", "vscode"]
        );
        let optional: Vec<&str> = catalog
            .iter()
            .filter(|p| p.optional)
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(optional, vec!["gradle", "podman", "vscode"]);
    }

    #[test]
    fn merge_replaces_existing_and_appends_new_entries() {
        let custom_git = Package::uniform("git").with_native("apt", "git-all");
        let node = Package::uniform("nodejs").optional();
        let merged = merge_catalog(core_requirements(), &[custom_git, node]);

        let names: Vec<&str> = merged.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["git", "nodejs", "openjdk", "podman", "vscode"]);
        assert_eq!(merged[0].native_name("apt"), Some("git-all"));
    }

    #[test]
    fn yaml_entry_defaults_to_system_package() {
        let yaml = "name: nodejs\nnative_names:\n  apt: nodejs\n";
        let pkg: Package = serde_yaml::from_str(yaml).unwrap();
        assert!(pkg.system_package);
        assert!(!pkg.optional);
        assert_eq!(pkg.native_name("apt"), Some("nodejs"));
    }
}
