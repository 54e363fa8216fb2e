// Records produced by probing the catalog against the host's package manager.

use crate::schemas::packages::Package;

/// A catalog package that the detected package manager can provide,
/// together with its current state on this host.
#[derive(Debug, Clone)]
pub struct SoftwareRequirement {
    pub name: String,
    pub package: Package,
    /// Full command line that installs the package, e.g. `apt install git -y`.
    pub install_command: String,
    pub installed: bool,
    /// Installed version if installed, otherwise the version the repositories offer.
    pub version: Option<String>,
}

/// Overview entry for every catalog package, including those the package
/// manager does not offer.
#[derive(Debug, Clone, Default)]
pub struct Dependency {
    pub name: String,
    /// Native package name, empty when the package is not available.
    pub package_name: String,
    pub installed: bool,
    pub install_command: String,
    pub version: String,
    pub optional: bool,
    /// `true` for tools that are not distributed by the system package manager.
    pub external: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DependencyList(pub Vec<Dependency>);

impl DependencyList {
    /// One `  - <name>: <command>` line per missing required dependency.
    pub fn install_all_required_command(&self) -> String {
        self.install_lines(false)
    }

    /// One `  - <name>: <command>` line per missing optional dependency.
    pub fn install_all_optional_command(&self) -> String {
        self.install_lines(true)
    }

    fn install_lines(&self, optional: bool) -> String {
        self.0
            .iter()
            .filter(|d| !d.installed && d.optional == optional)
            .map(|d| format!("  - {}: {}\n", d.name, d.install_command))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dependency(name: &str, installed: bool, optional: bool) -> Dependency {
        Dependency {
            name: name.to_string(),
            installed,
            optional,
            install_command: format!("apt install {} -y", name),
            ..Default::default()
        }
    }

    #[test]
    fn required_command_lists_only_missing_required() {
        let list = DependencyList(vec![
            dependency("gcc", false, false),
            dependency("git", true, false),
            dependency("gradle", false, true),
            dependency("maven", false, false),
        ]);
        assert_eq!(
            list.install_all_required_command(),
            "  - gcc: apt install gcc -y\n  - maven: apt install maven -y\n"
        );
    }

    #[test]
    fn optional_command_lists_only_missing_optional() {
        let list = DependencyList(vec![
            dependency("gradle", false, true),
            dependency("podman", true, true),
            dependency("git", false, false),
        ]);
        assert_eq!(
            list.install_all_optional_command(),
            "  - gradle: apt install gradle -y\n"
        );
    }

    #[test]
    fn everything_installed_yields_empty_commands() {
        let list = DependencyList(vec![dependency("git", true, false)]);
        assert!(list.install_all_required_command().is_empty());
        assert!(list.install_all_optional_command().is_empty());
    }
}
