//! # Platform Manager
//!
//! The shared core every front-end sits on. On construction it
//!
//! 1. identifies the host OS,
//! 2. finds the package manager (config override, otherwise PATH detection),
//! 3. probes every catalog package and records those the manager can provide
//!    as [`SoftwareRequirement`]s.
//!
//! Afterwards it holds the state the front-ends display: the installed flag of
//! each requirement and whether all of them are installed.

use crate::package_managers::{self, PackageManager, PackageManagerError};
use crate::schemas::config::StarterConfig;
use crate::schemas::packages::{Package, core_requirements, extended_catalog, merge_catalog};
use crate::schemas::requirements::{Dependency, DependencyList, SoftwareRequirement};
use crate::system::os_info::{self, OsInfo, OsInfoError};
use crate::{log_debug, log_info, log_warn};
use colored::Colorize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("could not read operating system information: {0}")]
    OsInfo(#[from] OsInfoError),
    #[error("no supported package manager found")]
    NoPackageManager,
}

pub struct PlatformManager {
    os: OsInfo,
    package_manager: Box<dyn PackageManager>,
    /// Packages probed as requirements.
    catalog: Vec<Package>,
    /// Packages listed by [`Self::dependencies`]: the extended catalog plus
    /// configured packages, whatever `include_extended` says.
    overview: Vec<Package>,
    requirements: Vec<SoftwareRequirement>,
    all_installed: bool,
}

impl PlatformManager {
    /// Inspects the host and probes the catalog selected by `config`.
    pub fn new(config: &StarterConfig) -> Result<Self, PlatformError> {
        let os = os_info::info()?;
        log_info!(
            "[Platform] Running on {} {} ({})",
            os.name.bold(),
            os.version,
            os.id
        );

        let package_manager = match config.package_manager {
            Some(kind) => {
                log_info!("[Platform] Using configured package manager: {}", kind.to_string().bold());
                package_managers::from_kind(kind, &os.id)
            }
            None => package_managers::detect(&os.id).ok_or(PlatformError::NoPackageManager)?,
        };

        Ok(Self::configured(os, package_manager, config))
    }

    /// Selects the catalogs from `config` and probes them with `package_manager`.
    pub fn configured(os: OsInfo, package_manager: Box<dyn PackageManager>, config: &StarterConfig) -> Self {
        let base = if config.include_extended {
            extended_catalog()
        } else {
            core_requirements()
        };
        let catalog = merge_catalog(base, &config.packages);
        let overview = merge_catalog(extended_catalog(), &config.packages);

        Self::with_parts(os, package_manager, catalog, overview)
    }

    /// Builds a manager from already resolved parts and probes `catalog`.
    pub fn with_parts(
        os: OsInfo,
        package_manager: Box<dyn PackageManager>,
        catalog: Vec<Package>,
        overview: Vec<Package>,
    ) -> Self {
        let mut manager = PlatformManager {
            os,
            package_manager,
            catalog,
            overview,
            requirements: Vec::new(),
            all_installed: false,
        };
        manager.init_requirements();
        manager
    }

    /// Probes the catalog. Packages that are unavailable, or whose checks fail,
    /// are logged and left out.
    fn init_requirements(&mut self) {
        let pm = self.package_manager.as_ref();
        let mut requirements = Vec::new();

        for pkg in &self.catalog {
            let available = match pm.package_available(pkg) {
                Ok(probe) if probe.found => probe,
                Ok(_) => {
                    log_warn!("[Platform] Package {} is not available via {}", pkg.name.yellow(), pm.name());
                    continue;
                }
                Err(e) => {
                    log_warn!("[Platform] Package {} is not available: {}", pkg.name.yellow(), e);
                    continue;
                }
            };

            let installed = match pm.package_installed(pkg) {
                Ok(probe) => probe,
                Err(e) => {
                    log_warn!("[Platform] Installed check for {} failed: {}", pkg.name.yellow(), e);
                    continue;
                }
            };

            let Some(install_command) = pm.install_command(pkg) else {
                log_warn!("[Platform] No install command for {} via {}", pkg.name.yellow(), pm.name());
                continue;
            };

            log_debug!(
                "[Platform] {}: installed={} version={:?}",
                pkg.name,
                installed.found,
                installed.version.as_ref().or(available.version.as_ref())
            );

            requirements.push(SoftwareRequirement {
                name: pkg.name.clone(),
                package: pkg.clone(),
                install_command,
                installed: installed.found,
                version: installed.version.or(available.version),
            });
        }

        self.requirements = requirements;
        self.check_all_installed();
    }

    fn check_all_installed(&mut self) {
        self.all_installed = self.requirements.iter().all(|r| r.installed);
    }

    pub fn os(&self) -> &OsInfo {
        &self.os
    }

    pub fn package_manager(&self) -> &dyn PackageManager {
        self.package_manager.as_ref()
    }

    pub fn requirements(&self) -> &[SoftwareRequirement] {
        &self.requirements
    }

    pub fn requirement(&self, name: &str) -> Option<&SoftwareRequirement> {
        self.requirements.iter().find(|r| r.name == name)
    }

    /// `true` when every recorded requirement is installed.
    pub fn all_installed(&self) -> bool {
        self.all_installed
    }

    /// Records a successful install and recomputes [`Self::all_installed`].
    pub fn mark_installed(&mut self, name: &str) {
        if let Some(requirement) = self.requirements.iter_mut().find(|r| r.name == name) {
            requirement.installed = true;
        }
        self.check_all_installed();
    }

    /// Overview of the extended catalog, including packages the manager does
    /// not offer, sorted by name.
    pub fn dependencies(&self) -> Result<DependencyList, PackageManagerError> {
        let pm = self.package_manager.as_ref();
        let mut dependencies = Vec::with_capacity(self.overview.len());

        for pkg in &self.overview {
            let mut dependency = Dependency {
                name: pkg.name.clone(),
                optional: pkg.optional,
                external: !pkg.system_package,
                install_command: pm.install_command(pkg).unwrap_or_default(),
                ..Default::default()
            };

            let available = pm.package_available(pkg)?;
            if available.found {
                dependency.package_name = pkg
                    .native_name(pm.kind().catalog_key())
                    .unwrap_or_default()
                    .to_string();
                dependency.version = available.version.unwrap_or_default();

                let installed = pm.package_installed(pkg)?;
                if installed.found {
                    dependency.installed = true;
                    if let Some(version) = installed.version {
                        dependency.version = version;
                    }
                }
            }
            dependencies.push(dependency);
        }

        dependencies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(DependencyList(dependencies))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::package_managers::{Elevation, ManagerKind, Probe};
    use std::collections::HashSet;

    /// In-memory package manager: knows a set of available and installed packages.
    pub(crate) struct FakeManager {
        available: HashSet<String>,
        installed: HashSet<String>,
        broken: HashSet<String>,
        elevation: Elevation,
    }

    impl FakeManager {
        pub(crate) fn new(available: &[&str], installed: &[&str], elevation: Elevation) -> Self {
            FakeManager {
                available: available.iter().map(|s| s.to_string()).collect(),
                installed: installed.iter().map(|s| s.to_string()).collect(),
                broken: HashSet::new(),
                elevation,
            }
        }

        fn with_broken(mut self, name: &str) -> Self {
            self.broken.insert(name.to_string());
            self
        }
    }

    impl PackageManager for FakeManager {
        fn kind(&self) -> ManagerKind {
            ManagerKind::Apt
        }

        fn package_available(&self, pkg: &Package) -> Result<Probe, PackageManagerError> {
            if self.available.contains(&pkg.name) {
                Ok(Probe::found(Some("1.0".to_string())))
            } else {
                Ok(Probe::missing())
            }
        }

        fn package_installed(&self, pkg: &Package) -> Result<Probe, PackageManagerError> {
            if self.broken.contains(&pkg.name) {
                return Err(PackageManagerError::Parse {
                    command: "fake".to_string(),
                    reason: "broken".to_string(),
                });
            }
            if self.installed.contains(&pkg.name) {
                Ok(Probe::found(Some("0.9".to_string())))
            } else {
                Ok(Probe::missing())
            }
        }

        fn install_command(&self, pkg: &Package) -> Option<String> {
            Some(format!("fake install {}", pkg.name))
        }

        fn elevation(&self) -> Elevation {
            self.elevation
        }
    }

    fn build(fake: FakeManager, catalog: Vec<Package>) -> PlatformManager {
        let overview = catalog.clone();
        PlatformManager::with_parts(OsInfo::default(), Box::new(fake), catalog, overview)
    }

    #[test]
    fn unavailable_packages_are_left_out() {
        let fake = FakeManager::new(&["git", "openjdk"], &["git"], Elevation::Sudo);
        let pm = build(fake, core_requirements());

        let names: Vec<&str> = pm.requirements().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["git", "openjdk"]);
        assert_eq!(pm.requirement("openjdk").unwrap().install_command, "fake install openjdk");
    }

    #[test]
    fn failing_installed_check_drops_the_requirement() {
        let fake = FakeManager::new(&["git", "podman"], &[], Elevation::Sudo).with_broken("podman");
        let pm = build(fake, core_requirements());
        assert!(pm.requirement("podman").is_none());
        assert!(pm.requirement("git").is_some());
    }

    #[test]
    fn installed_version_wins_over_repository_version() {
        let fake = FakeManager::new(&["git", "podman"], &["git"], Elevation::Sudo);
        let pm = build(fake, core_requirements());
        assert_eq!(pm.requirement("git").unwrap().version.as_deref(), Some("0.9"));
        assert_eq!(pm.requirement("podman").unwrap().version.as_deref(), Some("1.0"));
    }

    #[test]
    fn all_installed_tracks_marks() {
        let fake = FakeManager::new(&["git", "podman"], &["git"], Elevation::Sudo);
        let mut pm = build(fake, core_requirements());
        assert!(!pm.all_installed());

        pm.mark_installed("podman");
        assert!(pm.requirement("podman").unwrap().installed);
        assert!(pm.all_installed());
    }

    #[test]
    fn marking_an_unknown_name_changes_nothing() {
        let fake = FakeManager::new(&["git"], &[], Elevation::Sudo);
        let mut pm = build(fake, core_requirements());
        pm.mark_installed("emacs");
        assert!(!pm.all_installed());
    }

    #[test]
    fn dependencies_cover_unavailable_packages() {
        let fake = FakeManager::new(&["git", "maven"], &["git"], Elevation::Sudo);
        let pm = build(fake, extended_catalog());
        let deps = pm.dependencies().unwrap();

        let names: Vec<&str> = deps.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["gcc", "git", "gradle", "maven", "openjdk", "podman", "vscode"]
        );

        let git = deps.iter().find(|d| d.name == "git").unwrap();
        assert!(git.installed);
        assert_eq!(git.version, "0.9");
        assert_eq!(git.package_name, "git");

        let gcc = deps.iter().find(|d| d.name == "gcc").unwrap();
        assert!(!gcc.installed);
        assert!(gcc.package_name.is_empty());

        assert!(deps.install_all_required_command().contains("  - maven: fake install maven\n"));
        assert!(deps.install_all_optional_command().contains("  - gradle: fake install gradle\n"));
    }

    #[test]
    fn default_config_lists_the_extended_catalog_as_dependencies() {
        let fake = FakeManager::new(
            &["git", "openjdk", "podman", "vscode", "maven", "gradle", "gcc"],
            &["git"],
            Elevation::Sudo,
        );
        let pm = PlatformManager::configured(OsInfo::default(), Box::new(fake), &StarterConfig::default());

        let required: Vec<&str> = pm.requirements().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(required, vec!["git", "openjdk", "podman", "vscode"]);

        let deps = pm.dependencies().unwrap();
        let names: Vec<&str> = deps.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["gcc", "git", "gradle", "maven", "openjdk", "podman", "vscode"]
        );
        let optional = deps.install_all_optional_command();
        assert!(optional.contains("  - gradle: fake install gradle\n"));
        assert!(optional.contains("  - podman: fake install podman\n"));
    }

    #[test]
    fn configured_packages_join_the_dependencies() {
        let fake = FakeManager::new(&["git", "htop"], &[], Elevation::Sudo);
        let config = StarterConfig {
            packages: vec![Package::uniform("htop").optional()],
            ..Default::default()
        };
        let pm = PlatformManager::configured(OsInfo::default(), Box::new(fake), &config);

        assert!(pm.requirement("htop").is_some());
        let deps = pm.dependencies().unwrap();
        assert!(deps.iter().any(|d| d.name == "htop" && d.optional));
        assert!(deps.iter().any(|d| d.name == "maven"));
    }
}
