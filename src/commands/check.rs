// `check`: shows what the detected package manager can provide and what is
// already installed.

use super::GlobalOptions;
use crate::libs::platform_manager::PlatformManager;
use crate::schemas::requirements::{DependencyList, SoftwareRequirement};
use crate::{log_info, log_warn};
use colored::Colorize;
use prettytable::{Cell, Row, Table, format};

pub fn run(options: &GlobalOptions, all: bool) -> anyhow::Result<()> {
    let config = options.load()?;
    let manager = PlatformManager::new(&config)?;

    log_info!(
        "[Check] {} {}, package manager: {}",
        manager.os().name,
        manager.os().version,
        manager.package_manager().name().bold()
    );

    if all {
        let dependencies = manager.dependencies()?;
        if dependencies.is_empty() {
            log_warn!("[Check] The package catalog is empty");
            return Ok(());
        }
        dependency_table(&dependencies).printstd();
        return Ok(());
    }

    if manager.requirements().is_empty() {
        log_warn!("[Check] None of the required packages is available via {}", manager.package_manager().name());
        return Ok(());
    }

    requirement_table(manager.requirements()).printstd();
    if manager.all_installed() {
        log_info!("[Check] {}", "All requirements are installed".green());
    } else {
        log_info!(
            "[Check] Run {} to install the missing packages",
            "uni-project-starter install".cyan()
        );
    }
    Ok(())
}

fn status_cell(installed: bool) -> Cell {
    if installed {
        Cell::new("installed").style_spec("Fg")
    } else {
        Cell::new("missing").style_spec("Fr")
    }
}

fn requirement_table(requirements: &[SoftwareRequirement]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(vec![
        Cell::new("Package").style_spec("b"),
        Cell::new("Status").style_spec("b"),
        Cell::new("Version").style_spec("b"),
        Cell::new("Install command").style_spec("b"),
    ]));

    for requirement in requirements {
        table.add_row(Row::new(vec![
            Cell::new(&requirement.name),
            status_cell(requirement.installed),
            Cell::new(requirement.version.as_deref().unwrap_or("-")),
            Cell::new(&requirement.install_command),
        ]));
    }
    table
}

fn dependency_table(dependencies: &DependencyList) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(vec![
        Cell::new("Dependency").style_spec("b"),
        Cell::new("Native name").style_spec("b"),
        Cell::new("Status").style_spec("b"),
        Cell::new("Version").style_spec("b"),
        Cell::new("Optional").style_spec("b"),
    ]));

    for dependency in dependencies.iter() {
        let status = if dependency.external {
            Cell::new("external").style_spec("Fy")
        } else if dependency.package_name.is_empty() {
            Cell::new("unavailable").style_spec("Fy")
        } else {
            status_cell(dependency.installed)
        };
        table.add_row(Row::new(vec![
            Cell::new(&dependency.name),
            Cell::new(if dependency.package_name.is_empty() { "-" } else { dependency.package_name.as_str() }),
            status,
            Cell::new(if dependency.version.is_empty() { "-" } else { dependency.version.as_str() }),
            Cell::new(if dependency.optional { "yes" } else { "no" }),
        ]));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::packages::Package;
    use crate::schemas::requirements::Dependency;

    #[test]
    fn requirement_rows_show_placeholder_version() {
        let requirements = vec![SoftwareRequirement {
            name: "podman".to_string(),
            package: Package::uniform("podman"),
            install_command: "apt install podman -y".to_string(),
            installed: false,
            version: None,
        }];
        let table = requirement_table(&requirements);
        assert_eq!(table.len(), 1);
        let rendered = table.to_string();
        assert!(rendered.contains("podman"));
        assert!(rendered.contains("missing"));
        assert!(rendered.contains("apt install podman -y"));
    }

    #[test]
    fn unavailable_dependencies_are_marked() {
        let dependencies = DependencyList(vec![
            Dependency {
                name: "gcc".to_string(),
                ..Default::default()
            },
            Dependency {
                name: "git".to_string(),
                package_name: "git".to_string(),
                installed: true,
                version: "2.43.0".to_string(),
                ..Default::default()
            },
        ]);
        let rendered = dependency_table(&dependencies).to_string();
        assert!(rendered.contains("unavailable"));
        assert!(rendered.contains("2.43.0"));
    }
}
