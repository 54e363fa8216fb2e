// `plan`: prints the commands that install the missing dependencies, without
// running any of them.

use super::GlobalOptions;
use crate::libs::platform_manager::PlatformManager;
use crate::log_info;
use crate::package_managers::Elevation;
use crate::schemas::requirements::DependencyList;
use colored::Colorize;

pub fn run(options: &GlobalOptions) -> anyhow::Result<()> {
    let config = options.load()?;
    let manager = PlatformManager::new(&config)?;
    let dependencies = manager.dependencies()?;

    print!("{}", render(&dependencies, manager.package_manager().elevation()));
    log_info!(
        "[Plan] Nothing was installed. Run {} to install the required packages",
        "uni-project-starter install".cyan()
    );
    Ok(())
}

/// Text of the plan: required block, optional block, and a note on sudo.
pub fn render(dependencies: &DependencyList, elevation: Elevation) -> String {
    let required = dependencies.install_all_required_command();
    let optional = dependencies.install_all_optional_command();

    let mut out = String::new();
    if required.is_empty() && optional.is_empty() {
        out.push_str("Nothing to install.\n");
        return out;
    }
    if !required.is_empty() {
        out.push_str("Required:\n");
        out.push_str(&required);
    }
    if !optional.is_empty() {
        out.push_str("Optional:\n");
        out.push_str(&optional);
    }
    if elevation == Elevation::Sudo {
        out.push_str("These commands have to be run with sudo.\n");
    }
    out
}
