// `bootstrap`: makes sure the package manager itself is present. Only
// Homebrew and Chocolatey can be installed this way, the Linux managers ship
// with their distribution.

use super::GlobalOptions;
use crate::log_info;
use crate::package_managers::{self, ManagerKind, platform_candidates};
use crate::system::os_info;
use colored::Colorize;

pub fn run(options: &GlobalOptions) -> anyhow::Result<()> {
    let config = options.load()?;
    let os = os_info::info()?;

    // Detection fails exactly when the manager is missing, so fall back to the
    // platform's first candidate and let it install itself.
    let manager = match config.package_manager {
        Some(kind) => package_managers::from_kind(kind, &os.id),
        None => match package_managers::detect(&os.id) {
            Some(manager) => manager,
            None => {
                let Some(kind) = platform_candidates().first().copied() else {
                    anyhow::bail!("no package manager is known for this platform");
                };
                if !matches!(kind, ManagerKind::Brew | ManagerKind::Choco) {
                    anyhow::bail!(
                        "no supported package manager found and {} cannot be installed automatically",
                        kind
                    );
                }
                package_managers::from_kind(kind, &os.id)
            }
        },
    };

    log_info!("[Bootstrap] Ensuring {} is installed", manager.name().bold());
    manager.ensure_installed()?;
    log_info!("[Bootstrap] {} is ready", manager.name().green());
    Ok(())
}
