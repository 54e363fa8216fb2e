// `install`: works through the missing requirements one at a time.

use super::GlobalOptions;
use crate::libs::elevated_runner::ElevatedRunner;
use crate::libs::install_queue::{InstallEvent, InstallQueue, InstallSummary};
use crate::libs::platform_manager::PlatformManager;
use crate::libs::prompts::TerminalPrompter;
use crate::schemas::config::FailurePolicy;
use crate::{log_error, log_info, log_warn};
use colored::Colorize;

pub fn run(options: &GlobalOptions, assume_yes: bool, keep_going: bool) -> anyhow::Result<()> {
    let config = options.load()?;
    let policy = if keep_going {
        FailurePolicy::Continue
    } else {
        config.on_failure
    };

    let mut manager = PlatformManager::new(&config)?;
    if manager.requirements().is_empty() {
        log_warn!("[Install] None of the required packages is available via {}", manager.package_manager().name());
        return Ok(());
    }
    if manager.all_installed() {
        log_info!("[Install] {}", "All requirements are already installed".green());
        return Ok(());
    }

    let queue = InstallQueue::new(&manager, policy);
    log_info!("[Install] {} package(s) to install", queue.len().to_string().bold());

    let mut prompter = TerminalPrompter::new(assume_yes);
    let mut runner = ElevatedRunner;
    let summary = queue.process(&mut manager, &mut prompter, &mut runner, &mut report)?;

    print_summary(&summary);
    if !summary.failed.is_empty() {
        anyhow::bail!("{} package(s) failed to install", summary.failed.len());
    }
    Ok(())
}

fn report(event: &InstallEvent) {
    match event {
        InstallEvent::Skipped { name } => log_info!("[Install] Skipped {}", name.yellow()),
        InstallEvent::Cancelled { name } => {
            log_warn!("[Install] Installation of {} cancelled", name.yellow())
        }
        InstallEvent::Installed { name, all_installed } => {
            log_info!("[Install] Installed {}", name.green().bold());
            if *all_installed {
                log_info!("[Install] {}", "All requirements are installed".green());
            }
        }
        InstallEvent::Failed { name, error } => {
            log_error!("[Install] Installation of {} failed: {}", name.red().bold(), error)
        }
        InstallEvent::Finished(_) => log_info!("[Install] All packages processed"),
    }
}

fn print_summary(summary: &InstallSummary) {
    let list = |names: &[String]| if names.is_empty() { "-".to_string() } else { names.join(", ") };
    log_info!("[Install] Installed: {}", list(&summary.installed).green());
    log_info!("[Install] Skipped:   {}", list(&summary.skipped).yellow());
    log_info!("[Install] Failed:    {}", list(&summary.failed).red());
}
