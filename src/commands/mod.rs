// Register application subcommands.
// Each module corresponds to a specific `uni-project-starter` command-line action.

use crate::libs::config_loading::load_config;
use crate::libs::utilities::path_helpers::resolve_config_path;
use crate::log_debug;
use crate::package_managers::ManagerKind;
use crate::schemas::config::StarterConfig;

// Installs Homebrew or Chocolatey when missing.
pub mod bootstrap;
// Requirement status table and dependency overview.
pub mod check;
// Writes the default configuration file.
pub mod generate;
// Runs the install queue.
pub mod install;
// Prints install commands without running them.
pub mod plan;
// Displays the version.
pub mod version;

/// Options shared by every command that inspects the host.
pub struct GlobalOptions {
    pub config: Option<String>,
    pub manager: Option<ManagerKind>,
}

impl GlobalOptions {
    /// Loads the configuration file and applies command-line overrides.
    pub fn load(&self) -> anyhow::Result<StarterConfig> {
        let path = resolve_config_path(self.config.as_deref());
        let mut config = load_config(&path)?;
        if let Some(kind) = self.manager {
            log_debug!("[Config] Package manager overridden on the command line: {}", kind);
            config.package_manager = Some(kind);
        }
        Ok(config)
    }
}
