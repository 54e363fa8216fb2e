// `generate`: writes a commented default `config.yaml` that a new user can
// adjust.

use super::GlobalOptions;
use crate::libs::config_loading::write_config_template;
use crate::libs::utilities::path_helpers::resolve_config_path;
use crate::log_info;
use colored::Colorize;

/// Default content of `config.yaml`. Every key is optional.
pub const CONFIG_TEMPLATE: &str = r#"# uni-project-starter configuration

# Force a package manager instead of detecting one.
# One of: apt, dnf, pacman, zypper, nix, brew, choco
# package_manager: apt

# Also check the build tooling (maven, gradle, gcc).
include_extended: false

# What `install` does after a failed package: abort | continue
on_failure: abort

# Extra packages, or replacements for built-in ones with the same name.
# Keys of native_names: apt, dnf, pacman, zypper, nixpkgs, brew, choco
packages: []
#  - name: htop
#    optional: true
#    native_names:
#      apt: htop
#      dnf: htop
#      brew: htop
"#;

pub fn run(options: &GlobalOptions, force: bool) -> anyhow::Result<()> {
    let path = resolve_config_path(options.config.as_deref());
    write_config_template(&path, CONFIG_TEMPLATE, force)?;
    log_info!(
        "[Generate] Configuration written to {}",
        path.display().to_string().green()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::config::{FailurePolicy, StarterConfig};

    #[test]
    fn template_parses_to_the_defaults() {
        let config: StarterConfig = serde_yaml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config, StarterConfig::default());
        assert_eq!(config.on_failure, FailurePolicy::Abort);
    }
}
