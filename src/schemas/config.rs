// Schema of the optional `config.yaml` file.

use crate::package_managers::ManagerKind;
use crate::schemas::packages::Package;
use serde::{Deserialize, Serialize};

/// What the install queue does after a package failed to install.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failure and report it.
    #[default]
    Abort,
    /// Report the failure and move on to the next package.
    Continue,
}

/// Top-level configuration. Every field is optional in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StarterConfig {
    /// Force a package manager instead of probing PATH.
    pub package_manager: Option<ManagerKind>,
    /// Also check the build tooling (maven, gradle, gcc).
    pub include_extended: bool,
    pub on_failure: FailurePolicy,
    /// Extra packages, or replacements for built-in ones with the same name.
    pub packages: Vec<Package>,
}
