//! # Install Queue
//!
//! Works through every requirement that is not installed yet, strictly one at
//! a time. For each queued package the user is asked whether to install it,
//! then (for managers that need sudo) for their password, and only then is the
//! install command executed. The next package is not touched before the
//! current one has finished.
//!
//! ## Outcomes per package
//!
//! - declined or password prompt cancelled → skipped, continue
//! - empty password → failed, continue (whatever the failure policy)
//! - install command fails → failed
//! - install command succeeds → marked installed on the platform manager
//!
//! A failure either stops the queue ([`FailurePolicy::Abort`]) or is recorded
//! and processing continues ([`FailurePolicy::Continue`]). Once the queue is
//! drained an [`InstallEvent::Finished`] event carries the summary.
//!
//! Prompts and command execution sit behind [`InstallPrompter`] and
//! [`InstallExecutor`] so the queue logic does not depend on a terminal.

use crate::libs::platform_manager::PlatformManager;
use crate::package_managers::Elevation;
use crate::schemas::config::FailurePolicy;
use crate::schemas::requirements::SoftwareRequirement;
use crate::{log_debug, log_warn};
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("no password entered")]
    EmptyPassword,
    #[error("prompt failed: {0}")]
    Prompt(String),
    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to pass the password to sudo: {0}")]
    PasswordPipe(#[source] std::io::Error),
    #[error("'{command}' exited with code {code}")]
    CommandFailed { command: String, code: i32 },
    #[error("installation of {name} failed: {source}")]
    Package {
        name: String,
        #[source]
        source: Box<InstallError>,
    },
}

/// Asks the user what to do with a queued package.
pub trait InstallPrompter {
    /// `Ok(true)` to install, `Ok(false)` to skip.
    fn confirm_install(&mut self, requirement: &SoftwareRequirement) -> Result<bool, InstallError>;

    /// `Ok(None)` when the user cancelled the password prompt.
    fn sudo_password(
        &mut self,
        requirement: &SoftwareRequirement,
    ) -> Result<Option<String>, InstallError>;
}

/// Runs an install command.
pub trait InstallExecutor {
    fn execute(
        &mut self,
        install_command: &str,
        elevation: Elevation,
        password: Option<&str>,
    ) -> Result<(), InstallError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallSummary {
    pub installed: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

/// Progress notifications, emitted in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallEvent {
    Skipped { name: String },
    Cancelled { name: String },
    Installed { name: String, all_installed: bool },
    Failed { name: String, error: String },
    Finished(InstallSummary),
}

pub struct InstallQueue {
    pending: VecDeque<String>,
    policy: FailurePolicy,
}

impl InstallQueue {
    /// Queues every requirement of `manager` that is not installed, in order.
    pub fn new(manager: &PlatformManager, policy: FailurePolicy) -> Self {
        let pending = manager
            .requirements()
            .iter()
            .filter(|r| !r.installed)
            .map(|r| r.name.clone())
            .collect();
        InstallQueue { pending, policy }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Processes the queue until it is empty, or until the first failure
    /// under [`FailurePolicy::Abort`].
    pub fn process(
        mut self,
        manager: &mut PlatformManager,
        prompter: &mut dyn InstallPrompter,
        executor: &mut dyn InstallExecutor,
        observer: &mut dyn FnMut(&InstallEvent),
    ) -> Result<InstallSummary, InstallError> {
        let mut summary = InstallSummary::default();
        let elevation = manager.package_manager().elevation();

        while let Some(name) = self.pending.pop_front() {
            let Some(requirement) = manager.requirement(&name).cloned() else {
                log_warn!("[Install Queue] '{}' vanished from the requirements, skipping", name);
                continue;
            };
            log_debug!(
                "[Install Queue] Processing '{}' ({} left)",
                name,
                self.pending.len()
            );

            if !prompter.confirm_install(&requirement)? {
                summary.skipped.push(name.clone());
                observer(&InstallEvent::Skipped { name });
                continue;
            }

            let password = match elevation {
                Elevation::Sudo => match prompter.sudo_password(&requirement)? {
                    None => {
                        summary.skipped.push(name.clone());
                        observer(&InstallEvent::Cancelled { name });
                        continue;
                    }
                    Some(password) if password.is_empty() => {
                        // Nothing runs, the queue moves on regardless of the policy.
                        summary.failed.push(name.clone());
                        observer(&InstallEvent::Failed {
                            name,
                            error: InstallError::EmptyPassword.to_string(),
                        });
                        continue;
                    }
                    Some(password) => Some(password),
                },
                Elevation::None => None,
            };

            match executor.execute(&requirement.install_command, elevation, password.as_deref()) {
                Ok(()) => {
                    manager.mark_installed(&name);
                    summary.installed.push(name.clone());
                    observer(&InstallEvent::Installed {
                        name,
                        all_installed: manager.all_installed(),
                    });
                }
                Err(error) => {
                    summary.failed.push(name.clone());
                    observer(&InstallEvent::Failed {
                        name: name.clone(),
                        error: error.to_string(),
                    });
                    if self.policy == FailurePolicy::Abort {
                        return Err(InstallError::Package {
                            name,
                            source: Box::new(error),
                        });
                    }
                }
            }
        }

        observer(&InstallEvent::Finished(summary.clone()));
        Ok(summary)
    }
}
