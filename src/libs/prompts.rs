// Terminal prompts for the install queue, built on `dialoguer`.

use crate::libs::install_queue::{InstallError, InstallPrompter};
use crate::log_debug;
use crate::schemas::requirements::SoftwareRequirement;
use colored::Colorize;
use dialoguer::{Confirm, Password};
use std::io;

/// Asks on the terminal before every install, and for the sudo password.
pub struct TerminalPrompter {
    /// Answer every confirmation with "yes" (`install --yes`).
    assume_yes: bool,
}

impl TerminalPrompter {
    pub fn new(assume_yes: bool) -> Self {
        TerminalPrompter { assume_yes }
    }
}

impl InstallPrompter for TerminalPrompter {
    fn confirm_install(&mut self, requirement: &SoftwareRequirement) -> Result<bool, InstallError> {
        if self.assume_yes {
            log_debug!("[Prompt] Auto-confirming {}", requirement.name);
            return Ok(true);
        }

        let prompt = format!(
            "Install {} using `{}`?",
            requirement.name.bold(),
            requirement.install_command.cyan()
        );
        match Confirm::new().with_prompt(prompt).default(true).interact_opt() {
            Ok(Some(answer)) => Ok(answer),
            // Escape counts as "no".
            Ok(None) => Ok(false),
            Err(e) => Err(InstallError::Prompt(e.to_string())),
        }
    }

    fn sudo_password(
        &mut self,
        requirement: &SoftwareRequirement,
    ) -> Result<Option<String>, InstallError> {
        let prompt = format!("[sudo] password to install {}", requirement.name);
        password_answer(
            Password::new()
                .with_prompt(prompt)
                .allow_empty_password(true)
                .interact(),
        )
    }
}

/// Maps the outcome of the password prompt. A read that ends without an answer
/// (end of input on a closed or non-interactive stdin, or an interrupted read)
/// cancels the package. Ctrl-C itself terminates the process before sudo runs.
fn password_answer(
    answer: Result<String, dialoguer::Error>,
) -> Result<Option<String>, InstallError> {
    match answer {
        Ok(password) => Ok(Some(password)),
        Err(dialoguer::Error::IO(e))
            if matches!(e.kind(), io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof) =>
        {
            Ok(None)
        }
        Err(e) => Err(InstallError::Prompt(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entered_password_is_returned_even_when_empty() {
        assert_eq!(password_answer(Ok("secret".to_string())).unwrap().as_deref(), Some("secret"));
        assert_eq!(password_answer(Ok(String::new())).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn end_of_input_cancels() {
        let eof = dialoguer::Error::IO(io::Error::new(io::ErrorKind::UnexpectedEof, "closed"));
        assert_eq!(password_answer(Err(eof)).unwrap(), None);
        let interrupted = dialoguer::Error::IO(io::Error::new(io::ErrorKind::Interrupted, "signal"));
        assert_eq!(password_answer(Err(interrupted)).unwrap(), None);
    }

    #[test]
    fn other_terminal_errors_are_reported() {
        let denied = dialoguer::Error::IO(io::Error::new(io::ErrorKind::PermissionDenied, "tty"));
        assert!(matches!(password_answer(Err(denied)), Err(InstallError::Prompt(_))));
    }
}
