// Runs install commands, elevated through `sudo -S` when the package manager
// requires it. Unlike the probes, installer output is not captured: it goes
// straight to the user's terminal.

use crate::libs::install_queue::{InstallError, InstallExecutor};
use crate::package_managers::Elevation;
use crate::{log_debug, log_info};
use colored::Colorize;
use std::io::Write;
use std::process::{Command, Stdio};

/// Program and arguments that run `install_command` with the given elevation.
pub fn build_invocation(install_command: &str, elevation: Elevation) -> (String, Vec<String>) {
    match elevation {
        Elevation::Sudo => (
            "sudo".to_string(),
            vec![
                "-S".to_string(),
                "sh".to_string(),
                "-c".to_string(),
                install_command.to_string(),
            ],
        ),
        Elevation::None if cfg!(target_os = "windows") => (
            "cmd".to_string(),
            vec!["/C".to_string(), install_command.to_string()],
        ),
        Elevation::None => (
            "sh".to_string(),
            vec!["-c".to_string(), install_command.to_string()],
        ),
    }
}

/// Executes install commands on the real system.
#[derive(Debug, Default)]
pub struct ElevatedRunner;

impl InstallExecutor for ElevatedRunner {
    fn execute(
        &mut self,
        install_command: &str,
        elevation: Elevation,
        password: Option<&str>,
    ) -> Result<(), InstallError> {
        let (program, args) = build_invocation(install_command, elevation);
        // The command line never contains the password, it only travels over stdin.
        log_info!(
            "[Installer] Running: {} {}",
            program.cyan().bold(),
            args.join(" ").cyan()
        );

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(if password.is_some() {
                Stdio::piped()
            } else {
                Stdio::inherit()
            })
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| InstallError::Spawn {
                command: program.clone(),
                source,
            })?;

        if let Some(password) = password {
            if let Some(mut stdin) = child.stdin.take() {
                let written = stdin.write_all(format!("{}\n", password).as_bytes());
                // Closing the pipe ends sudo's read, so the child can be reaped below.
                drop(stdin);
                if let Err(e) = written {
                    let status = child.wait();
                    log_debug!("[Installer] '{}' reaped after a broken pipe: {:?}", install_command, status);
                    return Err(InstallError::PasswordPipe(e));
                }
            }
        }

        let status = child.wait().map_err(|source| InstallError::Spawn {
            command: program.clone(),
            source,
        })?;
        log_debug!("[Installer] '{}' exited with {:?}", install_command, status.code());

        if status.success() {
            Ok(())
        } else {
            Err(InstallError::CommandFailed {
                command: install_command.to_string(),
                code: status.code().unwrap_or(-1),
            })
        }
    }
}
