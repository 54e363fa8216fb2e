// Captured execution of package manager commands.
// Probing commands never inherit the terminal: their output is collected
// and handed to the manager-specific parsers.

use crate::log_debug;
use colored::Colorize;
use std::io;
use std::process::Command;

/// Everything a probe needs from a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Runs `program` with `args` and extra environment variables, capturing output.
///
/// A process that starts but exits non-zero is *not* an error here; the caller
/// decides what a failing exit status means. Only failing to spawn the process
/// (binary missing, permission denied) is returned as `Err`.
pub fn run_capture(program: &str, args: &[&str], envs: &[(&str, &str)]) -> io::Result<CommandOutput> {
    log_debug!(
        "[Command] Executing: {} {}",
        program.cyan().bold(),
        args.join(" ").cyan()
    );

    let mut command = Command::new(program);
    command.args(args);
    for (key, value) in envs {
        command.env(key, value);
    }

    let output = command.output()?;
    let captured = CommandOutput {
        success: output.status.success(),
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    log_debug!(
        "[Command] '{}' finished with exit code {}",
        program,
        captured.code.unwrap_or(-1)
    );
    if !captured.stderr.trim().is_empty() {
        log_debug!("[Command] Stderr: {}", captured.stderr.trim());
    }
    Ok(captured)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn captures_output_and_environment() {
        let output = run_capture("sh", &["-c", "echo $STARTER_LANG; echo oops >&2"], &[("STARTER_LANG", "en")]).unwrap();
        assert!(output.success);
        assert_eq!(output.code, Some(0));
        assert_eq!(output.stdout, "en\n");
        assert_eq!(output.stderr.trim(), "oops");
    }

    #[cfg(unix)]
    #[test]
    fn failing_exit_status_is_returned_as_output() {
        let output = run_capture("sh", &["-c", "exit 4"], &[]).unwrap();
        assert!(!output.success);
        assert_eq!(output.code, Some(4));
    }

    #[test]
    fn missing_binary_is_an_io_error() {
        let err = run_capture("uni-project-starter-no-such-binary", &[], &[]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
