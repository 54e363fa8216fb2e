use crate::package_managers::ManagerKind;
use clap::{Parser, Subcommand};

/// Defines the command-line interface (CLI) for 'uni-project-starter'.
#[derive(Parser)]
#[command(name = "uni-project-starter")]
#[command(about = "Check and install the tooling a Java project needs, using the native package manager", long_about = None)]
pub struct Cli {
    /// Enables detailed debug output for troubleshooting.
    #[arg(short, long, global = true)]
    pub(crate) debug: bool,

    /// Path to the configuration file (defaults to ~/.uni-project-starter/config.yaml).
    #[arg(long, global = true, env = "UNI_PROJECT_STARTER_CONFIG")]
    pub(crate) config: Option<String>,

    /// Use this package manager instead of detecting one.
    #[arg(long, global = true, value_enum)]
    pub(crate) manager: Option<ManagerKind>,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

/// Enumerates all supported subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the detected package manager and the state of every requirement.
    Check {
        /// Show the full dependency overview, including build tooling and
        /// packages the package manager does not offer.
        #[arg(long)]
        all: bool,
    },
    /// Install missing requirements one after another.
    Install {
        /// Do not ask before each install (the sudo password is still asked for).
        #[arg(short, long)]
        yes: bool,
        /// Continue with the next package after a failed install.
        #[arg(long)]
        keep_going: bool,
    },
    /// Print the commands that would install the missing dependencies.
    Plan,
    /// Install the package manager itself when it is missing (Homebrew, Chocolatey).
    Bootstrap,
    /// Write a default configuration file.
    Generate {
        /// Overwrite an existing configuration file.
        #[arg(long)]
        force: bool,
    },
    /// Show the current version of the tool.
    Version,
}
