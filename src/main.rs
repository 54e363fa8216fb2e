mod cli;
mod commands;
mod libs;
mod logger;
mod package_managers;
mod schemas;
mod system;

use clap::Parser;
use cli::cmd_enums::{Cli, Commands};
use commands::{GlobalOptions, bootstrap, check, generate, install, plan, version};

fn main() {
    let cli = Cli::parse();
    logger::init(cli.debug);

    let options = GlobalOptions {
        config: cli.config,
        manager: cli.manager,
    };

    let result = match cli.command {
        Commands::Check { all } => check::run(&options, all),
        Commands::Install { yes, keep_going } => install::run(&options, yes, keep_going),
        Commands::Plan => plan::run(&options),
        Commands::Bootstrap => bootstrap::run(&options),
        Commands::Generate { force } => generate::run(&options, force),
        Commands::Version => {
            version::run();
            Ok(())
        }
    };

    if let Err(e) = result {
        log_error!("{:#}", e);
        std::process::exit(1);
    }
}
