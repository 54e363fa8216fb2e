// Core logic behind the commands.

// Reading and writing `config.yaml`.
pub mod config_loading;
// Running install commands, with sudo when needed.
pub mod elevated_runner;
// Sequential processing of missing packages.
pub mod install_queue;
// Host, package manager and requirement state.
pub mod platform_manager;
// Interactive confirmation and password prompts.
pub mod prompts;
pub mod utilities;
