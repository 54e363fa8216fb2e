// Helpers shared by the package managers and the commands.

// Captured execution of probe commands.
pub mod command_runner;
// Tilde expansion and application directory resolution.
pub mod path_helpers;
