// Data structures shared across the application.

// Layout of `config.yaml`.
pub mod config;
// Catalog of installable tools and their native names.
pub mod packages;
// Probed state of catalog packages.
pub mod requirements;
