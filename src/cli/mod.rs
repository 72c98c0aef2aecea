//! Command Line Interface (CLI) layer.
//!
//! Argument parsing (`args`), error types (`errors`) and the orchestration
//! logic (`runner`) that turns flags and presets into a figure, then saves
//! and/or displays it. For programmatic use prefer `mscomposite::api`.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
