//! Command-line interface for vcredist.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`run`] - The installation command

pub mod args;
pub mod run;

pub use args::Cli;
pub use run::{CommandResult, RunCommand, BANNER};
