//! vcredist - Install every Visual C++ Redistributable runtime in one go.
//!
//! The installer takes the All-in-One package (from the program directory
//! when one is cached there, otherwise from the download catalog), unpacks
//! it and runs each bundled redistributable with its unattended switches.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Run switches and operational settings
//! - [`source`] - Choosing between a cached package and a download
//! - [`catalog`] - Resolving the latest package to a mirror URL
//! - [`fetch`] - Streaming the package to disk
//! - [`expand`] - Unpacking the package
//! - [`classify`] - Version and architecture from installer file names
//! - [`executor`] - Discovering and running installers
//! - [`cleanup`] - Removing what the run created
//! - [`pipeline`] - The stages wired together
//! - [`logging`] - Per-run log file
//! - [`error`] - Error types and result aliases
//! - [`ui`] - Prompts, progress bars and terminal output
//!
//! # Example
//!
//! ```
//! use vcredist::classify::{classify, Architecture, VersionTag};
//! use vcredist::executor::switches_for;
//!
//! let c = classify("vcredist2008_x64.exe");
//! assert_eq!(c.version, Some(VersionTag::V2008));
//! assert_eq!(c.arch, Architecture::X64);
//! assert_eq!(switches_for(c.version), ["/qb"]);
//! ```

pub mod catalog;
pub mod classify;
pub mod cleanup;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod expand;
pub mod fetch;
pub mod logging;
pub mod pipeline;
pub mod source;
pub mod ui;

pub use error::{Result, VcredistError};
