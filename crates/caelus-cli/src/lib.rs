//! Command-line interface for the CAELUS compliance reasoning engine.
//!
//! Ingests requirement, evidence, and relationship records from JSON
//! files, runs a compliance assessment, and renders the result as a
//! table, JSON document, or quiet id/outcome listing.

#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod records;

pub use cli::{Cli, CliFormat, Command};
pub use config::AppConfig;
pub use error::{CliError, Result};
pub use output::Formatter;
