//! Command-line interface and orchestration for pkg-trends
//!
//! This module implements the CLI commands and coordinates the registry, trends, and
//! report modules to go from a list of package names to finished reports. It handles
//! argument parsing, configuration management, and the high-level workflows.
//!
//! # Implementation Model
//!
//! The module is organized around four main commands:
//!
//! ## Commands
//!
//! - **npm**: Chart monthly downloads of npm packages, with creation/update dates and
//!   repository links taken from the registry
//! - **pypi**: Chart monthly downloads of `PyPI` packages from pypistats.org
//! - **init**: Generate a default configuration file
//! - **validate**: Check a configuration file
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes
//! to the appropriate command handler. Both charting commands follow the same pattern:
//!
//! 1. Parse arguments, load configuration, and apply command-line overrides
//! 2. Pick the packages: those given on the command line, or the configured list
//! 3. Fetch every package concurrently and merge the monthly series
//! 4. List the packages that could not be fetched on stderr
//! 5. Generate the requested reports
//!
//! The `common` module provides the shared pieces: logging setup, color mode
//! handling, and the report generation logic that coordinates multiple output formats.

mod common;
mod config;
mod host;
mod init;
mod npm;
mod pypi;
mod run;
mod validate;

#[cfg(debug_assertions)]
pub use config::Config;

pub use host::Host;
pub use init::{InitArgs, init_config};
pub use npm::{NpmArgs, process_npm};
pub use pypi::{PypiArgs, process_pypi};
pub use run::run;
pub use validate::{ValidateArgs, validate_config};
