#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for pkg-trends
//!
//! This library holds all functionality for the `pkg-trends` tool, which charts
//! monthly download trends for packages published on the npm and `PyPI` registries.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`registry`]: Registry endpoints and per-package download series
//! - [`trends`]: Monthly bucketing, series merging and number formatting
//! - [`reports`]: Report generation in multiple formats

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

pub mod registry;

pub mod trends;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

pub use crate::commands::{Host, run};
