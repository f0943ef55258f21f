//! A tool to chart monthly download trends for npm and `PyPI` packages.
//!
//! # Overview
//!
//! `pkg-trends` fetches the daily download counts of a set of packages from a public
//! registry statistics endpoint, sums them into monthly totals, and merges the
//! per-package series into a single month-keyed table that is rendered to the console
//! or written out as HTML, CSV, JSON, or Excel.
//!
//! # Quick Start
//!
//! ```bash
//! pkg-trends npm vitest jest playwright cypress
//! pkg-trends pypi pytest httpx --html trends.html
//! ```
//!
//! Without package arguments, the package lists from the configuration file are used.
//!
//! # Configuration
//!
//! ```bash
//! pkg-trends init trends.toml
//! pkg-trends validate trends.toml
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use pkg_trends::{Host, run};
use std::io::Write;
use std::io::{stderr, stdout};

/// Default host that writes to the real process streams.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

#[cfg_attr(coverage_nightly, coverage(off))]
impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }

    fn error(&mut self) -> impl Write {
        stderr()
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

#[tokio::main]
#[cfg_attr(coverage_nightly, coverage(off))]
async fn main() -> Result<(), ohno::AppError> {
    run(&mut RealHost, std::env::args()).await
}
