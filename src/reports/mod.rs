//! Multi-format report generation for download trends
//!
//! This module turns a [`TrendReport`](crate::trends::TrendReport) into output for
//! people and for other programs.
//!
//! # Implementation Model
//!
//! Five report generators are provided, each accessed through a `generate` function:
//! - **Console**: Monthly table in the terminal, split into blocks to fit the terminal width,
//!   followed by per-package details
//! - **CSV**: The merged monthly table with raw counts
//! - **HTML**: Self-contained page with an inline SVG line chart and a package details table
//! - **Excel**: Native .xlsx workbook with the monthly table, a line chart, and package details
//! - **JSON**: Machine-readable report including metadata and failures
//!
//! Only the console and HTML reports abbreviate counts with a
//! [`NumberStyle`](crate::trends::NumberStyle); the machine-readable formats keep raw values.
//! Line colors come from a fixed palette per registry, shared by the HTML and Excel charts.

mod common;
mod console;
mod csv;
mod excel;
mod html;
mod json;

#[cfg(test)]
mod fixtures;

pub use console::generate as generate_console;
pub use csv::generate as generate_csv;
pub use excel::generate as generate_xlsx;
pub use html::generate as generate_html;
pub use json::generate as generate_json;
