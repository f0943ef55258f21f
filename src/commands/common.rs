//! Common processing logic shared between the npm and pypi commands.

use super::Host;
use super::config::Config;
use crate::Result;
use crate::registry::{DateWindow, PackageSpec, Registry, build_client};
use crate::reports::{generate_console, generate_csv, generate_html, generate_json, generate_xlsx};
use crate::trends::{MergeStrategy, NumberStyle, TrendAggregator, TrendReport};
use camino::Utf8PathBuf;
use chrono::{Local, NaiveDate, Utc};
use clap::Args;
use clap::ValueEnum;
use ohno::IntoAppError;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::sync::Arc;

const LOG_TARGET: &str = "  commands";

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Common arguments shared between the npm and pypi commands
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Path to configuration file (default is `trends.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,

    /// How to choose the months of the merged table [default: from configuration]
    #[arg(long, value_name = "STRATEGY")]
    pub merge: Option<MergeStrategy>,

    /// How to show download counts [default: from configuration]
    #[arg(long, value_name = "STYLE")]
    pub number_style: Option<NumberStyle>,

    /// First day of the download window, as YYYY-MM-DD [default: from configuration]
    #[arg(long, value_name = "DATE")]
    pub start_date: Option<NaiveDate>,

    /// Output the trends to the console.
    /// If omitted, console output is shown only when no other reports are generated.
    #[arg(long, help_heading = "Report Output")]
    pub console: bool,

    /// Output the trends to an Excel spreadsheet file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub excel: Option<Utf8PathBuf>,

    /// Output the trends to an HTML file with a line chart
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub html: Option<Utf8PathBuf>,

    /// Output the monthly table to a CSV file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub csv: Option<Utf8PathBuf>,

    /// Output the trends to a JSON file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub json: Option<Utf8PathBuf>,

    /// Exit with status code 1 if the downloads of any package could not be fetched
    #[arg(long)]
    pub error_if_any_failed: bool,
}

pub struct Common<'a, H: Host> {
    pub config: Config,
    host: &'a mut H,
    color: ColorMode,
    error_if_any_failed: bool,
    console: bool,
    html: Option<Utf8PathBuf>,
    excel: Option<Utf8PathBuf>,
    csv: Option<Utf8PathBuf>,
    json: Option<Utf8PathBuf>,
}

impl<'a, H: Host> Common<'a, H> {
    /// Create a new Common processor with logger and config
    ///
    /// Command-line settings take precedence over the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded
    pub fn new(host: &'a mut H, args: &CommonArgs) -> Result<Self> {
        Self::init_logging(args.log_level);

        let mut config = Config::load(args.config.as_ref())?;
        if let Some(merge) = args.merge {
            config.merge_strategy = merge;
        }
        if let Some(style) = args.number_style {
            config.number_style = style;
        }
        if let Some(start_date) = args.start_date {
            config.start_date = start_date;
        }

        Ok(Self {
            config,
            host,
            color: args.color,
            error_if_any_failed: args.error_if_any_failed,
            console: args.console,
            html: args.html.clone(),
            excel: args.excel.clone(),
            csv: args.csv.clone(),
            json: args.json.clone(),
        })
    }

    /// Initialize logger based on log level
    fn init_logging(log_level: LogLevel) {
        let level = match log_level {
            LogLevel::None => return,
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        let env = env_logger::Env::default().filter_or("RUST_LOG", level);

        // A logger may already be installed when several commands run in one process
        let _ = env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
            .try_init();
    }

    /// HTTP client shared by every request of this run
    pub fn client(&self) -> Result<Arc<reqwest::Client>> {
        Ok(Arc::new(build_client(self.config.request_timeout)?))
    }

    /// Fetch and merge the downloads of `packages` from `registry`
    pub async fn aggregate<R: Registry>(&self, registry: R, packages: &[PackageSpec]) -> Result<TrendReport> {
        let window = DateWindow::ending_month_before(self.config.start_date, Utc::now().date_naive())?;
        log::debug!(target: LOG_TARGET, "Merging {} series with the {} strategy", registry.kind(), self.config.merge_strategy);

        let aggregator = TrendAggregator::new(registry, self.config.merge_strategy);
        Ok(aggregator.aggregate(packages, window).await)
    }

    pub fn report(&mut self, report: &TrendReport) -> Result<()> {
        if report.has_failures() {
            let _ = writeln!(
                self.host.error(),
                "\nUnable to fetch downloads for {} package(s)",
                report.failures.len()
            );
            for failure in &report.failures {
                let _ = writeln!(
                    self.host.error(),
                    "  Could not gather downloads for package '{}': {}",
                    failure.package,
                    failure.error
                );
            }
        }

        let style = self.config.number_style;
        let generating_reports = self.html.is_some() || self.excel.is_some() || self.csv.is_some() || self.json.is_some();

        if (self.console || !generating_reports) && !report.packages.is_empty() {
            let mut console_output = String::new();
            let use_colors = match self.color {
                ColorMode::Always => true,
                ColorMode::Never => false,
                ColorMode::Auto => {
                    use std::io::{IsTerminal, stdout};
                    stdout().is_terminal()
                }
            };
            generate_console(report, style, use_colors, &mut console_output)?;
            let _ = write!(self.host.output(), "{console_output}");
        }

        if let Some(filename) = &self.html {
            let mut html = String::new();
            generate_html(report, style, Local::now(), &mut html)?;
            fs::write(filename, html).into_app_err_with(|| format!("writing HTML report to {filename}"))?;
        }

        if let Some(filename) = &self.excel {
            let mut file = fs::File::create(filename).into_app_err_with(|| format!("creating Excel report {filename}"))?;
            generate_xlsx(report, &mut file)?;
        }

        if let Some(filename) = &self.csv {
            let mut csv_output = String::new();
            generate_csv(report, &mut csv_output)?;
            fs::write(filename, csv_output).into_app_err_with(|| format!("writing CSV report to {filename}"))?;
        }

        if let Some(filename) = &self.json {
            let mut json_output = String::new();
            generate_json(report, &mut json_output)?;
            fs::write(filename, json_output).into_app_err_with(|| format!("writing JSON report to {filename}"))?;
        }

        if self.error_if_any_failed && report.has_failures() {
            return Err(ohno::AppError::new("the downloads of one or more packages could not be fetched"));
        }

        Ok(())
    }
}

/// Pick the packages to chart: those named on the command line, or else the configured ones.
///
/// Duplicates are dropped, keeping the first occurrence so the first package stays first.
///
/// # Errors
///
/// Returns an error if no packages are left to chart
pub fn select_packages(requested: &[PackageSpec], configured: &[PackageSpec]) -> Result<Vec<PackageSpec>> {
    let source = if requested.is_empty() { configured } else { requested };

    let mut seen = HashSet::new();
    let mut packages = Vec::with_capacity(source.len());
    for package in source {
        if seen.insert(package.name()) {
            packages.push(package.clone());
        } else {
            log::warn!(target: LOG_TARGET, "Ignoring duplicate package '{package}'");
        }
    }

    if packages.is_empty() {
        return Err(ohno::AppError::new(
            "no packages to chart; name some on the command line or list them in the configuration file",
        ));
    }

    Ok(packages)
}
