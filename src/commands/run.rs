//! Command dispatch logic for pkg-trends

use super::{InitArgs, NpmArgs, PypiArgs, ValidateArgs, init_config, process_npm, process_pypi, validate_config};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "pkg-trends", author, version, long_about = None)]
#[command(about = "Chart monthly download trends for npm and PyPI packages")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: TrendsSubcommand,
}

#[derive(Subcommand, Debug)]
enum TrendsSubcommand {
    /// Chart monthly downloads of npm packages
    Npm(Box<NpmArgs>),
    /// Chart monthly downloads of `PyPI` packages
    Pypi(Box<PypiArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        TrendsSubcommand::Npm(npm_args) => process_npm(host, npm_args).await,
        TrendsSubcommand::Pypi(pypi_args) => process_pypi(host, pypi_args).await,
        TrendsSubcommand::Init(init_args) => init_config(host, init_args),
        TrendsSubcommand::Validate(validate_args) => validate_config(host, validate_args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_npm_with_flags() {
        let cli = Cli::try_parse_from([
            "pkg-trends",
            "npm",
            "vitest",
            "@playwright/test",
            "--merge",
            "union",
            "--number-style",
            "western",
            "--start-date",
            "2023-01-01",
            "--csv",
            "out.csv",
        ])
        .unwrap();

        let TrendsSubcommand::Npm(args) = cli.command else {
            panic!("expected the npm subcommand");
        };
        let names: Vec<_> = args.packages.iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, ["vitest", "@playwright/test"]);
        assert_eq!(args.common.merge, Some(crate::trends::MergeStrategy::Union));
        assert_eq!(args.common.number_style, Some(crate::trends::NumberStyle::Western));
        assert_eq!(args.common.start_date, chrono::NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(args.common.csv.as_deref().map(camino::Utf8Path::as_str), Some("out.csv"));
    }

    #[test]
    fn test_parse_pypi_category() {
        let cli = Cli::try_parse_from(["pkg-trends", "pypi", "httpx", "--category", "without-mirrors"]).unwrap();

        let TrendsSubcommand::Pypi(args) = cli.command else {
            panic!("expected the pypi subcommand");
        };
        assert_eq!(args.category, Some(crate::registry::pypi::DownloadCategory::WithoutMirrors));
    }

    #[test]
    fn test_parse_rejects_invalid_package_name() {
        assert!(Cli::try_parse_from(["pkg-trends", "npm", "not valid"]).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_merge_strategy() {
        assert!(Cli::try_parse_from(["pkg-trends", "npm", "--merge", "sideways"]).is_err());
    }
}
