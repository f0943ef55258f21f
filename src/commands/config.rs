use crate::Result;
use crate::registry::PackageSpec;
use crate::registry::npm::{NPM_DOWNLOADS_BASE_URL, NPM_REGISTRY_BASE_URL};
use crate::registry::pypi::{DownloadCategory, PYPI_STATS_BASE_URL};
use crate::trends::{MergeStrategy, NumberStyle};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{NaiveDate, Utc};
use core::time::Duration;
use directories::ProjectDirs;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

const LOG_TARGET: &str = "    config";

/// Base name of the configuration file searched for when none is given
const CONFIG_FILE_STEM: &str = "trends";

const CONFIG_EXTENSIONS: [&str; 4] = ["toml", "yml", "yaml", "json"];

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// First day of the download window
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,

    /// How the months of the merged table are chosen
    #[serde(default)]
    pub merge_strategy: MergeStrategy,

    /// How counts are shown in human-readable reports
    #[serde(default)]
    pub number_style: NumberStyle,

    /// Upper bound on each HTTP request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    #[serde(default)]
    pub npm: NpmConfig,

    #[serde(default)]
    pub pypi: PypiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NpmConfig {
    /// Packages charted when none are given on the command line
    pub packages: Vec<PackageSpec>,

    /// Base URL of the downloads range API
    pub downloads_url: String,

    /// Base URL of the package document registry
    pub registry_url: String,
}

impl Default for NpmConfig {
    fn default() -> Self {
        Self {
            packages: Vec::new(),
            downloads_url: NPM_DOWNLOADS_BASE_URL.to_string(),
            registry_url: NPM_REGISTRY_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PypiConfig {
    /// Packages charted when none are given on the command line
    pub packages: Vec<PackageSpec>,

    /// Base URL of the pypistats.org API
    pub api_url: String,

    /// Proxy that wraps upstream responses as `{ "contents": "..." }`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,

    /// Only count rows of this category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<DownloadCategory>,
}

impl Default for PypiConfig {
    fn default() -> Self {
        Self {
            packages: Vec::new(),
            api_url: PYPI_STATS_BASE_URL.to_string(),
            proxy_url: None,
            category: None,
        }
    }
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default()
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `trends.{toml,yml,yaml,json}` is looked for in the
    /// current directory and then in the user's configuration directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation
    pub fn load(config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let mut search_dirs = vec![Utf8PathBuf::from(".")];
        if let Some(dir) = user_config_dir() {
            search_dirs.push(dir);
        }

        Self::load_from(&search_dirs, config_path)
    }

    /// Load configuration from an explicit path, or from the first candidate file found in `search_dirs`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation
    pub fn load_from(search_dirs: &[Utf8PathBuf], config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading pkg-trends configuration from {path}"))?;
            (path.clone(), text)
        } else {
            let mut found = None;
            'search: for dir in search_dirs {
                for extension in CONFIG_EXTENSIONS {
                    let path = dir.join(format!("{CONFIG_FILE_STEM}.{extension}"));
                    match fs::read_to_string(&path) {
                        Ok(text) => {
                            found = Some((path, text));
                            break 'search;
                        }
                        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                        Err(e) => return Err(e).into_app_err_with(|| format!("reading pkg-trends configuration from {path}")),
                    }
                }
            }

            let Some(result) = found else {
                return Ok(Self::default());
            };
            result
        };

        log::debug!(target: LOG_TARGET, "Using configuration file {final_path}");

        let extension = final_path.extension().unwrap_or_default();
        let config: Self = match extension {
            "toml" => toml::from_str(&text).into_app_err_with(|| format!("parsing TOML configuration from {final_path}"))?,
            "yml" | "yaml" => serde_yaml::from_str(&text).into_app_err_with(|| format!("parsing YAML configuration from {final_path}"))?,
            "json" => serde_json::from_str(&text).into_app_err_with(|| format!("parsing JSON configuration from {final_path}"))?,
            _ => return Err(app_err!("unsupported configuration file extension: {extension}")),
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file, in the format implied by the file's extension
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save(&self, output_path: &Utf8Path) -> Result<()> {
        let extension = output_path.extension().unwrap_or_default();
        let text = match extension {
            "toml" => toml::to_string(self).into_app_err_with(|| format!("serializing configuration to TOML for saving to {output_path}"))?,
            "yml" | "yaml" => serde_yaml::to_string(self)
                .into_app_err_with(|| format!("serializing configuration to YAML for saving to {output_path}"))?,
            "json" => serde_json::to_string_pretty(self)
                .into_app_err_with(|| format!("serializing configuration to JSON for saving to {output_path}"))?,
            _ => return Err(app_err!("unsupported configuration file extension: {extension}")),
        };

        fs::write(output_path, text).into_app_err_with(|| format!("writing configuration to {output_path}"))?;
        Ok(())
    }

    /// Save the default configuration
    ///
    /// TOML output keeps the comments of the embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        if output_path.extension() == Some("toml") {
            fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
            return Ok(());
        }

        Self::default().save(output_path)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a URL is malformed, the start date is in the future, or the timeout is zero
    pub fn validate(&self) -> Result<()> {
        let today = Utc::now().date_naive();
        if self.start_date > today {
            return Err(app_err!("start_date {} is in the future", self.start_date));
        }

        if self.request_timeout.is_zero() {
            return Err(app_err!("request_timeout must be greater than zero"));
        }

        validate_url("npm.downloads_url", &self.npm.downloads_url)?;
        validate_url("npm.registry_url", &self.npm.registry_url)?;
        validate_url("pypi.api_url", &self.pypi.api_url)?;
        if let Some(proxy) = &self.pypi.proxy_url {
            validate_url("pypi.proxy_url", proxy)?;
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).into_app_err_with(|| format!("{field} is not a valid URL: '{value}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(app_err!("{field} must be an http or https URL, got '{value}'"));
    }

    Ok(())
}

fn user_config_dir() -> Option<Utf8PathBuf> {
    let dirs = ProjectDirs::from("", "", "pkg-trends")?;
    Utf8PathBuf::from_path_buf(dirs.config_dir().to_path_buf()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir_path(tmp: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap()
    }

    fn write_config(tmp: &tempfile::TempDir, name: &str, text: &str) -> Utf8PathBuf {
        let path = temp_dir_path(tmp).join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
        assert_eq!(config.merge_strategy, MergeStrategy::AnchorFirst);
        assert_eq!(config.number_style, NumberStyle::Indian);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.npm.downloads_url, NPM_DOWNLOADS_BASE_URL);
        assert_eq!(config.pypi.api_url, PYPI_STATS_BASE_URL);
        assert!(config.pypi.proxy_url.is_none());
        assert!(config.pypi.category.is_none());
    }

    #[test]
    fn test_default_package_lists() {
        let config = Config::default();
        let npm: Vec<_> = config.npm.packages.iter().map(PackageSpec::name).collect();
        assert_eq!(npm, ["vitest", "jest", "playwright", "cypress"]);

        let pypi: Vec<_> = config.pypi.packages.iter().map(PackageSpec::name).collect();
        assert_eq!(
            pypi,
            ["pytest", "httpx", "pytest-asyncio", "behave", "robotframework", "lettuce", "doctest", "nose2"]
        );
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = Config {
            request_timeout: Duration::ZERO,
            ..Config::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("request_timeout"));
    }

    #[test]
    fn test_validate_future_start_date() {
        let config = Config {
            start_date: Utc::now().date_naive() + chrono::Days::new(30),
            ..Config::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("in the future"));
    }

    #[test]
    fn test_validate_bad_url() {
        let mut config = Config::default();
        config.npm.registry_url = "not a url".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("npm.registry_url"));

        let mut config = Config::default();
        config.pypi.proxy_url = Some("ftp://example.com".to_string());
        assert!(config.validate().unwrap_err().to_string().contains("pypi.proxy_url"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_missing_config_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_from(&[temp_dir_path(&tmp)], None).unwrap();
        assert_eq!(config.npm.packages.len(), 4);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_searches_directories_in_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let _ = write_config(&second, "trends.json", r#"{ "number_style": "western" }"#);

        let config = Config::load_from(&[temp_dir_path(&first), temp_dir_path(&second)], None).unwrap();
        assert_eq!(config.number_style, NumberStyle::Western);

        let _ = write_config(&first, "trends.toml", "merge_strategy = \"union\"\n");
        let config = Config::load_from(&[temp_dir_path(&first), temp_dir_path(&second)], None).unwrap();
        assert_eq!(config.merge_strategy, MergeStrategy::Union);
        assert_eq!(config.number_style, NumberStyle::Indian);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_partial_toml_keeps_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(
            &tmp,
            "custom.toml",
            r#"
start_date = "2020-06-01"
request_timeout = "5s"

[npm]
packages = ["@playwright/test"]
"#,
        );

        let config = Config::load_from(&[], Some(&path)).unwrap();
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2020, 6, 1).unwrap());
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.npm.packages, vec![PackageSpec::new("@playwright/test")]);
        assert_eq!(config.npm.registry_url, NPM_REGISTRY_BASE_URL);
        assert!(config.pypi.packages.is_empty());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_yaml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(
            &tmp,
            "trends.yaml",
            "pypi:\n  packages: [httpx]\n  category: without_mirrors\n  proxy_url: https://proxy.example.com/get\n",
        );

        let config = Config::load_from(&[], Some(&path)).unwrap();
        assert_eq!(config.pypi.packages, vec![PackageSpec::new("httpx")]);
        assert_eq!(config.pypi.category, Some(DownloadCategory::WithoutMirrors));
        assert_eq!(config.pypi.proxy_url.as_deref(), Some("https://proxy.example.com/get"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_unknown_field() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(&tmp, "trends.toml", "unknown_field = 1\n");

        let err = Config::load_from(&[], Some(&path)).unwrap_err();
        assert!(err.to_string().contains("parsing TOML configuration"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_invalid_package_name() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(&tmp, "trends.json", r#"{ "npm": { "packages": ["not a package"] } }"#);

        let err = Config::load_from(&[], Some(&path)).unwrap_err();
        assert!(err.to_string().contains("parsing JSON configuration"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_unsupported_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(&tmp, "trends.ini", "");

        let err = Config::load_from(&[], Some(&path)).unwrap_err();
        assert!(err.to_string().contains("unsupported configuration file extension"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_save_default_and_load() {
        let tmp = tempfile::tempdir().unwrap();

        for name in ["trends.toml", "trends.yml", "trends.json"] {
            let output_path = temp_dir_path(&tmp).join(name);
            Config::save_default(&output_path).unwrap();
            let loaded = Config::load_from(&[], Some(&output_path)).unwrap();
            assert_eq!(loaded.pypi.packages.len(), 8, "{name}");
            assert_eq!(loaded.request_timeout, Duration::from_secs(60), "{name}");
        }
    }

    #[test]
    fn test_default_config_toml_is_not_empty() {
        assert!(!DEFAULT_CONFIG_TOML.is_empty());
    }
}
