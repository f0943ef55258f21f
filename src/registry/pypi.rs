//! Download statistics from pypistats.org, optionally fetched through a wrapping proxy.

use super::http::get_json;
use super::{DateWindow, DownloadEntry, PackageSeries, PackageSpec, ProviderResult, Registry, RegistryKind};
use crate::Result;
use chrono::NaiveDate;
use clap::ValueEnum;
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

const LOG_TARGET: &str = "      pypi";

pub const PYPI_STATS_BASE_URL: &str = "https://pypistats.org";

/// Which rows of the `overall` endpoint count toward the totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DownloadCategory {
    /// Downloads including those from `PyPI` mirrors
    WithMirrors,

    /// Downloads excluding those from `PyPI` mirrors
    WithoutMirrors,
}

#[derive(Debug, Deserialize)]
struct OverallResponse {
    data: Vec<OverallRow>,
}

#[derive(Debug, Deserialize)]
struct OverallRow {
    date: NaiveDate,
    downloads: u64,
    #[serde(default)]
    category: Option<String>,
}

/// Shape returned by JSON-wrapping proxies: the upstream body as a string.
#[derive(Debug, Deserialize)]
struct ProxyEnvelope {
    contents: String,
}

#[derive(Debug, Clone)]
pub struct Provider {
    client: Arc<reqwest::Client>,
    base_url: String,
    proxy_url: Option<String>,
    category: Option<DownloadCategory>,
}

impl Provider {
    #[must_use]
    pub fn new(client: Arc<reqwest::Client>, base_url: Option<&str>, proxy_url: Option<&str>, category: Option<DownloadCategory>) -> Self {
        Self {
            client,
            base_url: base_url.unwrap_or(PYPI_STATS_BASE_URL).trim_end_matches('/').to_string(),
            proxy_url: proxy_url.map(ToString::to_string),
            category,
        }
    }

    /// Rows outside `window` are dropped, so the most recent month pypistats serves
    /// is not charted, matching the window used for npm.
    async fn fetch_series_core(&self, package: &PackageSpec, window: DateWindow) -> Result<Option<PackageSeries>> {
        let target = format!("{}/api/packages/{}/overall", self.base_url, package.name().to_lowercase());

        let response = match &self.proxy_url {
            Some(proxy) => self.fetch_through_proxy(proxy, &target).await?,
            None => {
                log::info!(target: LOG_TARGET, "Querying '{}' for downloads of '{package}'", self.base_url);
                get_json::<OverallResponse>(&self.client, &target).await?
            }
        };

        let Some(response) = response else {
            return Ok(None);
        };

        let entries: Vec<DownloadEntry> = response
            .data
            .into_iter()
            .filter(|row| self.category_matches(row))
            .filter(|row| window.contains(row.date))
            .map(|row| DownloadEntry::new(row.date, row.downloads))
            .collect();

        log::debug!(target: LOG_TARGET, "Fetched {} daily entries for '{package}'", entries.len());

        Ok(Some(PackageSeries::new(package.clone(), &entries, package_page_link(package), None)))
    }

    async fn fetch_through_proxy(&self, proxy: &str, target: &str) -> Result<Option<OverallResponse>> {
        let url = Url::parse_with_params(proxy, &[("url", target)]).into_app_err_with(|| format!("building proxy URL from '{proxy}'"))?;
        log::info!(target: LOG_TARGET, "Querying '{target}' through proxy '{proxy}'");

        let Some(envelope) = get_json::<ProxyEnvelope>(&self.client, url.as_str()).await? else {
            return Ok(None);
        };

        let response = serde_json::from_str(&envelope.contents).into_app_err_with(|| format!("parsing proxied response for '{target}'"))?;
        Ok(Some(response))
    }

    fn category_matches(&self, row: &OverallRow) -> bool {
        self.category
            .is_none_or(|wanted| row.category.as_deref() == Some(wanted.to_string().as_str()))
    }
}

impl Registry for Provider {
    fn kind(&self) -> RegistryKind {
        RegistryKind::Pypi
    }

    async fn fetch_series(&self, package: &PackageSpec, window: DateWindow) -> ProviderResult<PackageSeries> {
        self.fetch_series_core(package, window).await.into()
    }
}

/// Link to the package's page on pypistats.org.
#[must_use]
pub fn package_page_link(package: &PackageSpec) -> String {
    format!("{PYPI_STATS_BASE_URL}/packages/{package}")
}
