//! Download statistics and package metadata from the npm registry.

use super::http::get_json;
use super::{DateWindow, DownloadEntry, PackageMetadata, PackageSeries, PackageSpec, ProviderResult, Registry, RegistryKind};
use crate::Result;
use chrono::{DateTime, NaiveDate, Utc};
use futures_util::future::{join, join_all};
use serde::Deserialize;
use std::sync::Arc;

const LOG_TARGET: &str = "       npm";

pub const NPM_DOWNLOADS_BASE_URL: &str = "https://api.npmjs.org";
pub const NPM_REGISTRY_BASE_URL: &str = "https://registry.npmjs.org";
pub const NPM_PACKAGE_PAGE_BASE_URL: &str = "https://www.npmjs.com/package";

/// Longest span the range endpoint serves in one query.
pub const MAX_RANGE_DAYS: u32 = 540;

#[derive(Debug, Deserialize)]
struct RangeResponse {
    downloads: Vec<DayCount>,
}

#[derive(Debug, Deserialize)]
struct DayCount {
    day: NaiveDate,
    downloads: u64,
}

#[derive(Debug, Deserialize)]
struct PackageDocument {
    #[serde(default)]
    time: Option<TimeInfo>,
    #[serde(default)]
    repository: Option<RepositoryField>,
}

#[derive(Debug, Deserialize)]
struct TimeInfo {
    #[serde(default)]
    created: Option<DateTime<Utc>>,
    #[serde(default)]
    modified: Option<DateTime<Utc>>,
}

/// The `repository` field is either a bare URL string or an object with a `url` member.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RepositoryField {
    Url(String),
    Detailed {
        #[serde(default)]
        url: Option<String>,
    },
}

impl RepositoryField {
    fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Detailed { url } => url.as_deref(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Provider {
    client: Arc<reqwest::Client>,
    downloads_base_url: String,
    registry_base_url: String,
}

impl Provider {
    #[must_use]
    pub fn new(client: Arc<reqwest::Client>, downloads_base_url: Option<&str>, registry_base_url: Option<&str>) -> Self {
        Self {
            client,
            downloads_base_url: downloads_base_url.unwrap_or(NPM_DOWNLOADS_BASE_URL).trim_end_matches('/').to_string(),
            registry_base_url: registry_base_url.unwrap_or(NPM_REGISTRY_BASE_URL).trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_series_core(&self, package: &PackageSpec, window: DateWindow) -> Result<Option<PackageSeries>> {
        let (downloads, document) = join(self.fetch_downloads(package, window), self.fetch_document(package)).await;

        let Some(entries) = downloads? else {
            return Ok(None);
        };

        let registry_link = package_page_link(package);
        let total_downloads = entries.iter().map(|e| e.downloads).sum();

        // Metadata is best effort; only the downloads decide the outcome
        let document = document.unwrap_or_else(|e| {
            log::warn!(target: LOG_TARGET, "Could not fetch the registry document for '{package}': {e}");
            None
        });

        let metadata = match document {
            Some(doc) => Some(PackageMetadata {
                created: doc.time.as_ref().and_then(|t| t.created),
                last_modified: doc.time.as_ref().and_then(|t| t.modified),
                total_downloads,
                registry_link: registry_link.clone(),
                repository_link: doc.repository.as_ref().and_then(RepositoryField::url).and_then(normalize_repository_url),
            }),
            None => {
                log::warn!(target: LOG_TARGET, "No registry document for '{package}', showing downloads without metadata");
                None
            }
        };

        log::debug!(target: LOG_TARGET, "Fetched {} daily entries for '{package}'", entries.len());

        Ok(Some(PackageSeries::new(package.clone(), &entries, registry_link, metadata)))
    }

    /// Fetch daily downloads for the whole window, one range query per chunk.
    async fn fetch_downloads(&self, package: &PackageSpec, window: DateWindow) -> Result<Option<Vec<DownloadEntry>>> {
        let chunks = window.split(MAX_RANGE_DAYS);
        log::info!(
            target: LOG_TARGET,
            "Querying '{}' for downloads of '{package}' over {window} ({} requests)",
            self.downloads_base_url,
            chunks.len()
        );

        let responses = join_all(chunks.iter().map(|chunk| {
            let url = format!("{}/downloads/range/{chunk}/{}", self.downloads_base_url, package.name());
            async move { get_json::<RangeResponse>(&self.client, &url).await }
        }))
        .await;

        let mut entries = Vec::new();
        for response in responses {
            let Some(range) = response? else {
                return Ok(None);
            };

            entries.extend(range.downloads.into_iter().map(|d| DownloadEntry::new(d.day, d.downloads)));
        }

        Ok(Some(entries))
    }

    async fn fetch_document(&self, package: &PackageSpec) -> Result<Option<PackageDocument>> {
        let url = format!("{}/{}", self.registry_base_url, encode_package_path(package));
        get_json(&self.client, &url).await
    }
}

impl Registry for Provider {
    fn kind(&self) -> RegistryKind {
        RegistryKind::Npm
    }

    async fn fetch_series(&self, package: &PackageSpec, window: DateWindow) -> ProviderResult<PackageSeries> {
        self.fetch_series_core(package, window).await.into()
    }
}

/// Link to the package's page on npmjs.com.
#[must_use]
pub fn package_page_link(package: &PackageSpec) -> String {
    format!("{NPM_PACKAGE_PAGE_BASE_URL}/{package}")
}

/// The registry document path, with a scoped package's `/` escaped.
fn encode_package_path(package: &PackageSpec) -> String {
    if package.is_scoped() {
        package.name().replacen('/', "%2F", 1)
    } else {
        package.name().to_string()
    }
}

/// Turn a package.json repository URL into a browsable https link.
fn normalize_repository_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let without_prefix = trimmed.strip_prefix("git+").unwrap_or(trimmed);
    let mut url = if let Some(rest) = without_prefix.strip_prefix("git://") {
        format!("https://{rest}")
    } else if let Some(rest) = without_prefix.strip_prefix("ssh://git@") {
        format!("https://{rest}")
    } else if let Some(rest) = without_prefix.strip_prefix("git@") {
        format!("https://{}", rest.replacen(':', "/", 1))
    } else if let Some(rest) = without_prefix.strip_prefix("github:") {
        format!("https://github.com/{rest}")
    } else {
        without_prefix.to_string()
    };

    if let Some(stripped) = url.strip_suffix(".git") {
        url = stripped.to_string();
    }

    Some(url)
}
