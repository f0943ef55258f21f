use super::PackageSpec;
use crate::trends::MonthlyBuckets;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// One reporting period's download count, as returned by a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadEntry {
    pub day: NaiveDate,
    pub downloads: u64,
}

impl DownloadEntry {
    #[must_use]
    pub const fn new(day: NaiveDate, downloads: u64) -> Self {
        Self { day, downloads }
    }
}

/// Descriptive data about a package, shown alongside the chart but never merged into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageMetadata {
    pub created: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
    pub total_downloads: u64,
    pub registry_link: String,
    pub repository_link: Option<String>,
}

/// The monthly download series for one successfully fetched package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSeries {
    pub package: PackageSpec,
    pub monthly: MonthlyBuckets,
    pub registry_link: String,
    pub metadata: Option<PackageMetadata>,
}

impl PackageSeries {
    /// Bucket the raw entries by month and wrap them with the package's links.
    #[must_use]
    pub fn new(package: PackageSpec, entries: &[DownloadEntry], registry_link: String, metadata: Option<PackageMetadata>) -> Self {
        Self {
            package,
            monthly: MonthlyBuckets::from_entries(entries),
            registry_link,
            metadata,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.package.name()
    }

    /// Sum of all downloads in the fetched window.
    #[must_use]
    pub fn total_downloads(&self) -> u64 {
        self.monthly.total()
    }
}
