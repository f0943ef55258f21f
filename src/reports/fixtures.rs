//! Sample reports shared by the report generator tests.

use crate::registry::{DateWindow, DownloadEntry, PackageMetadata, PackageSeries, PackageSpec, ProviderResult, RegistryKind};
use crate::trends::{MergeStrategy, TrendReport, build_report};
use chrono::{NaiveDate, TimeZone, Utc};
use ohno::app_err;
use std::sync::Arc;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn window() -> DateWindow {
    DateWindow::new(day(2024, 1, 1), day(2024, 3, 31)).unwrap()
}

/// Two npm packages with metadata plus one failure, merged with the union strategy.
///
/// | month   | vitest     | jest |
/// |---------|------------|------|
/// | 2024-01 | 1,500      | 0    |
/// | 2024-02 | 250,000    | 20   |
/// | 2024-03 | 15,000,000 | 999  |
pub fn npm_report() -> TrendReport {
    let vitest_entries = [
        DownloadEntry::new(day(2024, 1, 5), 1_000),
        DownloadEntry::new(day(2024, 1, 6), 500),
        DownloadEntry::new(day(2024, 2, 1), 250_000),
        DownloadEntry::new(day(2024, 3, 1), 15_000_000),
    ];
    let jest_entries = [DownloadEntry::new(day(2024, 2, 9), 20), DownloadEntry::new(day(2024, 3, 9), 999)];

    let vitest = PackageSeries::new(
        PackageSpec::new("vitest"),
        &vitest_entries,
        "https://www.npmjs.com/package/vitest".to_string(),
        Some(PackageMetadata {
            created: Some(Utc.with_ymd_and_hms(2021, 12, 3, 10, 0, 0).unwrap()),
            last_modified: Some(Utc.with_ymd_and_hms(2024, 3, 30, 8, 0, 0).unwrap()),
            total_downloads: 15_251_500,
            registry_link: "https://www.npmjs.com/package/vitest".to_string(),
            repository_link: Some("https://github.com/vitest-dev/vitest".to_string()),
        }),
    );

    let jest = PackageSeries::new(
        PackageSpec::new("jest"),
        &jest_entries,
        "https://www.npmjs.com/package/jest".to_string(),
        Some(PackageMetadata {
            created: Some(Utc.with_ymd_and_hms(2012, 2, 1, 0, 0, 0).unwrap()),
            last_modified: None,
            total_downloads: 1_019,
            registry_link: "https://www.npmjs.com/package/jest".to_string(),
            repository_link: None,
        }),
    );

    build_report(
        RegistryKind::Npm,
        window(),
        vec![
            (PackageSpec::new("vitest"), ProviderResult::Found(vitest)),
            (PackageSpec::new("ghost"), ProviderResult::Error(Arc::new(app_err!("HTTP status 500")))),
            (PackageSpec::new("jest"), ProviderResult::Found(jest)),
        ],
        MergeStrategy::Union,
    )
}

/// One `PyPI` package without metadata and no failures.
pub fn pypi_report() -> TrendReport {
    let entries = [DownloadEntry::new(day(2024, 1, 2), 42), DownloadEntry::new(day(2024, 2, 2), 58)];
    let series = PackageSeries::new(
        PackageSpec::new("httpx"),
        &entries,
        "https://pypistats.org/packages/httpx".to_string(),
        None,
    );

    build_report(
        RegistryKind::Pypi,
        window(),
        vec![(PackageSpec::new("httpx"), ProviderResult::Found(series))],
        MergeStrategy::AnchorFirst,
    )
}

/// A report in which every package failed.
pub fn empty_report() -> TrendReport {
    build_report(
        RegistryKind::Npm,
        window(),
        vec![(PackageSpec::new("ghost"), ProviderResult::NotFound)],
        MergeStrategy::AnchorFirst,
    )
}
