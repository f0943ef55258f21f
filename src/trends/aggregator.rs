use super::{MergeStrategy, MonthlyBuckets, PackageFailure, TrendReport, merge_series};
use crate::registry::{DateWindow, PackageSeries, PackageSpec, ProviderResult, Registry, RegistryKind};
use futures_util::future::join_all;
use ohno::app_err;
use std::sync::Arc;

const LOG_TARGET: &str = "aggregator";

/// Fetches series for a list of packages from one registry and merges them.
#[derive(Debug)]
pub struct TrendAggregator<R> {
    registry: R,
    strategy: MergeStrategy,
}

impl<R: Registry> TrendAggregator<R> {
    #[must_use]
    pub const fn new(registry: R, strategy: MergeStrategy) -> Self {
        Self { registry, strategy }
    }

    /// Fetch every package concurrently and build a report once all fetches have settled.
    ///
    /// A package that fails is logged and left out of the merged table; it never
    /// prevents the other packages from being reported.
    pub async fn aggregate(&self, packages: &[PackageSpec], window: DateWindow) -> TrendReport {
        log::info!(
            target: LOG_TARGET,
            "Fetching {} package(s) from {} over {window}",
            packages.len(),
            self.registry.kind()
        );

        let results = join_all(packages.iter().map(|package| async move {
            let result = self.registry.fetch_series(package, window).await;
            (package.clone(), result)
        }))
        .await;

        build_report(self.registry.kind(), window, results, self.strategy)
    }
}

/// Turn per-package fetch outcomes into a report.
///
/// Successful packages keep their input order and become the table's columns.
/// `NotFound` and `Error` outcomes are logged and recorded as failures.
pub fn build_report(
    registry: RegistryKind,
    window: DateWindow,
    results: impl IntoIterator<Item = (PackageSpec, ProviderResult<PackageSeries>)>,
    strategy: MergeStrategy,
) -> TrendReport {
    let mut packages = Vec::new();
    let mut failures = Vec::new();

    for (package, result) in results {
        match result {
            ProviderResult::Found(series) => packages.push(series),
            ProviderResult::NotFound => {
                log::warn!(target: LOG_TARGET, "Package '{package}' was not found on {registry}");
                failures.push(PackageFailure {
                    error: Arc::new(app_err!("package '{package}' was not found on {registry}")),
                    package,
                });
            }
            ProviderResult::Error(error) => {
                log::error!(target: LOG_TARGET, "Could not fetch downloads for '{package}': {error:#}");
                failures.push(PackageFailure { package, error });
            }
        }
    }

    let buckets: Vec<MonthlyBuckets> = packages.iter().map(|p| p.monthly.clone()).collect();
    let names: Vec<&str> = packages.iter().map(PackageSeries::name).collect();
    let table = merge_series(&buckets, &names, strategy);

    log::debug!(
        target: LOG_TARGET,
        "Merged {} package(s) into {} monthly row(s) using the {strategy} strategy",
        packages.len(),
        table.rows.len()
    );

    TrendReport {
        registry,
        window,
        strategy,
        packages,
        failures,
        table,
    }
}
