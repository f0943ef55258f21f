use super::{MergeStrategy, MergedTable};
use crate::registry::{DateWindow, PackageSeries, PackageSpec, RegistryKind};
use std::sync::Arc;

/// A package whose series could not be fetched.
#[derive(Debug, Clone)]
pub struct PackageFailure {
    pub package: PackageSpec,
    pub error: Arc<ohno::AppError>,
}

/// The outcome of one aggregation run.
#[derive(Debug, Clone)]
pub struct TrendReport {
    pub registry: RegistryKind,
    pub window: DateWindow,

    /// How the months of `table` were chosen.
    pub strategy: MergeStrategy,

    /// Successfully fetched packages, in the order they were requested.
    pub packages: Vec<PackageSeries>,

    /// Packages that failed, in the order they were requested.
    pub failures: Vec<PackageFailure>,

    /// Monthly totals of `packages`, one column per package in the same order.
    pub table: MergedTable,
}

impl TrendReport {
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Whether any package has metadata worth showing in a details table.
    #[must_use]
    pub fn has_metadata(&self) -> bool {
        self.packages.iter().any(|p| p.metadata.is_some())
    }
}
