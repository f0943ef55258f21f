use super::{MonthKey, MonthlyBuckets};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// How the set of months in a merged table is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum, strum::Display, strum::EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MergeStrategy {
    /// Use only the months of the first package; months that only later packages have are dropped
    #[default]
    AnchorFirst,

    /// Use every month that any package has data for
    Union,
}

/// One month's totals, one count per package column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedRow {
    pub month: MonthKey,
    pub counts: Vec<u64>,
}

/// Monthly totals for several packages aligned on a shared month axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergedTable {
    pub packages: Vec<Arc<str>>,
    pub rows: Vec<MergedRow>,
}

impl MergedTable {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The values of one package column, in row order.
    pub fn column(&self, package_index: usize) -> impl Iterator<Item = u64> + '_ {
        self.rows.iter().map(move |row| row.counts.get(package_index).copied().unwrap_or(0))
    }

    /// The largest count anywhere in the table.
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.rows.iter().flat_map(|row| row.counts.iter().copied()).max().unwrap_or(0)
    }
}

/// Align per-package monthly buckets into one table.
///
/// `buckets[i]` belongs to `package_names[i]`. A package with no entry for a row's month
/// contributes zero. With [`MergeStrategy::AnchorFirst`] the rows are exactly the months of
/// `buckets[0]`; with [`MergeStrategy::Union`] they are every month seen in any bucket.
/// Rows are in chronological order. No buckets means no rows.
#[must_use]
pub fn merge_series<S: AsRef<str>>(buckets: &[MonthlyBuckets], package_names: &[S], strategy: MergeStrategy) -> MergedTable {
    debug_assert_eq!(buckets.len(), package_names.len(), "every bucket map needs a package name");

    let months: Vec<MonthKey> = match strategy {
        MergeStrategy::AnchorFirst => buckets.first().map(|first| first.months().collect()).unwrap_or_default(),
        MergeStrategy::Union => buckets.iter().flat_map(|b| b.months()).collect::<BTreeSet<_>>().into_iter().collect(),
    };

    let rows = months
        .into_iter()
        .map(|month| MergedRow {
            month,
            counts: buckets.iter().map(|b| b.get(month).unwrap_or(0)).collect(),
        })
        .collect();

    MergedTable {
        packages: package_names.iter().take(buckets.len()).map(|n| Arc::from(n.as_ref())).collect(),
        rows,
    }
}
