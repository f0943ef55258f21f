use super::MonthKey;
use crate::registry::DownloadEntry;
use std::collections::BTreeMap;

/// Monthly download totals for one package.
///
/// Keys are unique and iterate in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlyBuckets {
    totals: BTreeMap<MonthKey, u64>,
}

impl MonthlyBuckets {
    /// Group entries by the month of their day and sum the counts in each group.
    ///
    /// The result does not depend on the order of the input entries.
    #[must_use]
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a DownloadEntry>) -> Self {
        let mut totals = BTreeMap::new();
        for entry in entries {
            let total: &mut u64 = totals.entry(MonthKey::from_date(entry.day)).or_default();
            *total = total.saturating_add(entry.downloads);
        }

        Self { totals }
    }

    /// The total for a month, if the package has any entries in it.
    #[must_use]
    pub fn get(&self, month: MonthKey) -> Option<u64> {
        self.totals.get(&month).copied()
    }

    /// The months present, oldest first.
    pub fn months(&self) -> impl Iterator<Item = MonthKey> + '_ {
        self.totals.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Sum over all months.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.totals.values().fold(0, |acc, v| acc.saturating_add(*v))
    }
}

impl FromIterator<(MonthKey, u64)> for MonthlyBuckets {
    fn from_iter<I: IntoIterator<Item = (MonthKey, u64)>>(iter: I) -> Self {
        let mut totals = BTreeMap::new();
        for (month, count) in iter {
            let total: &mut u64 = totals.entry(month).or_default();
            *total = total.saturating_add(count);
        }

        Self { totals }
    }
}
