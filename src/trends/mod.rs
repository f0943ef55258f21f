//! Monthly download trends across packages
//!
//! Raw daily counts are grouped into [`MonthlyBuckets`], the buckets of several
//! packages are aligned on a common month axis by [`merge_series`], and the
//! [`TrendAggregator`] ties fetching and merging together into a [`TrendReport`].
//! [`format_magnitude`] renders counts for display.

mod aggregator;
mod bucket;
mod format;
mod merge;
mod month_key;
mod report;

pub use aggregator::{TrendAggregator, build_report};
pub use bucket::MonthlyBuckets;
pub use format::{NumberStyle, format_magnitude};
pub use merge::{MergeStrategy, MergedRow, MergedTable, merge_series};
pub use month_key::MonthKey;
pub use report::{PackageFailure, TrendReport};
