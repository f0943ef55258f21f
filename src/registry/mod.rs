//! Package registries and the download series they produce
//!
//! This module knows how to talk to the public statistics endpoints of package
//! registries. Each registry is a [`Registry`] implementation that turns a
//! [`PackageSpec`] and a [`DateWindow`] into a [`PackageSeries`]: the package's
//! downloads grouped into monthly buckets, plus whatever descriptive metadata the
//! registry offers.
//!
//! # Implementation Model
//!
//! - **npm**: daily counts from the downloads range API, queried in chunks, plus the
//!   package document from the registry for creation/modification dates and the
//!   source repository link
//! - **`PyPI`**: daily counts from the pypistats.org `overall` endpoint, optionally
//!   through a proxy that wraps the body in `{ "contents": "..." }`
//!
//! Every fetch is best-effort: one GET per endpoint, bounded by the client timeout,
//! with the outcome reported as a [`ProviderResult`] so that one package's failure
//! never affects another.

mod date_window;
pub(crate) mod http;
pub mod npm;
mod package_series;
mod package_spec;
mod provider_result;
pub mod pypi;

pub use date_window::DateWindow;
pub use http::build_client;
pub use package_series::{DownloadEntry, PackageMetadata, PackageSeries};
pub use package_spec::PackageSpec;
pub use provider_result::ProviderResult;

use serde::Serialize;

/// The registries download statistics can be fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
pub enum RegistryKind {
    #[strum(to_string = "npm")]
    Npm,

    #[strum(to_string = "PyPI")]
    Pypi,
}

/// A source of per-package download series.
pub trait Registry: Send + Sync {
    /// Which registry this is.
    fn kind(&self) -> RegistryKind;

    /// Fetch the download series for one package over the given window.
    ///
    /// Failures are reported in the result rather than propagated.
    fn fetch_series(&self, package: &PackageSpec, window: DateWindow) -> impl Future<Output = ProviderResult<PackageSeries>> + Send;
}
