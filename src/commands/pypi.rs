use super::Host;
use super::common::{Common, CommonArgs, select_packages};
use crate::Result;
use crate::registry::PackageSpec;
use crate::registry::pypi::{DownloadCategory, Provider};
use clap::Parser;

#[derive(Parser, Debug)]
pub struct PypiArgs {
    /// Packages to chart, the first one anchoring the months (default is the configured list)
    #[arg(value_name = "PACKAGE")]
    pub packages: Vec<PackageSpec>,

    /// Only count downloads of this category [default: all rows]
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<DownloadCategory>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn process_pypi<H: Host>(host: &mut H, args: &PypiArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;
    let packages = select_packages(&args.packages, &common.config.pypi.packages)?;

    let pypi = &common.config.pypi;
    let provider = Provider::new(
        common.client()?,
        Some(pypi.api_url.as_str()),
        pypi.proxy_url.as_deref(),
        args.category.or(pypi.category),
    );
    let report = common.aggregate(provider, &packages).await?;

    common.report(&report)
}
