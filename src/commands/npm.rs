use super::Host;
use super::common::{Common, CommonArgs, select_packages};
use crate::Result;
use crate::registry::PackageSpec;
use crate::registry::npm::Provider;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct NpmArgs {
    /// Packages to chart, the first one anchoring the months (default is the configured list)
    #[arg(value_name = "PACKAGE")]
    pub packages: Vec<PackageSpec>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn process_npm<H: Host>(host: &mut H, args: &NpmArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;
    let packages = select_packages(&args.packages, &common.config.npm.packages)?;

    let npm = &common.config.npm;
    let provider = Provider::new(common.client()?, Some(npm.downloads_url.as_str()), Some(npm.registry_url.as_str()));
    let report = common.aggregate(provider, &packages).await?;

    common.report(&report)
}
