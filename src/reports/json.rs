use crate::Result;
use crate::trends::TrendReport;
use core::fmt::Write;
use serde_json::json;

#[expect(unused_results, reason = "Map::insert intentionally overwrites values")]
pub fn generate<W: Write>(report: &TrendReport, writer: &mut W) -> Result<()> {
    let mut packages = Vec::with_capacity(report.packages.len());
    for series in &report.packages {
        let mut package_obj = serde_json::Map::new();
        package_obj.insert("name".to_string(), json!(series.name()));
        package_obj.insert("total_downloads".to_string(), json!(series.total_downloads()));
        package_obj.insert("registry_link".to_string(), json!(series.registry_link));

        if let Some(metadata) = &series.metadata {
            package_obj.insert("metadata".to_string(), serde_json::to_value(metadata)?);
        }

        packages.push(json!(package_obj));
    }

    let months: Vec<_> = report
        .table
        .rows
        .iter()
        .map(|row| {
            let mut downloads = serde_json::Map::new();
            for (package, count) in report.table.packages.iter().zip(&row.counts) {
                downloads.insert(package.to_string(), json!(count));
            }

            json!({
                "month": row.month,
                "downloads": downloads,
            })
        })
        .collect();

    let failures: Vec<_> = report
        .failures
        .iter()
        .map(|failure| {
            json!({
                "name": failure.package,
                "error": failure.error.to_string(),
            })
        })
        .collect();

    let output = json!({
        "registry": report.registry,
        "window": report.window,
        "merge_strategy": report.strategy,
        "packages": packages,
        "months": months,
        "failures": failures,
    });

    write!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}
