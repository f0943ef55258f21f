use super::common::escape_csv;
use crate::Result;
use crate::trends::TrendReport;
use core::fmt::Write;

/// Write the merged table as CSV: a `month` column followed by one column of raw counts per package.
pub fn generate<W: Write>(report: &TrendReport, writer: &mut W) -> Result<()> {
    write!(writer, "month")?;
    for package in &report.table.packages {
        write!(writer, ",{}", escape_csv(package))?;
    }
    writeln!(writer)?;

    for row in &report.table.rows {
        write!(writer, "{}", row.month)?;
        for count in &row.counts {
            write!(writer, ",{count}")?;
        }
        writeln!(writer)?;
    }

    Ok(())
}
