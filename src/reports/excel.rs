use super::common;
use crate::Result;
use crate::trends::TrendReport;
use rust_xlsxwriter::{Chart, ChartFormat, ChartLine, ChartType, Color, DocProperties, Format, FormatAlign, Workbook, Worksheet};
use std::io::Write;

const MONTHLY_SHEET: &str = "Monthly Downloads";
const PACKAGES_SHEET: &str = "Packages";
const FAILURES_SHEET: &str = "Failures";

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
pub fn generate<W: Write>(report: &TrendReport, writer: &mut W) -> Result<()> {
    let mut workbook = Workbook::new();

    let properties = DocProperties::new()
        .set_author("pkg-trends")
        .set_title(&common::report_title(report.registry));
    workbook.set_properties(&properties);

    let bold_format = Format::new().set_bold();
    let count_format = Format::new().set_num_format("#,##0");
    let left_align_format = Format::new().set_align(FormatAlign::Left);

    let worksheet = workbook.add_worksheet().set_name(MONTHLY_SHEET)?;
    write_monthly_sheet(worksheet, report, &bold_format, &count_format)?;

    let worksheet = workbook.add_worksheet().set_name(PACKAGES_SHEET)?;
    write_packages_sheet(worksheet, report, &bold_format, &count_format, &left_align_format)?;

    if report.has_failures() {
        let worksheet = workbook.add_worksheet().set_name(FAILURES_SHEET)?;
        worksheet.write_string_with_format(0, 0, "Package", &bold_format)?;
        worksheet.write_string_with_format(0, 1, "Error", &bold_format)?;
        for (index, failure) in report.failures.iter().enumerate() {
            #[expect(clippy::cast_possible_truncation, reason = "Row index limited by Excel's u32 row limit")]
            let row = (index + 1) as u32;
            worksheet.write_string(row, 0, failure.package.name())?;
            worksheet.write_string(row, 1, failure.error.to_string())?;
        }
        worksheet.autofit();
    }

    let data = workbook.save_to_buffer()?;
    writer.write_all(&data)?;

    Ok(())
}

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
#[expect(clippy::cast_possible_truncation, reason = "Row and column indices limited by Excel's sheet limits")]
#[expect(clippy::cast_precision_loss, reason = "Excel stores all numbers as f64")]
fn write_monthly_sheet(worksheet: &mut Worksheet, report: &TrendReport, bold_format: &Format, count_format: &Format) -> Result<()> {
    let table = &report.table;

    worksheet.write_string_with_format(0, 0, "Month", bold_format)?;
    for (col_idx, package) in table.packages.iter().enumerate() {
        worksheet.write_string_with_format(0, (col_idx + 1) as u16, &**package, bold_format)?;
    }
    worksheet.set_freeze_panes(1, 1)?;

    for (row_idx, row) in table.rows.iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        worksheet.write_string(excel_row, 0, row.month.to_string())?;
        for (col_idx, count) in row.counts.iter().enumerate() {
            worksheet.write_number_with_format(excel_row, (col_idx + 1) as u16, *count as f64, count_format)?;
        }
    }

    worksheet.autofit();

    if table.is_empty() || table.packages.is_empty() {
        return Ok(());
    }

    let last_row = table.rows.len() as u32;
    let mut chart = Chart::new(ChartType::Line);
    for col_idx in 0..table.packages.len() {
        let col = (col_idx + 1) as u16;
        chart
            .add_series()
            .set_name((MONTHLY_SHEET, 0, col))
            .set_categories((MONTHLY_SHEET, 1, 0, last_row, 0))
            .set_values((MONTHLY_SHEET, 1, col, last_row, col))
            .set_format(
                ChartFormat::new().set_line(ChartLine::new().set_color(Color::RGB(common::series_color(report.registry, col_idx))).set_width(2.0)),
            );
    }

    chart.title().set_name(common::CHART_TITLE);
    chart.x_axis().set_name("Month");
    chart.y_axis().set_name("Downloads");
    chart.set_width(960).set_height(500);

    worksheet.insert_chart(1, (table.packages.len() + 2) as u16, &chart)?;

    Ok(())
}

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
#[expect(clippy::cast_possible_truncation, reason = "Row index limited by Excel's u32 row limit")]
#[expect(clippy::cast_precision_loss, reason = "Excel stores all numbers as f64")]
fn write_packages_sheet(
    worksheet: &mut Worksheet,
    report: &TrendReport,
    bold_format: &Format,
    count_format: &Format,
    left_align_format: &Format,
) -> Result<()> {
    let headers = ["Package", "Total Downloads", "Created Date", "Last Updated", "Registry", "Source"];
    for (col, header) in (0u16..).zip(headers) {
        worksheet.write_string_with_format(0, col, header, bold_format)?;
    }

    for (index, series) in report.packages.iter().enumerate() {
        let row = (index + 1) as u32;
        worksheet.write_string(row, 0, series.name())?;
        worksheet.write_number_with_format(row, 1, series.total_downloads() as f64, count_format)?;

        if let Some(metadata) = &series.metadata {
            worksheet.write_string_with_format(row, 2, common::format_date(metadata.created), left_align_format)?;
            worksheet.write_string_with_format(row, 3, common::format_date(metadata.last_modified), left_align_format)?;
            if let Some(repo) = &metadata.repository_link {
                worksheet.write_url(row, 5, repo.as_str())?;
            }
        }

        worksheet.write_url(row, 4, series.registry_link.as_str())?;
    }

    worksheet.set_freeze_panes(1, 0)?;
    worksheet.autofit();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::fixtures;

    fn render(report: &TrendReport) -> Vec<u8> {
        let mut output = Vec::new();
        generate(report, &mut output).unwrap();
        output
    }

    #[test]
    fn test_generate_produces_xlsx_archive() {
        let output = render(&fixtures::npm_report());
        assert!(output.len() > 1_000);
        assert_eq!(&output[..2], b"PK");
    }

    #[test]
    fn test_generate_without_metadata() {
        let output = render(&fixtures::pypi_report());
        assert_eq!(&output[..2], b"PK");
    }

    #[test]
    fn test_generate_empty_report() {
        let output = render(&fixtures::empty_report());
        assert_eq!(&output[..2], b"PK");
    }
}
