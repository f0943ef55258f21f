use super::common;
use crate::Result;
use crate::trends::{NumberStyle, TrendReport, format_magnitude};
use core::fmt::Write;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

const MONTH_HEADER: &str = "Month";
const COLUMN_GAP: usize = 2;

pub fn generate<W: Write>(report: &TrendReport, style: NumberStyle, use_colors: bool, writer: &mut W) -> Result<()> {
    write_table(report, style, use_colors, get_terminal_width(), writer)?;
    write_details(report, style, use_colors, writer)
}

/// Write the monthly table, splitting the package columns into several blocks when they
/// don't all fit in `width` columns. Every block repeats the month column.
fn write_table<W: Write>(report: &TrendReport, style: NumberStyle, use_colors: bool, width: usize, writer: &mut W) -> Result<()> {
    let table = &report.table;
    if table.is_empty() {
        return Ok(());
    }

    write_heading(&common::report_title(report.registry), use_colors, writer)?;
    writeln!(writer, "{} to {}, {} merge", report.window.start(), report.window.end(), report.strategy)?;

    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.counts.iter().map(|c| format_magnitude(*c, style)).collect())
        .collect();

    let month_width = MONTH_HEADER.len().max(7);
    let column_widths: Vec<usize> = table
        .packages
        .iter()
        .enumerate()
        .map(|(col, name)| cells.iter().map(|r| r[col].len()).chain([name.chars().count()]).max().unwrap_or(0))
        .collect();

    for block in column_blocks(&column_widths, month_width, width) {
        writeln!(writer)?;

        let mut header = format!("{MONTH_HEADER:<month_width$}");
        for col in block.clone() {
            let w = column_widths[col];
            write!(header, "{:gap$}{:>w$}", "", table.packages[col], gap = COLUMN_GAP)?;
        }

        if use_colors {
            writeln!(writer, "{}", header.bold())?;
        } else {
            writeln!(writer, "{header}")?;
        }

        for (row, row_cells) in table.rows.iter().zip(&cells) {
            write!(writer, "{:<month_width$}", row.month.to_string())?;
            for col in block.clone() {
                let w = column_widths[col];
                write!(writer, "{:gap$}{:>w$}", "", row_cells[col], gap = COLUMN_GAP)?;
            }
            writeln!(writer)?;
        }
    }

    Ok(())
}

fn write_details<W: Write>(report: &TrendReport, style: NumberStyle, use_colors: bool, writer: &mut W) -> Result<()> {
    if report.packages.is_empty() {
        return Ok(());
    }

    writeln!(writer)?;
    write_heading(common::DETAILS_TITLE, use_colors, writer)?;

    let name_width = report.packages.iter().map(|p| p.name().chars().count()).max().unwrap_or(0);
    for series in &report.packages {
        let name = format!("{:<name_width$}", series.name());
        let name = if use_colors { name.bold().to_string() } else { name };

        write!(writer, "  {name} : {} downloads", format_magnitude(series.total_downloads(), style))?;
        if let Some(metadata) = &series.metadata {
            write!(
                writer,
                ", created {}, updated {}",
                common::format_date(metadata.created),
                common::format_date(metadata.last_modified)
            )?;
        }
        writeln!(writer)?;

        writeln!(writer, "  {:name_width$}   {}", "", series.registry_link)?;
        if let Some(repo) = series.metadata.as_ref().and_then(|m| m.repository_link.as_deref()) {
            writeln!(writer, "  {:name_width$}   {repo}", "")?;
        }
    }

    Ok(())
}

fn write_heading<W: Write>(text: &str, use_colors: bool, writer: &mut W) -> Result<()> {
    if use_colors {
        writeln!(writer, "{}", text.cyan().bold())?;
    } else {
        writeln!(writer, "{text}")?;
    }

    Ok(())
}

/// Group consecutive column indices so that each group, together with the month column, fits in `width`.
///
/// A column wider than `width` on its own still gets a block of its own.
fn column_blocks(column_widths: &[usize], month_width: usize, width: usize) -> Vec<core::ops::Range<usize>> {
    let mut blocks = Vec::new();
    let mut start = 0;
    let mut used = month_width;

    for (col, w) in column_widths.iter().enumerate() {
        let needed = COLUMN_GAP + w;
        if col > start && used + needed > width {
            blocks.push(start..col);
            start = col;
            used = month_width;
        }
        used += needed;
    }

    if start < column_widths.len() {
        blocks.push(start..column_widths.len());
    }

    blocks
}

/// Get the terminal width, defaulting to 80 if not detectable
fn get_terminal_width() -> usize {
    terminal_size().map_or(80, |(Width(w), _)| w as usize)
}
