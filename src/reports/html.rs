use super::common::{self, html_escape};
use crate::Result;
use crate::trends::{MergedTable, NumberStyle, TrendReport, format_magnitude};
use chrono::{DateTime, Local};
use core::fmt::Write;

const CHART_WIDTH: f64 = 960.0;
const CHART_HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 60.0;
const Y_TICKS: u64 = 5;
const MAX_X_LABELS: usize = 12;

pub fn generate<W: Write>(report: &TrendReport, style: NumberStyle, timestamp: DateTime<Local>, writer: &mut W) -> Result<()> {
    let title = common::report_title(report.registry);

    writeln!(writer, "<!DOCTYPE html>")?;
    writeln!(writer, "<html>")?;
    writeln!(writer, "<head>")?;
    writeln!(writer, "  <meta charset=\"UTF-8\">")?;
    writeln!(writer, "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">")?;
    writeln!(writer, "  <title>{}</title>", html_escape(&title))?;
    write_styles(writer)?;
    writeln!(writer, "</head>")?;
    writeln!(writer, "<body>")?;

    write_header(writer, report, &title, timestamp)?;

    writeln!(writer, "  <div class=\"card\">")?;
    writeln!(writer, "    <h2>{}</h2>", common::CHART_TITLE)?;
    if report.table.is_empty() {
        writeln!(writer, "    <p class=\"empty\">No download data available.</p>")?;
    } else {
        write_chart(writer, report, style)?;
    }
    writeln!(writer, "  </div>")?;

    if !report.packages.is_empty() {
        write_details(writer, report, style)?;
    }

    if report.has_failures() {
        write_failures(writer, report)?;
    }

    writeln!(writer, "</body>")?;
    writeln!(writer, "</html>")?;

    Ok(())
}

fn write_styles<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "  <style>")?;
    writeln!(writer, "    :root {{")?;
    writeln!(writer, "      --bg-color: #f0f2f5;")?;
    writeln!(writer, "      --card-bg: #ffffff;")?;
    writeln!(writer, "      --text-color: #1f2937;")?;
    writeln!(writer, "      --text-secondary: #64748b;")?;
    writeln!(writer, "      --border-color: #d1d5db;")?;
    writeln!(writer, "      --head-bg: #e5e7eb;")?;
    writeln!(writer, "      --hover-bg: #f9fafb;")?;
    writeln!(writer, "      --link-color: #2563eb;")?;
    writeln!(writer, "      --grid-color: #e0e0e0;")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "    @media (prefers-color-scheme: dark) {{")?;
    writeln!(writer, "      :root {{")?;
    writeln!(writer, "        --bg-color: #0f172a;")?;
    writeln!(writer, "        --card-bg: #1e293b;")?;
    writeln!(writer, "        --text-color: #e2e8f0;")?;
    writeln!(writer, "        --text-secondary: #94a3b8;")?;
    writeln!(writer, "        --border-color: #334155;")?;
    writeln!(writer, "        --head-bg: #263044;")?;
    writeln!(writer, "        --hover-bg: #263044;")?;
    writeln!(writer, "        --link-color: #60a5fa;")?;
    writeln!(writer, "        --grid-color: #334155;")?;
    writeln!(writer, "      }}")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "    * {{ box-sizing: border-box; }}")?;
    writeln!(writer, "    body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; margin: 0; padding: 32px; background: var(--bg-color); color: var(--text-color); line-height: 1.5; }}")?;
    writeln!(writer, "    h1 {{ margin: 0 0 2px 0; font-size: 26px; font-weight: 700; }}")?;
    writeln!(writer, "    h2 {{ margin: 0 0 16px 0; font-size: 22px; font-weight: 600; }}")?;
    writeln!(writer, "    .header {{ margin-bottom: 24px; }}")?;
    writeln!(writer, "    .subtitle {{ margin: 0; font-size: 13px; color: var(--text-secondary); }}")?;
    writeln!(writer, "    .card {{ background: var(--card-bg); border-radius: 8px; padding: 24px; margin-bottom: 24px; box-shadow: 0 1px 3px rgba(0,0,0,0.08), 0 4px 16px rgba(0,0,0,0.04); }}")?;
    writeln!(writer, "    .chart {{ width: 100%; height: auto; }}")?;
    writeln!(writer, "    .chart text {{ fill: var(--text-color); font-size: 12px; }}")?;
    writeln!(writer, "    .chart .grid {{ stroke: var(--grid-color); stroke-dasharray: 3 3; }}")?;
    writeln!(writer, "    .chart .axis {{ stroke: var(--text-secondary); }}")?;
    writeln!(writer, "    .legend {{ display: flex; flex-wrap: wrap; gap: 16px; justify-content: center; margin-top: 8px; font-size: 14px; }}")?;
    writeln!(writer, "    .swatch {{ display: inline-block; width: 12px; height: 12px; border-radius: 50%; margin-right: 8px; vertical-align: middle; }}")?;
    writeln!(writer, "    table {{ width: 100%; border-collapse: collapse; text-align: left; }}")?;
    writeln!(writer, "    th, td {{ border: 1px solid var(--border-color); padding: 12px; }}")?;
    writeln!(writer, "    th {{ background: var(--head-bg); }}")?;
    writeln!(writer, "    tr:hover td {{ background: var(--hover-bg); }}")?;
    writeln!(writer, "    a {{ color: var(--link-color); text-decoration: none; }}")?;
    writeln!(writer, "    a:hover {{ text-decoration: underline; }}")?;
    writeln!(writer, "    .empty {{ color: var(--text-secondary); }}")?;
    writeln!(writer, "    .failures li {{ margin-bottom: 4px; }}")?;
    writeln!(writer, "  </style>")?;
    Ok(())
}

fn write_header<W: Write>(writer: &mut W, report: &TrendReport, title: &str, timestamp: DateTime<Local>) -> Result<()> {
    writeln!(writer, "  <div class=\"header\">")?;
    writeln!(writer, "    <h1>{}</h1>", html_escape(title))?;
    writeln!(
        writer,
        "    <p class=\"subtitle\">Monthly downloads from {} to {} ({} merge). Produced by pkg-trends {} on {}</p>",
        report.window.start(),
        report.window.end(),
        report.strategy,
        env!("CARGO_PKG_VERSION"),
        timestamp.format("%Y-%m-%d")
    )?;
    writeln!(writer, "  </div>")?;
    Ok(())
}

/// Render the merged table as an SVG line chart with one line per package.
#[expect(clippy::cast_precision_loss, reason = "Counts and indices only need to be approximately placed on the chart")]
fn write_chart<W: Write>(writer: &mut W, report: &TrendReport, style: NumberStyle) -> Result<()> {
    let table = &report.table;
    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let y_max = axis_ceiling(table.max_count());
    let plot_bottom = MARGIN_TOP + plot_height;

    let x_at = |index: usize| {
        if table.rows.len() <= 1 {
            MARGIN_LEFT + plot_width / 2.0
        } else {
            MARGIN_LEFT + plot_width * index as f64 / (table.rows.len() - 1) as f64
        }
    };
    let y_at = |value: u64| plot_bottom - plot_height * value as f64 / y_max as f64;

    writeln!(
        writer,
        "    <svg class=\"chart\" viewBox=\"0 0 {CHART_WIDTH} {CHART_HEIGHT}\" xmlns=\"http://www.w3.org/2000/svg\" role=\"img\">"
    )?;

    // Horizontal grid lines and y-axis labels
    for tick in 0..=Y_TICKS {
        let value = y_max / Y_TICKS * tick;
        let y = y_at(value);
        writeln!(
            writer,
            "      <line class=\"grid\" x1=\"{MARGIN_LEFT}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\"/>",
            MARGIN_LEFT + plot_width
        )?;
        writeln!(
            writer,
            "      <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">{}</text>",
            MARGIN_LEFT - 8.0,
            y + 4.0,
            format_magnitude(value, style)
        )?;
    }

    // Month labels on the x-axis
    let label_step = table.rows.len().div_ceil(MAX_X_LABELS).max(1);
    for (index, row) in table.rows.iter().enumerate().step_by(label_step) {
        let x = x_at(index);
        writeln!(
            writer,
            "      <line class=\"grid\" x1=\"{x:.1}\" y1=\"{MARGIN_TOP}\" x2=\"{x:.1}\" y2=\"{plot_bottom:.1}\"/>"
        )?;
        writeln!(
            writer,
            "      <text x=\"{x:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>",
            plot_bottom + 18.0,
            row.month
        )?;
    }

    writeln!(
        writer,
        "      <line class=\"axis\" x1=\"{MARGIN_LEFT}\" y1=\"{plot_bottom:.1}\" x2=\"{:.1}\" y2=\"{plot_bottom:.1}\"/>",
        MARGIN_LEFT + plot_width
    )?;
    writeln!(
        writer,
        "      <line class=\"axis\" x1=\"{MARGIN_LEFT}\" y1=\"{MARGIN_TOP}\" x2=\"{MARGIN_LEFT}\" y2=\"{plot_bottom:.1}\"/>"
    )?;
    writeln!(
        writer,
        "      <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">Month</text>",
        MARGIN_LEFT + plot_width,
        CHART_HEIGHT - 10.0
    )?;
    writeln!(
        writer,
        "      <text x=\"16\" y=\"{:.1}\" text-anchor=\"middle\" transform=\"rotate(-90 16 {:.1})\">Downloads</text>",
        MARGIN_TOP + plot_height / 2.0,
        MARGIN_TOP + plot_height / 2.0
    )?;

    for (col, package) in table.packages.iter().enumerate() {
        let color = common::css_color(common::series_color(report.registry, col));
        let points: Vec<String> = table
            .column(col)
            .enumerate()
            .map(|(index, value)| format!("{:.1},{:.1}", x_at(index), y_at(value)))
            .collect();

        writeln!(
            writer,
            "      <polyline fill=\"none\" stroke=\"{color}\" stroke-width=\"2\" stroke-linejoin=\"round\" points=\"{}\"><title>{}</title></polyline>",
            points.join(" "),
            html_escape(package)
        )?;

        for (index, (row, value)) in table.rows.iter().zip(table.column(col)).enumerate() {
            writeln!(
                writer,
                "      <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"{color}\" fill-opacity=\"0\"><title>Month: {}\n{}: {} downloads</title></circle>",
                x_at(index),
                y_at(value),
                row.month,
                html_escape(package),
                format_magnitude(value, style)
            )?;
        }
    }

    writeln!(writer, "    </svg>")?;
    write_legend(writer, report, table)?;
    Ok(())
}

fn write_legend<W: Write>(writer: &mut W, report: &TrendReport, table: &MergedTable) -> Result<()> {
    writeln!(writer, "    <div class=\"legend\">")?;
    for (col, package) in table.packages.iter().enumerate() {
        let color = common::css_color(common::series_color(report.registry, col));
        writeln!(
            writer,
            "      <span><span class=\"swatch\" style=\"background-color: {color}\"></span>{}</span>",
            html_escape(package)
        )?;
    }
    writeln!(writer, "    </div>")?;
    Ok(())
}

fn write_details<W: Write>(writer: &mut W, report: &TrendReport, style: NumberStyle) -> Result<()> {
    let with_dates = report.has_metadata();

    writeln!(writer, "  <div class=\"card\">")?;
    writeln!(writer, "    <h2>{}</h2>", common::DETAILS_TITLE)?;
    writeln!(writer, "    <table>")?;
    writeln!(writer, "      <thead>")?;
    writeln!(writer, "        <tr>")?;
    writeln!(writer, "          <th>Package</th>")?;
    if with_dates {
        writeln!(writer, "          <th>Created Date</th>")?;
        writeln!(writer, "          <th>Last Updated</th>")?;
    }
    writeln!(writer, "          <th>Total Downloads</th>")?;
    writeln!(writer, "          <th>Links</th>")?;
    writeln!(writer, "        </tr>")?;
    writeln!(writer, "      </thead>")?;
    writeln!(writer, "      <tbody>")?;

    for (index, series) in report.packages.iter().enumerate() {
        let color = common::css_color(common::series_color(report.registry, index));
        let name = html_escape(series.name());

        writeln!(writer, "        <tr>")?;
        writeln!(
            writer,
            "          <td><span class=\"swatch\" style=\"background-color: {color}\"></span>{name}</td>"
        )?;
        if with_dates {
            let metadata = series.metadata.as_ref();
            writeln!(writer, "          <td>{}</td>", common::format_date(metadata.and_then(|m| m.created)))?;
            writeln!(writer, "          <td>{}</td>", common::format_date(metadata.and_then(|m| m.last_modified)))?;
        }
        writeln!(writer, "          <td>{}</td>", format_magnitude(series.total_downloads(), style))?;

        write!(
            writer,
            "          <td><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
            html_escape(&series.registry_link),
            report.registry
        )?;
        if let Some(repo) = series.metadata.as_ref().and_then(|m| m.repository_link.as_deref()) {
            write!(
                writer,
                " | <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Source</a>",
                html_escape(repo)
            )?;
        }
        writeln!(writer, "</td>")?;
        writeln!(writer, "        </tr>")?;
    }

    writeln!(writer, "      </tbody>")?;
    writeln!(writer, "    </table>")?;
    writeln!(writer, "  </div>")?;
    Ok(())
}

fn write_failures<W: Write>(writer: &mut W, report: &TrendReport) -> Result<()> {
    writeln!(writer, "  <div class=\"card failures\">")?;
    writeln!(writer, "    <h2>Unavailable Packages</h2>")?;
    writeln!(writer, "    <ul>")?;
    for failure in &report.failures {
        writeln!(
            writer,
            "      <li><strong>{}</strong>: {}</li>",
            html_escape(failure.package.name()),
            html_escape(&failure.error.to_string())
        )?;
    }
    writeln!(writer, "    </ul>")?;
    writeln!(writer, "  </div>")?;
    Ok(())
}

/// Smallest round number at or above `max` that divides evenly into the y-axis ticks.
///
/// The result is `Y_TICKS` times 1, 2, or 5 times a power of ten, and never zero.
fn axis_ceiling(max: u64) -> u64 {
    let raw_step = max.div_ceil(Y_TICKS).max(1);

    let mut magnitude: u64 = 1;
    while magnitude <= raw_step / 10 {
        magnitude *= 10;
    }

    let step = [1, 2, 5, 10]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw_step)
        .unwrap_or(10 * magnitude);

    step.saturating_mul(Y_TICKS)
}
