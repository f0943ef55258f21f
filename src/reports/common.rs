use crate::registry::RegistryKind;
use chrono::{DateTime, Utc};
use std::borrow::Cow;

/// Line colors for npm packages: blue, red, green, purple.
const NPM_PALETTE: [u32; 4] = [0x0021_96F3, 0x00F4_4336, 0x004C_AF50, 0x009C_27B0];

/// Line colors for `PyPI` packages.
const PYPI_PALETTE: [u32; 8] = [
    0x001F_77B4, // blue
    0x00FF_7F0E, // orange
    0x002C_A02C, // green
    0x00D6_2728, // red
    0x0094_67BD, // purple
    0x008C_564B, // brown
    0x00E3_77C2, // pink
    0x007F_7F7F, // gray
];

pub const CHART_TITLE: &str = "Download Trend (All Time - Monthly)";
pub const DETAILS_TITLE: &str = "Package Details";

/// The RGB color of the `index`-th package's line, cycling through the registry's palette.
pub fn series_color(registry: RegistryKind, index: usize) -> u32 {
    let palette: &[u32] = match registry {
        RegistryKind::Npm => &NPM_PALETTE,
        RegistryKind::Pypi => &PYPI_PALETTE,
    };

    palette[index % palette.len()]
}

/// `#RRGGBB` form of a series color.
pub fn css_color(rgb: u32) -> String {
    format!("#{rgb:06X}")
}

pub fn report_title(registry: RegistryKind) -> String {
    format!("{registry} Download Trends")
}

pub fn format_date(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(|| "n/a".to_string(), |dt| dt.format("%Y-%m-%d").to_string())
}

/// Escape a value for RFC compliant CSV output.
///
/// Wraps the value in double quotes if it contains commas, newlines, or double quotes.
/// Internal double quotes are doubled per the RFC.
pub fn escape_csv(s: &str) -> Cow<'_, str> {
    if s.contains('"') {
        Cow::Owned(format!("\"{}\"", s.replace('"', "\"\"")))
    } else if s.contains(',') || s.contains('\n') || s.contains('\r') {
        Cow::Owned(format!("\"{s}\""))
    } else {
        Cow::Borrowed(s)
    }
}

pub fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
