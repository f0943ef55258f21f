use clap::ValueEnum;
use serde::{Deserialize, Serialize};

const CRORE: u64 = 10_000_000;
const LAKH: u64 = 100_000;
const THOUSAND: u64 = 1_000;

/// Numbering convention used when showing download counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum, strum::Display, strum::EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NumberStyle {
    /// Abbreviate with crore (Cr), lakh (L), and thousand (K) units, e.g. `2.5 L`
    #[default]
    Indian,

    /// Full number with digits grouped in thousands, e.g. `250,000`
    Western,
}

/// Render a download count for display.
///
/// With [`NumberStyle::Indian`], values of at least ten million are shown in crores,
/// at least one hundred thousand in lakhs, and at least one thousand in thousands, each
/// with one decimal place; smaller values are shown as-is. Halves round up.
/// With [`NumberStyle::Western`], the full value is shown with `,` between groups of
/// three digits.
#[must_use]
pub fn format_magnitude(value: u64, style: NumberStyle) -> String {
    match style {
        NumberStyle::Indian => {
            if value >= CRORE {
                format!("{} Cr", one_decimal(value, CRORE))
            } else if value >= LAKH {
                format!("{} L", one_decimal(value, LAKH))
            } else if value >= THOUSAND {
                format!("{} K", one_decimal(value, THOUSAND))
            } else {
                value.to_string()
            }
        }
        NumberStyle::Western => group_thousands(value),
    }
}

/// `value / divisor` with one decimal place, computed exactly.
fn one_decimal(value: u64, divisor: u64) -> String {
    let divisor = u128::from(divisor);
    let tenths = (u128::from(value) * 10 + divisor / 2) / divisor;
    format!("{}.{}", tenths / 10, tenths % 10)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indian(value: u64) -> String {
        format_magnitude(value, NumberStyle::Indian)
    }

    fn western(value: u64) -> String {
        format_magnitude(value, NumberStyle::Western)
    }

    #[test]
    fn test_indian_reference_values() {
        assert_eq!(indian(999), "999");
        assert_eq!(indian(1500), "1.5 K");
        assert_eq!(indian(250_000), "2.5 L");
        assert_eq!(indian(15_000_000), "1.5 Cr");
    }

    #[test]
    fn test_indian_thresholds() {
        assert_eq!(indian(0), "0");
        assert_eq!(indian(1_000), "1.0 K");
        assert_eq!(indian(99_999), "100.0 K");
        assert_eq!(indian(100_000), "1.0 L");
        assert_eq!(indian(9_999_999), "100.0 L");
        assert_eq!(indian(10_000_000), "1.0 Cr");
    }

    #[test]
    fn test_indian_rounds_half_up() {
        assert_eq!(indian(1_250), "1.3 K");
        assert_eq!(indian(1_249), "1.2 K");
        assert_eq!(indian(1_050), "1.1 K");
    }

    #[test]
    fn test_indian_large_values() {
        assert_eq!(indian(123_456_789_012), "12345.7 Cr");
        assert_eq!(indian(u64::MAX), "1844674407371.0 Cr");
    }

    #[test]
    fn test_western_grouping() {
        assert_eq!(western(0), "0");
        assert_eq!(western(999), "999");
        assert_eq!(western(1_000), "1,000");
        assert_eq!(western(250_000), "250,000");
        assert_eq!(western(1_234_567), "1,234,567");
        assert_eq!(western(u64::MAX), "18,446,744,073,709,551,615");
    }

    #[test]
    fn test_style_names() {
        assert_eq!(NumberStyle::Indian.to_string(), "indian");
        assert_eq!(NumberStyle::Western.to_string(), "western");
        assert_eq!(NumberStyle::default(), NumberStyle::Indian);
    }
}
