use chrono::{Datelike, NaiveDate};
use core::fmt::{Display, Formatter, Result as FmtResult};
use core::str::FromStr;
use serde::{Serialize, Serializer};

/// A calendar month, displayed as `YYYY-MM`.
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Returns `None` unless `month` is in `1..=12`.
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if month >= 1 && month <= 12 {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month a day falls in.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        let (year, month) = s.split_once('-').ok_or_else(|| format!("invalid month '{s}', expected YYYY-MM"))?;
        let year: i32 = year.parse().map_err(|e| format!("invalid year in month '{s}': {e}"))?;
        let month: u32 = month.parse().map_err(|e| format!("invalid month number in '{s}': {e}"))?;
        Self::new(year, month).ok_or_else(|| format!("month number out of range in '{s}'"))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_month() {
        assert!(MonthKey::new(2024, 0).is_none());
        assert!(MonthKey::new(2024, 13).is_none());
        assert!(MonthKey::new(2024, 12).is_some());
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(MonthKey::new(2024, 3).unwrap().to_string(), "2024-03");
        assert_eq!(MonthKey::new(987, 11).unwrap().to_string(), "0987-11");
    }

    #[test]
    fn test_from_date_matches_day_prefix() {
        let date = NaiveDate::from_ymd_opt(2015, 1, 31).unwrap();
        let key = MonthKey::from_date(date);
        assert_eq!(key.to_string(), &date.to_string()[..7]);
    }

    #[test]
    fn test_ordering_is_chronological() {
        let dec = MonthKey::new(2023, 12).unwrap();
        let jan = MonthKey::new(2024, 1).unwrap();
        let feb = MonthKey::new(2024, 2).unwrap();
        assert!(dec < jan);
        assert!(jan < feb);
    }

    #[test]
    fn test_parse() {
        let key: MonthKey = "2024-02".parse().unwrap();
        assert_eq!(key.year(), 2024);
        assert_eq!(key.month(), 2);

        assert!("2024".parse::<MonthKey>().is_err());
        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!("abcd-01".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_serialize_as_string() {
        let json = serde_json::to_string(&MonthKey::new(2024, 7).unwrap()).unwrap();
        assert_eq!(json, "\"2024-07\"");
    }
}
