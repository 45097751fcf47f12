use crate::validate::ValidationError;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// A calendar date with no time component, always written as zero-padded `YYYY-MM-DD`.
///
/// Because the text form is fixed-width, ordering `Day` values gives the same answer as comparing
/// their strings lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(NaiveDate);

impl Day {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today's date in the local timezone.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

/// Returns true if `s` has the exact shape `dddd-dd-dd`.
fn has_day_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(ix, b)| match ix {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

impl FromStr for Day {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !has_day_shape(s) {
            return Err(ValidationError::BadDateFormat);
        }
        NaiveDate::parse_from_str(s, DAY_FORMAT)
            .map(Day)
            .map_err(|_| ValidationError::BadDateFormat)
    }
}

impl Display for Day {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl Serialize for Day {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Day::from_str(&s).map_err(|_| serde::de::Error::custom(format!("invalid date '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let day = Day::from_str("2024-01-09").unwrap();
        assert_eq!(day.to_string(), "2024-01-09");
    }

    #[test]
    fn test_reject_bad_shapes() {
        for s in ["2024-1-09", "24-01-09", "2024/01/09", "2024-01-09 ", "", "2024-01-0a"] {
            assert_eq!(Day::from_str(s), Err(ValidationError::BadDateFormat), "{s}");
        }
    }

    #[test]
    fn test_reject_impossible_dates() {
        assert_eq!(
            Day::from_str("2024-13-40"),
            Err(ValidationError::BadDateFormat)
        );
        assert_eq!(
            Day::from_str("2023-02-29"),
            Err(ValidationError::BadDateFormat)
        );
        assert!(Day::from_str("2024-02-29").is_ok());
    }

    #[test]
    fn test_ordering_matches_text() {
        let a = Day::from_str("2024-01-09").unwrap();
        let b = Day::from_str("2024-01-10").unwrap();
        assert!(a < b);
        assert!(a.to_string() < b.to_string());
    }

    #[test]
    fn test_serde() {
        let day = Day::from_str("2025-12-31").unwrap();
        let json = serde_json::to_string(&day).unwrap();
        assert_eq!(json, "\"2025-12-31\"");
        let back: Day = serde_json::from_str(&json).unwrap();
        assert_eq!(back, day);
        assert!(serde_json::from_str::<Day>("\"12/31/2025\"").is_err());
    }
}
