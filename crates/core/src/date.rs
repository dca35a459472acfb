//! Calendar date codec and day arithmetic
//!
//! Dates travel as `YYYY-MM-DD` text. Parsing is strict: exactly four year
//! digits, two month digits and two day digits separated by `-`. Anything
//! else is rejected with [`Error::InvalidDate`] carrying the offending text.
//! Only years 0000 through 9999 fit that layout, so dates outside that range
//! are refused by [`check_date`] and by the serde adapter.

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate};

/// Textual layout of a calendar date
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Earliest year that formats as four digits
pub const MIN_YEAR: i32 = 0;

/// Latest year that formats as four digits
pub const MAX_YEAR: i32 = 9999;

/// Ensure `date` survives a format/parse round trip
pub fn check_date(date: NaiveDate) -> Result<NaiveDate> {
    if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        Ok(date)
    } else {
        Err(Error::InvalidDate {
            value: format_date(date),
        })
    }
}

/// Format a date as `YYYY-MM-DD`
///
/// Years outside [`MIN_YEAR`]..=[`MAX_YEAR`] come out with a sign or extra
/// digits and will not parse back; see [`check_date`].
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` date
///
/// # Examples
///
/// ```
/// use keepsake_core::date::parse_date;
///
/// let d = parse_date("2024-03-15").unwrap();
/// assert_eq!(d.to_string(), "2024-03-15");
/// assert!(parse_date("15/03/2024").is_err());
/// ```
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let invalid = || Error::InvalidDate {
        value: text.to_string(),
    };

    let bytes = text.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shape_ok {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| invalid())
}

/// Signed number of days from `from` to `to`
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Next anniversary of `date` on or after `today`
///
/// A Feb 29 date falls on Feb 28 in non-leap years. Returns `None` only if
/// the next occurrence is outside chrono's representable range.
pub fn next_occurrence(date: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = anniversary_in_year(date, today.year())?;
    if this_year >= today {
        Some(this_year)
    } else {
        anniversary_in_year(date, today.year() + 1)
    }
}

fn anniversary_in_year(date: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), date.day() - 1))
}

/// Serde adapter for `NaiveDate` fields using the strict codec
pub mod iso {
    use super::{check_date, format_date, parse_date};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as `YYYY-MM-DD`, refusing years that would not parse back
    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        let date = check_date(*date).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&format_date(date))
    }

    /// Deserialize from `YYYY-MM-DD`, failing loudly on any other shape
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_date(&text).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional free text stored as a plain string
///
/// `None` is written as `""`; `""`, `null` and a missing key read back as `None`.
pub mod optional_text {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize `None` as an empty string
    pub fn serialize<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    /// Deserialize, treating empty and null as absent
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|s| !s.is_empty()))
    }
}
