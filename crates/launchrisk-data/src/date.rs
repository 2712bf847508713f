//! Launch date parsing.
//!
//! Source tables mix several date spellings. Every accepted format is tried in
//! turn; anything else is treated as absent rather than raising.
//!
//! Catalogue dates carry a weekday, and it is checked: `Mon Oct 04, 1957` is
//! unparseable because that day was a Friday.
//!
//! | example                          | format                        |
//! |----------------------------------|-------------------------------|
//! | `Fri Aug 07, 2020 05:12 UTC`     | catalogue timestamp           |
//! | `Fri Aug 07, 2020`               | catalogue date (no time)      |
//! | `2020-08-07T05:12:00Z`           | RFC 3339                      |
//! | `2020-08-07 05:12:00+00:00`      | ISO date-time with offset     |
//! | `2020-08-07 05:12:00`            | ISO date-time, assumed UTC    |
//! | `2020-08-07`                     | ISO date, midnight UTC        |

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

const NAIVE_DATETIME_FORMATS: &[&str] = &["%a %b %d, %Y %H:%M UTC", "%Y-%m-%d %H:%M:%S"];
const NAIVE_DATE_FORMATS: &[&str] = &["%a %b %d, %Y", "%Y-%m-%d"];
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%:z"];

/// Parses a launch date, returning `None` when no accepted format matches.
///
/// ```
/// use chrono::{Datelike as _, Timelike as _};
/// use launchrisk_data::date::parse_launch_date;
///
/// let date = parse_launch_date("Fri Aug 07, 2020 05:12 UTC").unwrap();
/// assert_eq!((date.year(), date.month(), date.day()), (2020, 8, 7));
/// assert_eq!((date.hour(), date.minute()), (5, 12));
///
/// assert!(parse_launch_date("sometime in spring").is_none());
/// ```
#[must_use]
pub fn parse_launch_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(date) = DateTime::parse_from_str(value, format) {
            return Some(date.with_timezone(&Utc));
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(date) = NaiveDateTime::parse_from_str(value, format) {
            return Some(date.and_utc());
        }
    }
    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date.and_time(NaiveTime::MIN).and_utc());
        }
    }
    None
}
