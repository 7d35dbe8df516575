//! ISO-8601 calendar recognizer backed by `chrono`.
//!
//! Supplies `CalendarValue`s to type coercion. Ordinals are days from the
//! common era for dates, Unix seconds for date-times, and seconds from
//! midnight for times; they are only used for equality and ordering.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use tidyshape_core::value::{CalendarKind, CalendarValue};

use crate::coerce::CalendarParser;

const DATE: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const TIME: &str = "%H:%M:%S";

#[derive(Debug, Clone, Copy, Default)]
pub struct IsoCalendar;

impl CalendarParser for IsoCalendar {
    fn parse(&self, text: &str) -> Option<CalendarValue> {
        if let Ok(date) = NaiveDate::parse_from_str(text, DATE) {
            return Some(CalendarValue::new(
                CalendarKind::Date,
                i64::from(date.num_days_from_ce()),
                date.format(DATE).to_string(),
            ));
        }
        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
                return Some(CalendarValue::new(
                    CalendarKind::DateTime,
                    dt.and_utc().timestamp(),
                    dt.format(DATETIME_FORMATS[0]).to_string(),
                ));
            }
        }
        if let Ok(t) = NaiveTime::parse_from_str(text, TIME) {
            return Some(CalendarValue::new(
                CalendarKind::Time,
                i64::from(t.num_seconds_from_midnight()),
                t.format(TIME).to_string(),
            ));
        }
        None
    }
}
