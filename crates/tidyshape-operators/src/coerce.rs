//! Type coercion: best-effort narrowing of text columns.
//!
//! Candidate types are tried in ascending generality (Boolean, Integer,
//! Float, then calendar forms when a parser is injected). The first type that
//! parses *every* non-missing cell wins; a column is never partially
//! converted. Falling back to Text is a silent no-op, not an error.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use tidyshape_core::schema::DataType;
use tidyshape_core::table::Column;
use tidyshape_core::value::{CalendarValue, Value, NA_LITERAL};

static INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("integer pattern is valid"));

static FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
        .expect("float pattern is valid")
});

/// External date/time recognizer.
///
/// Failure to parse is not an error: it only disqualifies the calendar type
/// for the column being coerced.
pub trait CalendarParser: Send + Sync {
    fn parse(&self, text: &str) -> Option<CalendarValue>;
}

impl<F> CalendarParser for F
where
    F: Fn(&str) -> Option<CalendarValue> + Send + Sync,
{
    fn parse(&self, text: &str) -> Option<CalendarValue> {
        self(text)
    }
}

/// Coercion settings carried by every operator that has a `convert` flag.
#[derive(Clone)]
pub struct Coercion {
    /// Texts read as Missing, whether or not the column converts.
    pub na_strings: Vec<String>,
    pub calendar: Option<Arc<dyn CalendarParser>>,
}

impl Default for Coercion {
    fn default() -> Self {
        Self {
            na_strings: vec![NA_LITERAL.to_string()],
            calendar: None,
        }
    }
}

impl fmt::Debug for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coercion")
            .field("na_strings", &self.na_strings)
            .field("calendar", &self.calendar.is_some())
            .finish()
    }
}

impl Coercion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_na_strings<I, S>(mut self, na: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.na_strings = na.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_calendar(mut self, parser: Arc<dyn CalendarParser>) -> Self {
        self.calendar = Some(parser);
        self
    }

    /// Coerce a whole column. Non-text columns pass through unchanged.
    pub fn coerce_column(&self, column: &Column) -> Column {
        if column.data_type != DataType::Text {
            return column.clone();
        }
        let cells: Vec<Option<&str>> = column
            .values
            .iter()
            .map(|v| match v {
                Value::Text(s) if !self.is_na(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();

        let (data_type, values) = self.narrow(&cells);
        if data_type == DataType::Text {
            tracing::trace!(column = %column.name, "coercion skipped; column stays text");
        } else {
            tracing::trace!(column = %column.name, to = %data_type, "column coerced");
        }
        Column {
            name: column.name.clone(),
            data_type,
            values,
        }
    }

    fn is_na(&self, s: &str) -> bool {
        self.na_strings.iter().any(|na| na == s)
    }

    fn narrow(&self, cells: &[Option<&str>]) -> (DataType, Vec<Value>) {
        if let Some(values) = convert_all(cells, parse_bool) {
            return (DataType::Boolean, values);
        }
        if let Some(values) = convert_all(cells, parse_integer) {
            return (DataType::Integer, values);
        }
        if let Some(values) = convert_all(cells, parse_float) {
            return (DataType::Float, values);
        }
        if let Some(calendar) = &self.calendar {
            let parse = |s: &str| calendar.parse(s).map(Value::Calendar);
            if let Some(values) = convert_all(cells, parse) {
                return (DataType::Calendar, values);
            }
        }
        let values = cells
            .iter()
            .map(|c| c.map_or(Value::Missing, Value::text))
            .collect();
        (DataType::Text, values)
    }
}

/// All-or-nothing conversion: `None` as soon as one present cell fails.
fn convert_all<F>(cells: &[Option<&str>], parse: F) -> Option<Vec<Value>>
where
    F: Fn(&str) -> Option<Value>,
{
    cells
        .iter()
        .map(|c| match c {
            None => Some(Value::Missing),
            Some(s) => parse(s),
        })
        .collect()
}

fn parse_bool(s: &str) -> Option<Value> {
    match s {
        "TRUE" | "True" | "true" | "T" => Some(Value::Boolean(true)),
        "FALSE" | "False" | "false" | "F" => Some(Value::Boolean(false)),
        _ => None,
    }
}

fn parse_integer(s: &str) -> Option<Value> {
    if !INTEGER.is_match(s) {
        return None;
    }
    s.parse::<i64>().ok().map(Value::Integer)
}

fn parse_float(s: &str) -> Option<Value> {
    if !FLOAT.is_match(s) {
        return None;
    }
    s.parse::<f64>().ok().map(Value::Float)
}
