//! Cell values.
//!
//! `Value` is a closed tagged union. Equality and hashing are the grouping
//! semantics used by Spread/Complete: `Missing == Missing`, floats compare by
//! canonical bit pattern, and distinct variants never compare equal.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::DataType;

/// Rendering of a missing cell wherever text is required (Spread column
/// names, Unite with `missing_as_na`, group keys in error messages).
pub const NA_LITERAL: &str = "NA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CalendarKind {
    Date,
    DateTime,
    Time,
}

/// A calendar value produced by an external date/time parser.
///
/// The engine does no calendar arithmetic. `ordinal` is an opaque monotonic
/// position chosen by the parser and is the only thing equality and ordering
/// look at (together with `kind`); `text` is the canonical rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarValue {
    pub kind: CalendarKind,
    pub ordinal: i64,
    pub text: String,
}

impl CalendarValue {
    pub fn new(kind: CalendarKind, ordinal: i64, text: impl Into<String>) -> Self {
        Self {
            kind,
            ordinal,
            text: text.into(),
        }
    }
}

impl PartialEq for CalendarValue {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.ordinal == other.ordinal
    }
}

impl Eq for CalendarValue {}

impl Hash for CalendarValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.ordinal.hash(state);
    }
}

impl PartialOrd for CalendarValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CalendarValue {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.kind, self.ordinal).cmp(&(other.kind, other.ordinal))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Missing,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Calendar(CalendarValue),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Concrete type of this value; `None` for `Missing`, which fits any type.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Missing => None,
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::Integer(_) => Some(DataType::Integer),
            Value::Float(_) => Some(DataType::Float),
            Value::Text(_) => Some(DataType::Text),
            Value::Calendar(_) => Some(DataType::Calendar),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Widen this value to `target`.
    ///
    /// Callers pass a join of the value's own type, so the only conversions
    /// that occur are Boolean -> Integer -> Float and anything -> Text.
    pub fn promote(&self, target: DataType) -> Value {
        match (self, target) {
            (Value::Missing, _) => Value::Missing,
            (Value::Boolean(b), DataType::Integer) => Value::Integer(i64::from(*b)),
            (Value::Boolean(b), DataType::Float) => Value::Float(if *b { 1.0 } else { 0.0 }),
            (Value::Integer(i), DataType::Float) => Value::Float(*i as f64),
            (Value::Text(_), DataType::Text) => self.clone(),
            (other, DataType::Text) => Value::Text(other.to_string()),
            (other, _) => other.clone(),
        }
    }

    /// Checked widening; fails when `target` is not above this value's type.
    pub fn try_cast(&self, target: DataType) -> Result<Value> {
        match self.data_type() {
            None => Ok(Value::Missing),
            Some(from) if from.widens_to(target) => Ok(self.promote(target)),
            Some(from) => Err(Error::Cast { from, to: target }),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Boolean(_) => 0,
            Value::Integer(_) | Value::Float(_) => 1,
            Value::Calendar(_) => 2,
            Value::Text(_) => 3,
            Value::Missing => 4,
        }
    }
}

fn canonical(f: f64) -> f64 {
    if f.is_nan() {
        f64::NAN
    } else if f == 0.0 {
        0.0
    } else {
        f
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Missing, Missing) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => canonical(*a).to_bits() == canonical(*b).to_bits(),
            (Text(a), Text(b)) => a == b,
            (Calendar(a), Calendar(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Missing => {}
            Value::Boolean(b) => b.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => canonical(*f).to_bits().hash(state),
            Value::Text(s) => s.hash(state),
            Value::Calendar(c) => c.hash(state),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Natural ordering: booleans, numbers (compared numerically), calendar
/// values, text, and Missing last.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        match (self, other) {
            (Missing, Missing) => Ordering::Equal,
            (Boolean(a), Boolean(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => canonical(*a).total_cmp(&canonical(*b)),
            // Ties between an integer and an equal float break by variant so
            // the ordering stays consistent with `Eq`.
            (Integer(a), Float(b)) => (*a as f64)
                .total_cmp(&canonical(*b))
                .then(Ordering::Less),
            (Float(a), Integer(b)) => canonical(*a)
                .total_cmp(&(*b as f64))
                .then(Ordering::Greater),
            (Calendar(a), Calendar(b)) => a.cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => f.write_str(NA_LITERAL),
            Value::Boolean(true) => f.write_str("TRUE"),
            Value::Boolean(false) => f.write_str("FALSE"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
            Value::Calendar(c) => f.write_str(&c.text),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<CalendarValue> for Value {
    fn from(v: CalendarValue) -> Self {
        Value::Calendar(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Missing, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn missing_equals_missing_but_nothing_else() {
        assert_eq!(Value::Missing, Value::Missing);
        assert_ne!(Value::Missing, Value::Integer(0));
        assert_ne!(Value::Missing, Value::text(""));
    }

    #[test]
    fn variants_never_compare_equal() {
        assert_ne!(Value::Integer(1), Value::Float(1.0));
        assert_ne!(Value::Boolean(true), Value::Integer(1));
        assert_ne!(Value::text("1"), Value::Integer(1));
    }

    #[test]
    fn floats_group_by_canonical_bits() {
        let mut set = HashSet::new();
        set.insert(Value::Float(f64::NAN));
        set.insert(Value::Float(-f64::NAN));
        set.insert(Value::Float(0.0));
        set.insert(Value::Float(-0.0));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn natural_order_puts_missing_last() {
        let mut values = vec![
            Value::Missing,
            Value::text("b"),
            Value::Float(2.5),
            Value::Integer(2),
            Value::text("a"),
            Value::Boolean(true),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                Value::Boolean(true),
                Value::Integer(2),
                Value::Float(2.5),
                Value::text("a"),
                Value::text("b"),
                Value::Missing,
            ]
        );
    }

    #[test]
    fn rendering_matches_labels() {
        assert_eq!(Value::Missing.to_string(), "NA");
        assert_eq!(Value::Boolean(false).to_string(), "FALSE");
        assert_eq!(Value::Integer(-4).to_string(), "-4");
        assert_eq!(Value::Float(1.0).to_string(), "1");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
    }

    #[test]
    fn promote_widens_along_the_chain() {
        assert_eq!(Value::Boolean(true).promote(DataType::Integer), Value::Integer(1));
        assert_eq!(Value::Integer(3).promote(DataType::Float), Value::Float(3.0));
        assert_eq!(Value::Integer(3).promote(DataType::Text), Value::text("3"));
        assert_eq!(Value::Missing.promote(DataType::Text), Value::Missing);
    }

    #[test]
    fn try_cast_refuses_narrowing() {
        assert!(Value::Float(1.5).try_cast(DataType::Integer).is_err());
        assert!(Value::Integer(1).try_cast(DataType::Calendar).is_err());
        assert_eq!(
            Value::Missing.try_cast(DataType::Boolean).unwrap(),
            Value::Missing
        );
    }

    #[test]
    fn calendar_identity_ignores_text() {
        let a = CalendarValue::new(CalendarKind::Date, 10, "2020-01-01");
        let b = CalendarValue::new(CalendarKind::Date, 10, "2020-1-1");
        assert_eq!(Value::Calendar(a), Value::Calendar(b));
    }

    #[test]
    fn untagged_serde_round_trips_scalars() {
        let values = vec![
            Value::Missing,
            Value::Boolean(true),
            Value::Integer(7),
            Value::Float(2.5),
            Value::text("x"),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[null,true,7,2.5,"x"]"#);
        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }
}
