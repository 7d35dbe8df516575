//! Column selectors.
//!
//! A `Selector` is resolved against a schema into an ordered, duplicate-free
//! list of existing column names before any operator touches data. Every
//! resolution failure surfaces as `Error::UnknownColumn`.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::{DataType, Field, Schema};

/// Caller-supplied predicate over a column's name and type.
#[derive(Clone)]
pub struct CustomPredicate(Arc<dyn Fn(&Field) -> bool + Send + Sync>);

impl CustomPredicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Field) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for CustomPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomPredicate(..)")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnPredicate {
    StartsWith(String),
    EndsWith(String),
    Contains(String),
    /// Regular expression searched in the column name.
    Matches(String),
    OfType(DataType),
    #[serde(skip)]
    Custom(CustomPredicate),
}

impl ColumnPredicate {
    fn filter(&self, schema: &Schema) -> Result<Vec<String>> {
        let pattern = match self {
            ColumnPredicate::Matches(p) => Some(Regex::new(p)?),
            _ => None,
        };
        let keep = |f: &Field| match self {
            ColumnPredicate::StartsWith(s) => f.name.starts_with(s.as_str()),
            ColumnPredicate::EndsWith(s) => f.name.ends_with(s.as_str()),
            ColumnPredicate::Contains(s) => f.name.contains(s.as_str()),
            ColumnPredicate::Matches(_) => pattern.as_ref().is_some_and(|re| re.is_match(&f.name)),
            ColumnPredicate::OfType(t) => f.data_type == *t,
            ColumnPredicate::Custom(p) => (p.0)(f),
        };
        Ok(schema
            .fields
            .iter()
            .filter(|&f| keep(f))
            .map(|f| f.name.clone())
            .collect())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// Every column, in table order.
    Everything,
    /// Explicit names, in the given order.
    Names(Vec<String>),
    /// Inclusive run of columns between two names in table order. When `to`
    /// precedes `from` the run is walked right to left.
    Range { from: String, to: String },
    Predicate(ColumnPredicate),
    /// 1-based positions; negative positions count from the right (-1 is last).
    Positions(Vec<i64>),
    /// Every column the inner selector does not pick, in table order.
    Except(Box<Selector>),
}

impl Selector {
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selector::Names(names.into_iter().map(Into::into).collect())
    }

    pub fn range(from: impl Into<String>, to: impl Into<String>) -> Self {
        Selector::Range {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn positions<I: IntoIterator<Item = i64>>(positions: I) -> Self {
        Selector::Positions(positions.into_iter().collect())
    }

    pub fn matching<F>(f: F) -> Self
    where
        F: Fn(&Field) -> bool + Send + Sync + 'static,
    {
        Selector::Predicate(ColumnPredicate::Custom(CustomPredicate::new(f)))
    }

    pub fn except(inner: Selector) -> Self {
        Selector::Except(Box::new(inner))
    }

    /// Resolve against `schema` into existing column names, first occurrence wins.
    pub fn resolve(&self, schema: &Schema) -> Result<Vec<String>> {
        let names = match self {
            Selector::Everything => schema.names().map(str::to_string).collect(),
            Selector::Names(names) => {
                for n in names {
                    require(schema, n)?;
                }
                names.clone()
            }
            Selector::Range { from, to } => {
                let a = require(schema, from)?;
                let b = require(schema, to)?;
                let picked: Vec<usize> = if a <= b {
                    (a..=b).collect()
                } else {
                    (b..=a).rev().collect()
                };
                picked
                    .into_iter()
                    .map(|i| schema.fields[i].name.clone())
                    .collect()
            }
            Selector::Predicate(p) => p.filter(schema)?,
            Selector::Positions(positions) => positions
                .iter()
                .map(|&p| {
                    position_index(p, schema.len())
                        .map(|i| schema.fields[i].name.clone())
                        .ok_or_else(|| Error::UnknownColumn(format!("position {p}")))
                })
                .collect::<Result<Vec<_>>>()?,
            Selector::Except(inner) => {
                let excluded: HashSet<String> = inner.resolve(schema)?.into_iter().collect();
                schema
                    .names()
                    .filter(|n| !excluded.contains(*n))
                    .map(str::to_string)
                    .collect()
            }
        };
        Ok(dedup(names))
    }
}

fn require(schema: &Schema, name: &str) -> Result<usize> {
    schema
        .index_of(name)
        .ok_or_else(|| Error::UnknownColumn(name.to_string()))
}

fn position_index(p: i64, len: usize) -> Option<usize> {
    let magnitude = usize::try_from(p.unsigned_abs()).ok()?;
    if magnitude == 0 || magnitude > len {
        return None;
    }
    if p > 0 {
        Some(magnitude - 1)
    } else {
        Some(len - magnitude)
    }
}

fn dedup(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(names.len());
    names
        .into_iter()
        .filter(|n| seen.insert(n.clone()))
        .collect()
}
