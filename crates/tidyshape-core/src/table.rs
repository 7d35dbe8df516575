//! Columns, tables, and group keys.
//!
//! A `Table` can only be obtained through constructors that check its standing
//! invariants (distinct names, equal lengths, values conforming to their
//! column type). Operators build their outputs through `Table::new`, so every
//! operation result is validated.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::{DataType, Field, Schema};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub values: Vec<Value>,
}

impl Column {
    /// Build a column of a declared type.
    ///
    /// Values of a narrower type are widened (an Integer in a Float column
    /// becomes a Float); values that do not fit fail with `TypeMismatch`.
    pub fn new(name: impl Into<String>, data_type: DataType, values: Vec<Value>) -> Result<Self> {
        let name = name.into();
        let mut out = Vec::with_capacity(values.len());
        for v in values {
            match v.data_type() {
                None => out.push(Value::Missing),
                Some(t) if t == data_type => out.push(v),
                Some(t) if t.widens_to(data_type) => out.push(v.promote(data_type)),
                Some(found) => {
                    return Err(Error::TypeMismatch {
                        column: name,
                        expected: data_type,
                        found,
                    })
                }
            }
        }
        Ok(Self {
            name,
            data_type,
            values: out,
        })
    }

    /// Build a column whose type is the join of its values' types.
    ///
    /// An all-missing column gets `Boolean`, the bottom of the lattice, so it
    /// never forces promotion when combined with other columns.
    pub fn infer(name: impl Into<String>, values: Vec<Value>) -> Self {
        let data_type =
            DataType::join_all(values.iter().filter_map(Value::data_type)).unwrap_or(DataType::Boolean);
        let values = values.iter().map(|v| v.promote(data_type)).collect();
        Self {
            name: name.into(),
            data_type,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }

    pub fn field(&self) -> Field {
        Field::new(self.name.clone(), self.data_type)
    }

    /// Same type and name, different values (used when an operator rewrites cells).
    pub fn with_values(&self, values: Vec<Value>) -> Column {
        Column {
            name: self.name.clone(),
            data_type: self.data_type,
            values,
        }
    }

    fn check(&self) -> Result<()> {
        for v in &self.values {
            if let Some(found) = v.data_type() {
                if found != self.data_type {
                    return Err(Error::TypeMismatch {
                        column: self.name.clone(),
                        expected: self.data_type,
                        found,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Tuple of identifying values used to cluster rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey(pub Vec<Value>);

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str(")")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Column>", into = "Vec<Column>")]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let table = Self { columns };
        table.validate()?;
        Ok(table)
    }

    pub fn empty() -> Self {
        Self { columns: vec![] }
    }

    /// Build a table from a schema and row-major values.
    pub fn from_rows(schema: &Schema, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut cols: Vec<Vec<Value>> = schema
            .fields
            .iter()
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != schema.len() {
                return Err(Error::LengthMismatch {
                    column: format!("row {row_idx}"),
                    expected: schema.len(),
                    found: row.len(),
                });
            }
            for (slot, v) in cols.iter_mut().zip(row) {
                slot.push(v);
            }
        }
        let columns = schema
            .fields
            .iter()
            .zip(cols)
            .map(|(f, values)| Column::new(f.name.clone(), f.data_type, values))
            .collect::<Result<Vec<_>>>()?;
        Self::new(columns)
    }

    /// Check the standing invariants: distinct names, equal lengths, conforming values.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.columns.len());
        let expected = self.num_rows();
        for col in &self.columns {
            if !seen.insert(col.name.as_str()) {
                return Err(Error::DuplicateColumn(col.name.clone()));
            }
            if col.len() != expected {
                return Err(Error::LengthMismatch {
                    column: col.name.clone(),
                    expected,
                    found: col.len(),
                });
            }
            col.check()?;
        }
        Ok(())
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Index of `name`, or `UnknownColumn`.
    pub fn require(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn schema(&self) -> Schema {
        Schema::new(self.columns.iter().map(Column::field).collect())
    }

    /// Row `idx` as owned values, in column order.
    pub fn row(&self, idx: usize) -> Option<Vec<Value>> {
        if idx >= self.num_rows() {
            return None;
        }
        Some(self.columns.iter().map(|c| c.values[idx].clone()).collect())
    }

    pub fn group_key(&self, row: usize, indices: &[usize]) -> GroupKey {
        GroupKey(
            indices
                .iter()
                .map(|&c| self.columns[c].values[row].clone())
                .collect(),
        )
    }

    /// New table holding the given rows (in the given order, repeats allowed).
    pub fn take(&self, rows: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| c.with_values(rows.iter().map(|&r| c.values[r].clone()).collect()))
            .collect();
        Table { columns }
    }

    /// Project (and reorder) to the named columns.
    pub fn select(&self, names: &[String]) -> Result<Table> {
        let columns = names
            .iter()
            .map(|n| self.require(n).map(|i| self.columns[i].clone()))
            .collect::<Result<Vec<_>>>()?;
        Table::new(columns)
    }

    /// Sort rows by the specified columns (in order), stable, natural value ordering.
    pub fn sort_by(&self, keys: &[String]) -> Result<Table> {
        let key_indices = keys
            .iter()
            .map(|k| self.require(k))
            .collect::<Result<Vec<_>>>()?;

        let mut order: Vec<usize> = (0..self.num_rows()).collect();
        order.sort_by(|&a, &b| {
            for &c in &key_indices {
                match self.columns[c].values[a].cmp(&self.columns[c].values[b]) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            Ordering::Equal
        });
        Ok(self.take(&order))
    }
}

impl TryFrom<Vec<Column>> for Table {
    type Error = Error;

    fn try_from(columns: Vec<Column>) -> Result<Self> {
        Table::new(columns)
    }
}

impl From<Table> for Vec<Column> {
    fn from(t: Table) -> Self {
        t.columns
    }
}
