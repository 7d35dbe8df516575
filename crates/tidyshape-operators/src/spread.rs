//! Spread (long -> wide).
//!
//! Rows are clustered by the values of every column other than `key` and
//! `value`. Each distinct key becomes a column (sorted by natural value
//! order); each group becomes one row, in first-appearance order. A group
//! with no row for a key gets an explicit Missing: this is where implicit
//! missing values become explicit.
//!
//! A Missing key renders as `NA`, so a key column holding both the text
//! `"NA"` and a Missing cell cannot spread; that fails with `InvalidArgument`.

use std::collections::{BTreeSet, HashMap};

use tidyshape_core::table::{Column, GroupKey, Table};
use tidyshape_core::value::Value;
use tidyshape_core::{Error, Result};

use crate::coerce::Coercion;
use crate::traits::Operator;

#[derive(Debug, Clone)]
pub struct Spread {
    pub key: String,
    pub value: String,
    /// Replaces both absent combinations and explicit Missing values.
    pub fill: Option<Value>,
    /// Run type coercion over every new column independently.
    pub convert: bool,
    /// Name new columns `{key}{sep}{key value}` instead of just the key value.
    pub sep: Option<String>,
    pub coercion: Coercion,
}

impl Spread {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            fill: None,
            convert: false,
            sep: None,
            coercion: Coercion::default(),
        }
    }

    pub fn fill(mut self, value: Value) -> Self {
        self.fill = Some(value);
        self
    }

    pub fn convert(mut self, yes: bool) -> Self {
        self.convert = yes;
        self
    }

    pub fn sep(mut self, sep: impl Into<String>) -> Self {
        self.sep = Some(sep.into());
        self
    }

    pub fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = coercion;
        self
    }

    fn column_name(&self, key: &Value) -> String {
        match &self.sep {
            Some(sep) => format!("{}{}{}", self.key, sep, key),
            None => key.to_string(),
        }
    }
}

impl Operator for Spread {
    fn name(&self) -> &'static str {
        "spread"
    }

    fn apply(&self, input: &Table) -> Result<Table> {
        let key_idx = input.require(&self.key)?;
        let value_idx = input.require(&self.value)?;
        if key_idx == value_idx {
            return Err(Error::InvalidArgument(format!(
                "key and value must be different columns, got '{}' for both",
                self.key
            )));
        }
        let id_idx: Vec<usize> = (0..input.num_columns())
            .filter(|&i| i != key_idx && i != value_idx)
            .collect();

        let cols = input.columns();
        let key_col = &cols[key_idx];
        let value_col = &cols[value_idx];

        let distinct: Vec<Value> = key_col
            .values
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let key_pos: HashMap<&Value, usize> =
            distinct.iter().enumerate().map(|(i, v)| (v, i)).collect();

        let mut rendered: HashMap<String, &Value> = HashMap::with_capacity(distinct.len());
        for key in &distinct {
            if let Some(prev) = rendered.insert(self.column_name(key), key) {
                return Err(Error::InvalidArgument(format!(
                    "keys {prev:?} and {key:?} both render as column '{}'",
                    self.column_name(key)
                )));
            }
        }

        // group index -> first member row; cells[group][key] -> source row
        let mut group_of: HashMap<GroupKey, usize> = HashMap::new();
        let mut first_rows: Vec<usize> = Vec::new();
        let mut cells: Vec<Vec<Option<usize>>> = Vec::new();

        for row in 0..input.num_rows() {
            let gk = input.group_key(row, &id_idx);
            let next = first_rows.len();
            let g = match group_of.get(&gk) {
                Some(&g) => g,
                None => {
                    group_of.insert(gk.clone(), next);
                    first_rows.push(row);
                    cells.push(vec![None; distinct.len()]);
                    next
                }
            };
            let key = &key_col.values[row];
            let k = *key_pos
                .get(key)
                .ok_or_else(|| Error::Invariant(format!("key {key} missing from key set")))?;
            if let Some(first_row) = cells[g][k] {
                return Err(Error::DuplicateKeyInGroup {
                    group: gk.to_string(),
                    key: key.to_string(),
                    first_row,
                    second_row: row,
                });
            }
            cells[g][k] = Some(row);
        }

        let data_type = match self.fill.as_ref().and_then(Value::data_type) {
            Some(t) => value_col.data_type.join(t),
            None => value_col.data_type,
        };
        let fill = self
            .fill
            .as_ref()
            .map_or(Value::Missing, |f| f.promote(data_type));

        let mut columns: Vec<Column> = id_idx
            .iter()
            .map(|&i| cols[i].with_values(first_rows.iter().map(|&r| cols[i].values[r].clone()).collect()))
            .collect();

        for (k, key) in distinct.iter().enumerate() {
            let values = cells
                .iter()
                .map(|group| match group[k] {
                    Some(r) if !value_col.values[r].is_missing() => {
                        value_col.values[r].promote(data_type)
                    }
                    _ => fill.clone(),
                })
                .collect();
            let mut col = Column {
                name: self.column_name(key),
                data_type,
                values,
            };
            if self.convert {
                col = self.coercion.coerce_column(&col);
            }
            columns.push(col);
        }

        let out = Table::new(columns)?;
        tracing::debug!(
            groups = first_rows.len(),
            keys = distinct.len(),
            rows_in = input.num_rows(),
            "spread"
        );
        Ok(out)
    }
}
