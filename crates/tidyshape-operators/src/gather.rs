//! Gather (wide -> long).
//!
//! Unselected columns are identifying columns; each input row fans out into
//! one output row per selected column, in selector order. Row-major output
//! preserves the input row order.

use tidyshape_core::schema::DataType;
use tidyshape_core::selector::Selector;
use tidyshape_core::table::{Column, Table};
use tidyshape_core::value::Value;
use tidyshape_core::{Error, Result};

use crate::coerce::Coercion;
use crate::traits::Operator;

#[derive(Debug, Clone)]
pub struct Gather {
    /// Value columns to collapse.
    pub columns: Selector,
    /// Name of the new column holding the source column names.
    pub key: String,
    /// Name of the new column holding the cells.
    pub value: String,
    /// Omit rows whose value is Missing.
    pub drop_missing: bool,
    /// Run type coercion over a text value column.
    pub convert: bool,
    /// Run type coercion over the key column (e.g. year names become integers).
    pub convert_key: bool,
    pub coercion: Coercion,
}

impl Gather {
    pub fn new(columns: Selector, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            columns,
            key: key.into(),
            value: value.into(),
            drop_missing: false,
            convert: false,
            convert_key: false,
            coercion: Coercion::default(),
        }
    }

    pub fn drop_missing(mut self, yes: bool) -> Self {
        self.drop_missing = yes;
        self
    }

    pub fn convert(mut self, yes: bool) -> Self {
        self.convert = yes;
        self
    }

    pub fn convert_key(mut self, yes: bool) -> Self {
        self.convert_key = yes;
        self
    }

    pub fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = coercion;
        self
    }
}

impl Operator for Gather {
    fn name(&self) -> &'static str {
        "gather"
    }

    fn apply(&self, input: &Table) -> Result<Table> {
        let gathered = self.columns.resolve(&input.schema())?;
        if gathered.is_empty() {
            return Err(Error::EmptySelection);
        }
        let value_idx = gathered
            .iter()
            .map(|n| input.require(n))
            .collect::<Result<Vec<_>>>()?;
        let id_idx: Vec<usize> = (0..input.num_columns())
            .filter(|i| !value_idx.contains(i))
            .collect();

        let cols = input.columns();
        let common = DataType::join_all(value_idx.iter().map(|&i| cols[i].data_type))
            .ok_or(Error::EmptySelection)?;

        let capacity = input.num_rows() * value_idx.len();
        let mut id_values: Vec<Vec<Value>> =
            id_idx.iter().map(|_| Vec::with_capacity(capacity)).collect();
        let mut keys = Vec::with_capacity(capacity);
        let mut values = Vec::with_capacity(capacity);

        for row in 0..input.num_rows() {
            for (&ci, name) in value_idx.iter().zip(&gathered) {
                let cell = &cols[ci].values[row];
                if self.drop_missing && cell.is_missing() {
                    continue;
                }
                for (slot, &ii) in id_values.iter_mut().zip(&id_idx) {
                    slot.push(cols[ii].values[row].clone());
                }
                keys.push(Value::Text(name.clone()));
                values.push(cell.promote(common));
            }
        }

        let mut key_col = Column {
            name: self.key.clone(),
            data_type: DataType::Text,
            values: keys,
        };
        let mut value_col = Column {
            name: self.value.clone(),
            data_type: common,
            values,
        };
        if self.convert_key {
            key_col = self.coercion.coerce_column(&key_col);
        }
        if self.convert {
            value_col = self.coercion.coerce_column(&value_col);
        }

        let mut columns: Vec<Column> = id_idx
            .iter()
            .zip(id_values)
            .map(|(&ii, values)| cols[ii].with_values(values))
            .collect();
        columns.push(key_col);
        columns.push(value_col);

        let out = Table::new(columns)?;
        tracing::debug!(
            gathered = value_idx.len(),
            rows_in = input.num_rows(),
            rows_out = out.num_rows(),
            value_type = %common,
            "gather"
        );
        Ok(out)
    }
}
