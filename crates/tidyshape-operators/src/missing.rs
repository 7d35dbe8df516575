//! Explicit handling of Missing cells: dropping incomplete rows and
//! replacing Missing with per-column values.

use std::collections::BTreeMap;

use tidyshape_core::selector::Selector;
use tidyshape_core::table::{Column, Table};
use tidyshape_core::value::Value;
use tidyshape_core::Result;

use crate::traits::Operator;

/// Keep only rows with no Missing cell in the selected columns.
#[derive(Debug, Clone, Default)]
pub struct DropNa {
    /// `None` checks every column.
    pub columns: Option<Selector>,
}

impl DropNa {
    pub fn new(columns: Option<Selector>) -> Self {
        Self { columns }
    }
}

impl Operator for DropNa {
    fn name(&self) -> &'static str {
        "drop_na"
    }

    fn apply(&self, input: &Table) -> Result<Table> {
        let selector = self.columns.clone().unwrap_or(Selector::Everything);
        let idx = selector
            .resolve(&input.schema())?
            .iter()
            .map(|n| input.require(n))
            .collect::<Result<Vec<_>>>()?;
        let cols = input.columns();
        let keep: Vec<usize> = (0..input.num_rows())
            .filter(|&row| idx.iter().all(|&c| !cols[c].values[row].is_missing()))
            .collect();
        tracing::debug!(
            dropped = input.num_rows() - keep.len(),
            rows = keep.len(),
            "drop_na"
        );
        Ok(input.take(&keep))
    }
}

/// Replace Missing cells column by column.
#[derive(Debug, Clone, Default)]
pub struct ReplaceNa {
    pub values: BTreeMap<String, Value>,
}

impl ReplaceNa {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: Value) -> Self {
        self.values.insert(column.into(), value);
        self
    }
}

impl Operator for ReplaceNa {
    fn name(&self) -> &'static str {
        "replace_na"
    }

    fn apply(&self, input: &Table) -> Result<Table> {
        for name in self.values.keys() {
            input.require(name)?;
        }
        let columns = input
            .columns()
            .iter()
            .map(|col| match self.values.get(&col.name) {
                Some(replacement) => {
                    let data_type = match replacement.data_type() {
                        Some(t) => col.data_type.join(t),
                        None => col.data_type,
                    };
                    let values = col
                        .values
                        .iter()
                        .map(|v| if v.is_missing() { replacement } else { v })
                        .map(|v| v.promote(data_type))
                        .collect();
                    Column::new(col.name.clone(), data_type, values)
                }
                None => Ok(col.clone()),
            })
            .collect::<Result<Vec<_>>>()?;
        Table::new(columns)
    }
}
