//! Grid completion: make every combination of the selected columns' values
//! present, turning implicit missing rows into explicit ones.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tidyshape_core::selector::Selector;
use tidyshape_core::table::{Column, GroupKey, Table};
use tidyshape_core::value::Value;
use tidyshape_core::{Error, Result};

use crate::traits::Operator;

/// Sorted distinct values of a column; Missing is a level and sorts last.
fn levels(column: &Column) -> Vec<Value> {
    column
        .values
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Cartesian product in lexicographic order, first dimension slowest.
fn cartesian(levels: &[Vec<Value>]) -> Vec<Vec<Value>> {
    if levels.iter().any(Vec::is_empty) {
        return Vec::new();
    }
    let total: usize = levels.iter().map(Vec::len).product();
    let mut out = Vec::with_capacity(total);
    let mut cursor = vec![0usize; levels.len()];
    loop {
        out.push(
            cursor
                .iter()
                .zip(levels)
                .map(|(&i, lv)| lv[i].clone())
                .collect(),
        );
        let mut dim = levels.len();
        loop {
            if dim == 0 {
                return out;
            }
            dim -= 1;
            cursor[dim] += 1;
            if cursor[dim] < levels[dim].len() {
                break;
            }
            cursor[dim] = 0;
        }
    }
}

fn resolve_indices(input: &Table, selector: &Selector) -> Result<Vec<usize>> {
    selector
        .resolve(&input.schema())?
        .iter()
        .map(|n| input.require(n))
        .collect()
}

#[derive(Debug, Clone)]
pub struct Complete {
    pub columns: Selector,
    /// Per-column default for cells created by completion.
    pub fill: BTreeMap<String, Value>,
    /// Also replace pre-existing Missing cells in the filled columns.
    pub explicit: bool,
}

impl Complete {
    pub fn new(columns: Selector) -> Self {
        Self {
            columns,
            fill: BTreeMap::new(),
            explicit: false,
        }
    }

    pub fn fill_with(mut self, column: impl Into<String>, value: Value) -> Self {
        self.fill.insert(column.into(), value);
        self
    }

    pub fn explicit(mut self, yes: bool) -> Self {
        self.explicit = yes;
        self
    }
}

impl Operator for Complete {
    fn name(&self) -> &'static str {
        "complete"
    }

    fn apply(&self, input: &Table) -> Result<Table> {
        let key_idx = resolve_indices(input, &self.columns)?;
        for name in self.fill.keys() {
            input.require(name)?;
        }
        if key_idx.is_empty() {
            return Ok(input.clone());
        }

        let cols = input.columns();
        // Column index -> position of that column in the grid combination
        // (selector order, which need not match table order).
        let key_pos: Vec<Option<usize>> = (0..cols.len())
            .map(|i| key_idx.iter().position(|&k| k == i))
            .collect();

        // Output type and default per column; keys are never filled.
        let mut types = Vec::with_capacity(cols.len());
        let mut defaults = Vec::with_capacity(cols.len());
        for (i, col) in cols.iter().enumerate() {
            let default = if key_pos[i].is_some() { None } else { self.fill.get(&col.name) };
            let data_type = match default.and_then(Value::data_type) {
                Some(t) => col.data_type.join(t),
                None => col.data_type,
            };
            types.push(data_type);
            defaults.push(default.map_or(Value::Missing, |v| v.promote(data_type)));
        }

        let mut by_key: HashMap<GroupKey, Vec<usize>> = HashMap::new();
        for row in 0..input.num_rows() {
            by_key.entry(input.group_key(row, &key_idx)).or_default().push(row);
        }

        let grid = cartesian(&key_idx.iter().map(|&i| levels(&cols[i])).collect::<Vec<_>>());
        let mut out: Vec<Vec<Value>> = vec![Vec::with_capacity(grid.len()); cols.len()];
        let mut created = 0usize;

        for combo in grid {
            let key = GroupKey(combo);
            match by_key.get(&key) {
                Some(rows) => {
                    for &row in rows {
                        for (c, col) in cols.iter().enumerate() {
                            let v = &col.values[row];
                            let v = if self.explicit && v.is_missing() {
                                defaults[c].clone()
                            } else {
                                v.promote(types[c])
                            };
                            out[c].push(v);
                        }
                    }
                }
                None => {
                    created += 1;
                    for (c, slot) in out.iter_mut().enumerate() {
                        let v = match key_pos[c] {
                            Some(p) => key.0.get(p).cloned().ok_or_else(|| {
                                Error::Invariant("grid row shorter than key set".into())
                            })?,
                            None => defaults[c].clone(),
                        };
                        slot.push(v);
                    }
                }
            }
        }

        let columns = cols
            .iter()
            .zip(types)
            .zip(out)
            .map(|((col, t), values)| Column::new(col.name.clone(), t, values))
            .collect::<Result<Vec<_>>>()?;
        let table = Table::new(columns)?;
        tracing::debug!(
            keys = key_idx.len(),
            created,
            rows = table.num_rows(),
            "complete"
        );
        Ok(table)
    }
}

/// The completion grid alone: only the selected columns, one row per
/// combination of their distinct values.
#[derive(Debug, Clone)]
pub struct Expand {
    pub columns: Selector,
}

impl Expand {
    pub fn new(columns: Selector) -> Self {
        Self { columns }
    }
}

impl Operator for Expand {
    fn name(&self) -> &'static str {
        "expand"
    }

    fn apply(&self, input: &Table) -> Result<Table> {
        let key_idx = resolve_indices(input, &self.columns)?;
        if key_idx.is_empty() {
            return Err(Error::EmptySelection);
        }
        let cols = input.columns();
        let grid = cartesian(&key_idx.iter().map(|&i| levels(&cols[i])).collect::<Vec<_>>());
        let mut out: Vec<Vec<Value>> = vec![Vec::with_capacity(grid.len()); key_idx.len()];
        for combo in grid {
            for (slot, v) in out.iter_mut().zip(combo) {
                slot.push(v);
            }
        }
        let columns = key_idx
            .iter()
            .zip(out)
            .map(|(&i, values)| cols[i].with_values(values))
            .collect();
        Table::new(columns)
    }
}
