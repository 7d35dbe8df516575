//! Carry-forward fill of Missing cells.

use serde::{Deserialize, Serialize};

use tidyshape_core::selector::Selector;
use tidyshape_core::table::{Column, Table};
use tidyshape_core::value::Value;
use tidyshape_core::Result;

use crate::traits::Operator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Down,
    Up,
    /// Down first, then up over whatever is still missing.
    #[serde(rename = "downup")]
    DownUp,
    #[serde(rename = "updown")]
    UpDown,
}

#[derive(Debug, Clone)]
pub struct Fill {
    pub columns: Selector,
    pub direction: Direction,
}

impl Fill {
    pub fn new(columns: Selector) -> Self {
        Self {
            columns,
            direction: Direction::default(),
        }
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}

fn carry<'a>(cells: impl Iterator<Item = &'a mut Value>) {
    let mut last: Option<Value> = None;
    for cell in cells {
        if cell.is_missing() {
            if let Some(v) = &last {
                *cell = v.clone();
            }
        } else {
            last = Some(cell.clone());
        }
    }
}

fn fill_column(column: &Column, direction: Direction) -> Column {
    let mut values = column.values.clone();
    match direction {
        Direction::Down => carry(values.iter_mut()),
        Direction::Up => carry(values.iter_mut().rev()),
        Direction::DownUp => {
            carry(values.iter_mut());
            carry(values.iter_mut().rev());
        }
        Direction::UpDown => {
            carry(values.iter_mut().rev());
            carry(values.iter_mut());
        }
    }
    column.with_values(values)
}

impl Operator for Fill {
    fn name(&self) -> &'static str {
        "fill"
    }

    fn apply(&self, input: &Table) -> Result<Table> {
        let selected = self.columns.resolve(&input.schema())?;
        let columns = input
            .columns()
            .iter()
            .map(|col| {
                if selected.contains(&col.name) {
                    fill_column(col, self.direction)
                } else {
                    col.clone()
                }
            })
            .collect();
        let out = Table::new(columns)?;
        tracing::debug!(columns = selected.len(), direction = ?self.direction, "fill");
        Ok(out)
    }
}
