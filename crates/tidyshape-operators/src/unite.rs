//! Unite (many columns -> one text column).

use tidyshape_core::schema::DataType;
use tidyshape_core::selector::Selector;
use tidyshape_core::table::{Column, Table};
use tidyshape_core::value::{Value, NA_LITERAL};
use tidyshape_core::{Error, Result};

use crate::traits::Operator;

pub const DEFAULT_SEP: &str = "_";

#[derive(Debug, Clone)]
pub struct Unite {
    pub name: String,
    pub columns: Selector,
    pub sep: String,
    pub remove: bool,
    /// Render Missing cells as `NA` instead of skipping them.
    pub missing_as_na: bool,
}

impl Unite {
    pub fn new(name: impl Into<String>, columns: Selector) -> Self {
        Self {
            name: name.into(),
            columns,
            sep: DEFAULT_SEP.to_string(),
            remove: true,
            missing_as_na: false,
        }
    }

    pub fn sep(mut self, sep: impl Into<String>) -> Self {
        self.sep = sep.into();
        self
    }

    pub fn remove(mut self, yes: bool) -> Self {
        self.remove = yes;
        self
    }

    pub fn missing_as_na(mut self, yes: bool) -> Self {
        self.missing_as_na = yes;
        self
    }

    fn render_row<'a>(&self, cells: impl Iterator<Item = &'a Value>) -> String {
        let parts: Vec<String> = cells
            .filter_map(|v| match v {
                Value::Missing if self.missing_as_na => Some(NA_LITERAL.to_string()),
                Value::Missing => None,
                v => Some(v.to_string()),
            })
            .collect();
        parts.join(&self.sep)
    }
}

impl Operator for Unite {
    fn name(&self) -> &'static str {
        "unite"
    }

    fn apply(&self, input: &Table) -> Result<Table> {
        let selected = self.columns.resolve(&input.schema())?;
        if selected.is_empty() {
            return Err(Error::EmptySelection);
        }
        let idx = selected
            .iter()
            .map(|n| input.require(n))
            .collect::<Result<Vec<_>>>()?;
        let anchor = idx.iter().copied().min().unwrap_or(0);

        let cols = input.columns();
        let united: Vec<Value> = (0..input.num_rows())
            .map(|row| Value::Text(self.render_row(idx.iter().map(|&i| &cols[i].values[row]))))
            .collect();
        let mut new_col = Some(Column::new(self.name.clone(), DataType::Text, united)?);

        let mut columns = Vec::with_capacity(input.num_columns() + 1);
        for (i, col) in cols.iter().enumerate() {
            if i == anchor {
                columns.extend(new_col.take());
            }
            if !(self.remove && idx.contains(&i)) {
                columns.push(col.clone());
            }
        }

        let out = Table::new(columns)?;
        tracing::debug!(name = %self.name, sources = idx.len(), rows = out.num_rows(), "unite");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centuries() -> Table {
        Table::new(vec![
            Column::infer("country", vec!["AF".into(), "BR".into(), "CN".into()]),
            Column::infer("century", vec!["19".into(), Value::Missing, Value::Missing]),
            Column::infer("year", vec!["99".into(), "00".into(), Value::Missing]),
        ])
        .unwrap()
    }

    #[test]
    fn joins_with_default_separator_in_place() {
        let t = Table::new(vec![
            Column::infer("country", vec!["AF".into()]),
            Column::infer("century", vec!["19".into()]),
            Column::infer("year", vec!["99".into()]),
        ])
        .unwrap();
        let out = Unite::new("new", Selector::names(["century", "year"]))
            .apply(&t)
            .unwrap();
        assert_eq!(out.column_names(), vec!["country", "new"]);
        assert_eq!(out.column("new").unwrap().values[0], Value::from("19_99"));
    }

    #[test]
    fn missing_is_skipped_without_dangling_separator() {
        let out = Unite::new("new", Selector::names(["century", "year"]))
            .sep("")
            .apply(&centuries())
            .unwrap();
        let new = &out.column("new").unwrap().values;
        assert_eq!(new[0], Value::from("1999"));
        assert_eq!(new[1], Value::from("00"));
        assert_eq!(new[2], Value::from(""));
    }

    #[test]
    fn missing_as_na_renders_literal() {
        let out = Unite::new("new", Selector::names(["century", "year"]))
            .missing_as_na(true)
            .apply(&centuries())
            .unwrap();
        assert_eq!(out.column("new").unwrap().values[1], Value::from("NA_00"));
    }

    #[test]
    fn keeps_sources_when_asked() {
        let out = Unite::new("new", Selector::names(["year", "century"]))
            .remove(false)
            .apply(&centuries())
            .unwrap();
        assert_eq!(out.column_names(), vec!["country", "new", "century", "year"]);
        assert_eq!(out.column("new").unwrap().values[0], Value::from("99_19"));
    }

    #[test]
    fn renders_non_text_cells() {
        let t = Table::new(vec![
            Column::infer("a", vec![1.into()]),
            Column::infer("b", vec![true.into()]),
        ])
        .unwrap();
        let out = Unite::new("ab", Selector::Everything).sep("-").apply(&t).unwrap();
        assert_eq!(out.column("ab").unwrap().values[0], Value::from("1-TRUE"));
    }

    #[test]
    fn name_clash_is_rejected() {
        let err = Unite::new("country", Selector::names(["century", "year"]))
            .apply(&centuries())
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateColumn(_)));
    }
}
