//! Separate (one column -> many).

use regex::Regex;
use serde::{Deserialize, Serialize};

use tidyshape_core::schema::DataType;
use tidyshape_core::table::{Column, Table};
use tidyshape_core::value::Value;
use tidyshape_core::{Error, Result};

use crate::coerce::Coercion;
use crate::traits::Operator;

/// A maximal run of characters that are neither Unicode letters nor digits.
pub const DEFAULT_SEPARATOR: &str = r"[^\p{L}\p{N}]+";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Separator {
    /// Regular expression; the text is split on every non-overlapping match.
    Pattern(String),
    /// k-1 character positions. Negative positions count from the end.
    Positions(Vec<i64>),
}

impl Default for Separator {
    fn default() -> Self {
        Separator::Pattern(DEFAULT_SEPARATOR.to_string())
    }
}

/// What to do when a row splits into more pieces than target columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraPolicy {
    #[default]
    Drop,
    Merge,
    Error,
}

/// What to do when a row splits into fewer pieces than target columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    #[default]
    Right,
    Left,
    Error,
}

#[derive(Debug, Clone)]
pub struct Separate {
    pub column: String,
    pub into: Vec<String>,
    pub sep: Separator,
    pub remove: bool,
    pub convert: bool,
    pub extra: ExtraPolicy,
    pub fill: FillPolicy,
    pub coercion: Coercion,
}

impl Separate {
    pub fn new<I, S>(column: impl Into<String>, into: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column: column.into(),
            into: into.into_iter().map(Into::into).collect(),
            sep: Separator::default(),
            remove: true,
            convert: false,
            extra: ExtraPolicy::default(),
            fill: FillPolicy::default(),
            coercion: Coercion::default(),
        }
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.sep = Separator::Pattern(pattern.into());
        self
    }

    pub fn positions(mut self, positions: Vec<i64>) -> Self {
        self.sep = Separator::Positions(positions);
        self
    }

    pub fn remove(mut self, yes: bool) -> Self {
        self.remove = yes;
        self
    }

    pub fn convert(mut self, yes: bool) -> Self {
        self.convert = yes;
        self
    }

    pub fn extra(mut self, policy: ExtraPolicy) -> Self {
        self.extra = policy;
        self
    }

    pub fn fill(mut self, policy: FillPolicy) -> Self {
        self.fill = policy;
        self
    }

    pub fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = coercion;
        self
    }
}

/// Rows that needed a policy decision, for the warning emitted after a split.
#[derive(Default)]
struct Adjusted {
    extra: Vec<usize>,
    short: Vec<usize>,
}

impl Separate {
    fn split_pattern(
        &self,
        re: &Regex,
        row: usize,
        text: &str,
        adjusted: &mut Adjusted,
    ) -> Result<Vec<Option<String>>> {
        let k = self.into.len();
        let pieces: Vec<&str> = re.split(text).collect();
        let m = pieces.len();

        if m > k {
            return match self.extra {
                ExtraPolicy::Error => Err(Error::TooManyPieces {
                    row,
                    expected: k,
                    found: m,
                }),
                ExtraPolicy::Drop => {
                    adjusted.extra.push(row);
                    Ok(pieces[..k].iter().map(|p| Some(p.to_string())).collect())
                }
                ExtraPolicy::Merge => Ok(re.splitn(text, k).map(|p| Some(p.to_string())).collect()),
            };
        }

        let mut out: Vec<Option<String>> = pieces.into_iter().map(|p| Some(p.to_string())).collect();
        if m < k {
            let pad = std::iter::repeat(None).take(k - m);
            match self.fill {
                FillPolicy::Error => {
                    return Err(Error::TooFewPieces {
                        row,
                        expected: k,
                        found: m,
                    })
                }
                FillPolicy::Right => {
                    adjusted.short.push(row);
                    out.extend(pad);
                }
                FillPolicy::Left => {
                    out.splice(0..0, pad);
                }
            }
        }
        Ok(out)
    }
}

/// Resolve a signed cut position to a character offset in `0..=len`.
fn cut_offset(position: i64, len: usize) -> usize {
    let magnitude = usize::try_from(position.unsigned_abs()).unwrap_or(usize::MAX);
    if position >= 0 {
        magnitude.min(len)
    } else {
        len.saturating_sub(magnitude)
    }
}

fn split_positions(positions: &[i64], text: &str) -> Vec<Option<String>> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut bounds = Vec::with_capacity(positions.len() + 2);
    bounds.push(0);
    bounds.extend(positions.iter().map(|&p| cut_offset(p, len)));
    bounds.push(len);
    bounds
        .windows(2)
        .map(|w| {
            let piece = if w[0] <= w[1] {
                chars[w[0]..w[1]].iter().collect()
            } else {
                String::new()
            };
            Some(piece)
        })
        .collect()
}

impl Operator for Separate {
    fn name(&self) -> &'static str {
        "separate"
    }

    fn apply(&self, input: &Table) -> Result<Table> {
        let src_idx = input.require(&self.column)?;
        let k = self.into.len();
        if k == 0 {
            return Err(Error::InvalidArgument(
                "separate needs at least one target column".into(),
            ));
        }
        let pattern = match &self.sep {
            Separator::Pattern(p) => Some(Regex::new(p)?),
            Separator::Positions(ps) if ps.len() != k - 1 => {
                return Err(Error::InvalidPositionCount {
                    expected: k - 1,
                    found: ps.len(),
                })
            }
            Separator::Positions(_) => None,
        };

        let src = &input.columns()[src_idx];
        let mut targets: Vec<Vec<Value>> = vec![Vec::with_capacity(src.len()); k];
        let mut adjusted = Adjusted::default();

        for (row, cell) in src.values.iter().enumerate() {
            let pieces = if cell.is_missing() {
                vec![None; k]
            } else {
                let text = cell.to_string();
                match (&pattern, &self.sep) {
                    (Some(re), _) => self.split_pattern(re, row, &text, &mut adjusted)?,
                    (None, Separator::Positions(ps)) => split_positions(ps, &text),
                    (None, Separator::Pattern(_)) => {
                        return Err(Error::Invariant("pattern separator was not compiled".into()))
                    }
                }
            };
            for (slot, piece) in targets.iter_mut().zip(pieces) {
                slot.push(piece.map_or(Value::Missing, Value::Text));
            }
        }

        if !adjusted.extra.is_empty() {
            tracing::warn!(
                column = %self.column,
                rows = adjusted.extra.len(),
                first_row = adjusted.extra[0],
                "expected {k} pieces; additional pieces discarded"
            );
        }
        if !adjusted.short.is_empty() {
            tracing::warn!(
                column = %self.column,
                rows = adjusted.short.len(),
                first_row = adjusted.short[0],
                "expected {k} pieces; missing pieces filled with NA on the right"
            );
        }

        let mut new_columns = Vec::with_capacity(k);
        for (name, values) in self.into.iter().zip(targets) {
            let col = Column::new(name.clone(), DataType::Text, values)?;
            new_columns.push(if self.convert {
                self.coercion.coerce_column(&col)
            } else {
                col
            });
        }

        let mut columns = Vec::with_capacity(input.num_columns() + k);
        let mut pending = Some(new_columns);
        for (i, col) in input.columns().iter().enumerate() {
            if i != src_idx || !self.remove {
                columns.push(col.clone());
            }
            if i == src_idx {
                columns.extend(pending.take().unwrap_or_default());
            }
        }

        let out = Table::new(columns)?;
        tracing::debug!(column = %self.column, pieces = k, rows = out.num_rows(), "separate");
        Ok(out)
    }
}
