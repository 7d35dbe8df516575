//! Logical column types and the promotion lattice.
//!
//! `Boolean < Integer < Float < Text` is a chain; `Calendar` sits directly
//! below `Text` and joins with anything but itself to `Text`.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Integer,
    Float,
    Calendar,
    Text,
}

impl DataType {
    /// Rank in the generality order. Equal ranks never occur for distinct types.
    pub fn generality(self) -> u8 {
        match self {
            DataType::Boolean => 0,
            DataType::Integer => 1,
            DataType::Float => 2,
            DataType::Calendar => 3,
            DataType::Text => 4,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, DataType::Boolean | DataType::Integer | DataType::Float)
    }

    /// Least upper bound of two types.
    pub fn join(self, other: DataType) -> DataType {
        if self == other {
            return self;
        }
        if self.is_numeric() && other.is_numeric() {
            if self.generality() >= other.generality() {
                self
            } else {
                other
            }
        } else {
            DataType::Text
        }
    }

    /// Join over a sequence; `None` for an empty sequence.
    pub fn join_all<I: IntoIterator<Item = DataType>>(types: I) -> Option<DataType> {
        types.into_iter().reduce(DataType::join)
    }

    /// Whether values of `self` can be widened into `target` without loss of meaning.
    pub fn widens_to(self, target: DataType) -> bool {
        self.join(target) == target
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataType::Boolean => "boolean",
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::Calendar => "calendar",
            DataType::Text => "text",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
