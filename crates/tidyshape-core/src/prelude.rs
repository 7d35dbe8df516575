//! Convenient re-exports for downstream crates.

pub use crate::config::EngineConfig;
pub use crate::error::{Error, Result};
pub use crate::hash::{fingerprint, Hash256};
pub use crate::manifest::{RunManifest, StepRecord};
pub use crate::schema::{DataType, Field, Schema};
pub use crate::selector::{ColumnPredicate, Selector};
pub use crate::table::{Column, GroupKey, Table};
pub use crate::value::{CalendarKind, CalendarValue, Value, NA_LITERAL};
