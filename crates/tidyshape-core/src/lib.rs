#![forbid(unsafe_code)]
//! tidyshape-core: values, columns, tables, and selectors for the reshape engine.
//!
//! Everything here is plain immutable data:
//! - `Value` is the closed cell type with an explicit `Missing` state and a
//!   generality lattice (`DataType::join`) used for promotion decisions.
//! - `Table` owns its columns and checks schema invariants on construction, so
//!   every operator output is validated by the act of building it.
//! - `Selector` resolves user column references into concrete names.
//!
//! No operators, no I/O, no logging subscribers live in this crate.

pub mod config;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod prelude;
pub mod schema;
pub mod selector;
pub mod table;
pub mod value;

pub use error::{Error, Result};

/// Engine version recorded in run manifests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
