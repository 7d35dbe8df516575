//! Operator trait.
//!
//! Operators are plain argument structs. Callers (or the exec engine) invoke
//! `apply` on an input table and get a new table back; the input is borrowed
//! immutably, so independent operators can run on shared tables from several
//! threads without synchronization.

use tidyshape_core::table::Table;
use tidyshape_core::Result;

/// Trait that all reshape operators implement.
///
/// Invariants:
/// - `apply` is deterministic given the same input.
/// - The output is built through `Table::new`, so schema invariants hold.
pub trait Operator: Send + Sync {
    /// Human-readable operator name (stable; used in logs and manifests).
    fn name(&self) -> &'static str;

    fn apply(&self, input: &Table) -> Result<Table>;
}

impl<T: Operator + ?Sized> Operator for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn apply(&self, input: &Table) -> Result<Table> {
        (**self).apply(input)
    }
}
