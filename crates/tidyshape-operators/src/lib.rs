#![forbid(unsafe_code)]
//! tidyshape-operators: pure reshape transforms over `tidyshape_core::Table`.
//!
//! Design intent:
//! - Every operator is an argument struct implementing `Operator`; `apply`
//!   never mutates its input and either returns a fully valid table or an error.
//! - Coercion settings (NA strings, the calendar collaborator) are explicit
//!   fields on the operators that convert, never ambient state.
//! - Operators log through `tracing`; installing a subscriber is the caller's job.

pub mod coerce;
pub mod traits;

pub mod complete;
pub mod fill;
pub mod gather;
pub mod missing;
pub mod separate;
pub mod spread;
pub mod unite;

#[cfg(feature = "chrono")]
pub mod calendar;

pub use coerce::{CalendarParser, Coercion};
pub use complete::{Complete, Expand};
pub use fill::{Direction, Fill};
pub use gather::Gather;
pub use missing::{DropNa, ReplaceNa};
pub use separate::{ExtraPolicy, FillPolicy, Separate, Separator};
pub use spread::Spread;
pub use traits::Operator;
pub use unite::Unite;

#[cfg(feature = "chrono")]
pub use calendar::IsoCalendar;
