#![forbid(unsafe_code)]
//! tidyshape: reshape in-memory tables between wide and long layouts.
//!
//! ```no_run
//! use tidyshape::prelude::*;
//!
//! # fn main() -> tidyshape::Result<()> {
//! let wide = Table::new(vec![
//!     Column::infer("country", vec!["AF".into(), "BR".into()]),
//!     Column::infer("1999", vec![745.into(), 37737.into()]),
//!     Column::infer("2000", vec![2666.into(), 80488.into()]),
//! ])?;
//! let long = Gather::new(Selector::except(Selector::names(["country"])), "year", "cases")
//!     .convert_key(true)
//!     .apply(&wide)?;
//! assert_eq!(long.num_rows(), 4);
//! # Ok(())
//! # }
//! ```

pub use tidyshape_core as core;
pub use tidyshape_exec as exec;
pub use tidyshape_operators as operators;
pub use tidyshape_planner as planner;

pub use tidyshape_core::{Error, Result};

pub mod prelude {
    pub use tidyshape_core::prelude::*;
    pub use tidyshape_exec::{Engine, ExecError, RunOutput};
    pub use tidyshape_operators::{
        CalendarParser, Coercion, Complete, Direction, DropNa, Expand, ExtraPolicy, Fill,
        FillPolicy, Gather, Operator, ReplaceNa, Separate, Separator, Spread, Unite,
    };
    pub use tidyshape_planner::{parse_yaml_pipeline, ParsedPipeline, PlanError, Step};
}
