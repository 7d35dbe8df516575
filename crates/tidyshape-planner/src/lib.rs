#![forbid(unsafe_code)]
//! tidyshape-planner: from a YAML pipeline to a linear list of operators.
//!
//! Design:
//! - `dsl::yaml` decodes the document into typed `Step`s plus an optional
//!   `config:` block that overrides the engine configuration.
//! - `lower` turns each step into a boxed `Operator`, injecting the coercion
//!   settings derived from the effective configuration.
//! - Pipelines are linear: every step consumes the previous step's table.

pub mod dsl;
pub mod error;
pub mod lower;

pub use dsl::yaml::{parse_yaml_pipeline, ParsedPipeline, Pipeline, PipelineConfig, Step};
pub use error::PlanError;
pub use lower::{lower, lower_pipeline};
