#![forbid(unsafe_code)]
//! tidyshape-exec: pipeline runtime, deterministic replay, and metrics.
//!
//! The runtime applies lowered operators one after another over an in-memory
//! table, checks invariants and the output-size guard after every step, and
//! emits a `RunManifest` with input/output fingerprints.

pub mod metrics;
pub mod replay;
pub mod runtime;

pub use replay::{hash_steps, verify_replay};
pub use runtime::{Engine, ExecError, RunOutput};
