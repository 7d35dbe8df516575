//! Deterministic replay & provenance helpers.
//!
//! Every operator is a pure function of its input, so rerunning the same
//! steps over a table with the manifest's input fingerprint must reproduce
//! the manifest's output fingerprint.

use tidyshape_core::hash::{fingerprint, hash_serde, Hash256};
use tidyshape_core::manifest::RunManifest;
use tidyshape_core::table::Table;

use tidyshape_planner::{ParsedPipeline, Step};

use crate::runtime::{Engine, ExecError};

/// Stable digest of the steps and their parameters.
pub fn hash_steps(steps: &[Step]) -> Result<Hash256, ExecError> {
    hash_serde(&steps).map_err(|e| ExecError::Hash(e.to_string()))
}

/// Rerun `parsed` over `input` and check it against a recorded manifest.
///
/// Returns `Ok(false)` when the input or the pipeline differs from the
/// recorded run, or when the rerun produces a different output.
pub fn verify_replay(
    engine: &Engine,
    parsed: &ParsedPipeline,
    input: &Table,
    manifest: &RunManifest,
) -> Result<bool, ExecError> {
    if fingerprint(input) != manifest.input_digest {
        tracing::debug!(manifest = %manifest.id.0, "replay input differs");
        return Ok(false);
    }
    if hash_steps(&parsed.steps)? != manifest.plan_hash {
        tracing::debug!(manifest = %manifest.id.0, "replay pipeline differs");
        return Ok(false);
    }
    let rerun = engine.run_pipeline(parsed, input)?;
    Ok(rerun.manifest.output_digest == manifest.output_digest)
}
