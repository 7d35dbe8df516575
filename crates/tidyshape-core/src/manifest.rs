//! Run manifest for audit/replay.
//!
//! The engine emits a manifest after a successful pipeline run: the same
//! pipeline over an input with the same fingerprint yields the same output
//! fingerprint, since every operator is a pure function of its input.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hash::Hash256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestId(pub Uuid);

/// One executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub index: usize,
    pub op: String,
    pub rows_out: usize,
    pub columns_out: usize,
    pub elapsed_us: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub id: ManifestId,

    /// Stable hash of the pipeline steps (and their parameters).
    pub plan_hash: Hash256,

    /// Engine version string for provenance.
    pub engine_version: String,

    pub input_digest: Hash256,

    pub output_digest: Option<Hash256>,

    pub steps: Vec<StepRecord>,

    /// Milliseconds since Unix epoch (UTC).
    pub started_ms: u64,
    pub finished_ms: u64,
}

impl RunManifest {
    pub fn new(plan_hash: Hash256, input_digest: Hash256, started_ms: u64) -> Self {
        Self {
            id: ManifestId(Uuid::new_v4()),
            plan_hash,
            engine_version: crate::VERSION.to_string(),
            input_digest,
            output_digest: None,
            steps: Vec::new(),
            started_ms,
            finished_ms: started_ms,
        }
    }

    pub fn record(&mut self, step: StepRecord) {
        self.steps.push(step);
    }

    pub fn finish(mut self, finished_ms: u64, output_digest: Hash256) -> Self {
        self.finished_ms = finished_ms;
        self.output_digest = Some(output_digest);
        self
    }
}
