//! Runtime: apply a lowered pipeline step by step and emit a RunManifest.
//!
//! Behavior:
//! - Overlays the pipeline's `config:` block on the engine configuration.
//! - Lowers steps with coercion settings built from the effective config.
//! - After every step: optional invariant re-check, then the output-cell guard.
//! - Emits a `RunManifest` with the plan hash and input/output fingerprints.

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use thiserror::Error;

use tidyshape_core::config::EngineConfig;
use tidyshape_core::hash::{fingerprint, Hash256};
use tidyshape_core::manifest::{RunManifest, StepRecord};
use tidyshape_core::table::Table;

use tidyshape_operators::{CalendarParser, Coercion, Operator};

use tidyshape_planner::{lower_pipeline, parse_yaml_pipeline, ParsedPipeline, PlanError, Step};

use crate::metrics::emit_span;
use crate::replay::hash_steps;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("step {step} ({op}): {source}")]
    Operator {
        step: usize,
        op: &'static str,
        #[source]
        source: tidyshape_core::Error,
    },

    #[error("plan: {0}")]
    Plan(#[from] PlanError),

    #[error("step {step} produced {cells} cells, limit is {limit}")]
    Budget {
        step: usize,
        cells: usize,
        limit: usize,
    },

    #[error("invariant violated after step {step}: {source}")]
    Invariant {
        step: usize,
        #[source]
        source: tidyshape_core::Error,
    },

    #[error("hashing error: {0}")]
    Hash(String),
}

/// Final table plus the manifest describing how it was produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    pub table: Table,
    pub manifest: RunManifest,
}

/// Engine owns the configuration and the optional calendar collaborator.
#[derive(Clone)]
pub struct Engine {
    cfg: EngineConfig,
    calendar: Option<Arc<dyn CalendarParser>>,
}

impl Engine {
    pub fn new(cfg: EngineConfig) -> Self {
        Self {
            cfg,
            calendar: None,
        }
    }

    /// Inject a date/time recognizer for type coercion.
    pub fn with_calendar(mut self, parser: Arc<dyn CalendarParser>) -> Self {
        self.calendar = Some(parser);
        self
    }

    #[cfg(feature = "chrono")]
    pub fn with_iso_calendar(self) -> Self {
        self.with_calendar(Arc::new(tidyshape_operators::IsoCalendar))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    fn coercion(&self, cfg: &EngineConfig) -> Coercion {
        let coercion = Coercion::new().with_na_strings(cfg.na_strings.iter().cloned());
        match &self.calendar {
            Some(parser) => coercion.with_calendar(Arc::clone(parser)),
            None => coercion,
        }
    }

    /// Parse a YAML document and run it over `input`.
    pub fn run_yaml(&self, yaml_src: &str, input: &Table) -> Result<RunOutput, ExecError> {
        let parsed = parse_yaml_pipeline(yaml_src)?;
        self.run_pipeline(&parsed, input)
    }

    /// Run a parsed pipeline; its `config:` block overrides the engine's.
    pub fn run_pipeline(
        &self,
        parsed: &ParsedPipeline,
        input: &Table,
    ) -> Result<RunOutput, ExecError> {
        let cfg = parsed.config.apply(self.cfg.clone());
        self.execute(&parsed.steps, &cfg, input)
    }

    /// Run steps under the engine's own configuration.
    pub fn run_steps(&self, steps: &[Step], input: &Table) -> Result<RunOutput, ExecError> {
        self.execute(steps, &self.cfg, input)
    }

    fn execute(
        &self,
        steps: &[Step],
        cfg: &EngineConfig,
        input: &Table,
    ) -> Result<RunOutput, ExecError> {
        let plan_hash = hash_steps(steps)?;
        let ops = lower_pipeline(steps, &self.coercion(cfg));
        self.run_operators(&ops, cfg, plan_hash, input)
    }

    /// Apply already-instantiated operators in order.
    pub fn run_operators(
        &self,
        ops: &[Box<dyn Operator>],
        cfg: &EngineConfig,
        plan_hash: Hash256,
        input: &Table,
    ) -> Result<RunOutput, ExecError> {
        let mut manifest = RunManifest::new(plan_hash, fingerprint(input), now_millis());
        let mut current = input.clone();

        for (index, op) in ops.iter().enumerate() {
            let span = tracing::info_span!("step", index, op = op.name());
            let _entered = span.enter();
            let started = Instant::now();

            let out = op.apply(&current).map_err(|source| ExecError::Operator {
                step: index,
                op: op.name(),
                source,
            })?;

            if cfg.validate_each_step {
                out.validate()
                    .map_err(|source| ExecError::Invariant { step: index, source })?;
            }

            let cells = out.num_rows().saturating_mul(out.num_columns());
            if let Some(limit) = cfg.max_output_cells {
                if cells > limit {
                    tracing::warn!(cells, limit, "output guard tripped");
                    return Err(ExecError::Budget {
                        step: index,
                        cells,
                        limit,
                    });
                }
            }

            let elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
            emit_span(
                "step",
                &[
                    ("op", op.name().to_string()),
                    ("rows", out.num_rows().to_string()),
                    ("columns", out.num_columns().to_string()),
                    ("elapsed_us", elapsed_us.to_string()),
                ],
            );
            manifest.record(StepRecord {
                index,
                op: op.name().to_string(),
                rows_out: out.num_rows(),
                columns_out: out.num_columns(),
                elapsed_us,
            });
            current = out;
        }

        let manifest = manifest.finish(now_millis(), fingerprint(&current));
        tracing::debug!(
            steps = manifest.steps.len(),
            output = %manifest.output_digest.map(|h| h.to_hex()).unwrap_or_default(),
            "pipeline finished"
        );
        Ok(RunOutput {
            table: current,
            manifest,
        })
    }
}

// --- helpers ---

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
