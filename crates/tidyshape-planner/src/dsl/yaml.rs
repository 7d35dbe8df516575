//! YAML pipeline documents.
//!
//! Example:
//! ```yaml
//! config: { na_strings: ["NA", ""], max_output_cells: 1000000 }
//! steps:
//!   - op: gather
//!     columns: { except: { names: [country] } }
//!     key: year
//!     value: cases
//!     convert_key: true
//!   - op: separate
//!     column: rate
//!     into: [cases, population]
//!     convert: true
//!   - op: fill
//!     columns: { names: [country] }
//!     direction: downup
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tidyshape_core::config::EngineConfig;
use tidyshape_core::hash::{hash_serde, Hash256};
use tidyshape_core::selector::Selector;
use tidyshape_core::value::Value;
use tidyshape_operators::{Direction, ExtraPolicy, FillPolicy};

use crate::error::PlanError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub config: Option<PipelineConfig>,
    pub steps: Vec<Step>,
}

fn yes() -> bool {
    true
}

fn default_unite_sep() -> String {
    tidyshape_operators::unite::DEFAULT_SEP.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Gather {
        columns: Selector,
        key: String,
        value: String,
        #[serde(default)]
        drop_missing: bool,
        #[serde(default)]
        convert: bool,
        #[serde(default)]
        convert_key: bool,
    },

    Spread {
        key: String,
        value: String,
        #[serde(default)]
        fill: Option<Value>,
        #[serde(default)]
        convert: bool,
        #[serde(default)]
        sep: Option<String>,
    },

    /// `sep` (a regex) and `positions` are mutually exclusive; with neither,
    /// the default non-alphanumeric separator applies.
    Separate {
        column: String,
        into: Vec<String>,
        #[serde(default)]
        sep: Option<String>,
        #[serde(default)]
        positions: Option<Vec<i64>>,
        #[serde(default = "yes")]
        remove: bool,
        #[serde(default)]
        convert: bool,
        #[serde(default)]
        extra: ExtraPolicy,
        #[serde(default)]
        fill: FillPolicy,
    },

    Unite {
        name: String,
        columns: Selector,
        #[serde(default = "default_unite_sep")]
        sep: String,
        #[serde(default = "yes")]
        remove: bool,
        #[serde(default)]
        missing_as_na: bool,
    },

    Complete {
        columns: Selector,
        #[serde(default)]
        fill: BTreeMap<String, Value>,
        #[serde(default)]
        explicit: bool,
    },

    Expand {
        columns: Selector,
    },

    Fill {
        columns: Selector,
        #[serde(default)]
        direction: Direction,
    },

    DropNa {
        #[serde(default)]
        columns: Option<Selector>,
    },

    ReplaceNa {
        values: BTreeMap<String, Value>,
    },
}

impl Step {
    pub fn op_name(&self) -> &'static str {
        match self {
            Step::Gather { .. } => "gather",
            Step::Spread { .. } => "spread",
            Step::Separate { .. } => "separate",
            Step::Unite { .. } => "unite",
            Step::Complete { .. } => "complete",
            Step::Expand { .. } => "expand",
            Step::Fill { .. } => "fill",
            Step::DropNa { .. } => "drop_na",
            Step::ReplaceNa { .. } => "replace_na",
        }
    }

    /// Checks that need no table: argument combinations the operators cannot express.
    fn validate(&self, index: usize) -> Result<(), PlanError> {
        match self {
            Step::Separate {
                sep: Some(_),
                positions: Some(_),
                ..
            } => Err(PlanError::Invalid(format!(
                "step {index} (separate): `sep` and `positions` are mutually exclusive"
            ))),
            Step::Separate { into, .. } if into.is_empty() => Err(PlanError::Invalid(format!(
                "step {index} (separate): `into` must name at least one column"
            ))),
            Step::Gather { key, value, .. } | Step::Spread { key, value, .. } if key == value => {
                Err(PlanError::Invalid(format!(
                    "step {index} ({}): `key` and `value` must differ",
                    self.op_name()
                )))
            }
            _ => Ok(()),
        }
    }
}

/// `config:` block of a pipeline document. Unset fields keep the engine's values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub na_strings: Option<Vec<String>>,
    pub max_output_cells: Option<usize>,
    pub validate_each_step: Option<bool>,
}

impl PipelineConfig {
    /// Overlay this block on `base`.
    pub fn apply(&self, mut base: EngineConfig) -> EngineConfig {
        if let Some(na) = &self.na_strings {
            base.na_strings = na.clone();
        }
        if let Some(cap) = self.max_output_cells {
            base.max_output_cells = Some(cap);
        }
        if let Some(v) = self.validate_each_step {
            base.validate_each_step = v;
        }
        base
    }
}

#[derive(Debug, Clone)]
pub struct ParsedPipeline {
    pub steps: Vec<Step>,
    pub config: PipelineConfig,
}

impl ParsedPipeline {
    /// Stable hash of the steps and their parameters.
    pub fn plan_hash(&self) -> Result<Hash256, PlanError> {
        Ok(hash_serde(&self.steps)?)
    }
}

/// Parse a YAML document into validated steps and its config overrides.
pub fn parse_yaml_pipeline(yaml_src: &str) -> Result<ParsedPipeline, PlanError> {
    let doc: Pipeline = serde_yaml::from_str(yaml_src)?;
    if doc.steps.is_empty() {
        return Err(PlanError::Invalid("empty pipeline".into()));
    }
    for (i, step) in doc.steps.iter().enumerate() {
        step.validate(i)?;
    }
    Ok(ParsedPipeline {
        steps: doc.steps,
        config: doc.config.unwrap_or_default(),
    })
}
