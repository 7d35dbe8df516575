//! Engine configuration that downstream crates can serialize/deserialize.
//!
//! Operators never read this directly: the exec engine turns it into explicit
//! operator arguments (coercion settings) and run-level guards.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cell texts treated as Missing by type coercion.
    pub na_strings: Vec<String>,

    /// Hard cap on rows x columns of any step's output. `None` disables the guard.
    pub max_output_cells: Option<usize>,

    /// Re-check table invariants after every pipeline step.
    pub validate_each_step: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            na_strings: vec![crate::value::NA_LITERAL.to_string()],
            max_output_cells: None,
            validate_each_step: true,
        }
    }
}

impl EngineConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `TIDYSHAPE_NA_STRINGS`: comma-separated texts treated as missing
    /// - `TIDYSHAPE_MAX_OUTPUT_CELLS`: output cell cap per step
    /// - `TIDYSHAPE_VALIDATE_STEPS`: `true`/`false` (or `1`/`0`)
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("TIDYSHAPE_NA_STRINGS") {
            cfg.na_strings = s.split(',').map(|t| t.trim().to_string()).collect();
        }

        if let Ok(s) = std::env::var("TIDYSHAPE_MAX_OUTPUT_CELLS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.max_output_cells = Some(v);
            }
        }

        if let Ok(s) = std::env::var("TIDYSHAPE_VALIDATE_STEPS") {
            if let Some(v) = parse_flag(&s) {
                cfg.validate_each_step = v;
            }
        }

        cfg
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
