//! Built-in option defaults (layer 1)

use cv_core::FailureState;
use serde::{Deserialize, Serialize};

/// Environment checked when nothing else is requested.
pub const DEFAULT_ENVIRONMENT: &str = "Production";

/// Shared file-name prefix of the baseline and its overlays.
pub const DEFAULT_STEM: &str = "appsettings";

/// Values longer than this are truncated in the table.
pub const DEFAULT_VALUE_WIDTH: usize = 27;

/// Built-in default option values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Environments to check (default: ["Production"])
    pub environments: Vec<String>,

    /// States that fail the run (default: [Missing])
    pub failure_states: Vec<FailureState>,

    /// Keys excluded from failure accumulation (default: none)
    pub ignore_paths: Vec<String>,

    /// States to show; empty shows every row (default: none)
    pub show: Vec<FailureState>,

    /// Display truncation width for values (default: 27)
    pub value_width: usize,

    /// File stem (default: "appsettings")
    pub stem: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            environments: vec![DEFAULT_ENVIRONMENT.to_string()],
            failure_states: vec![FailureState::Missing],
            ignore_paths: Vec::new(),
            show: Vec::new(),
            value_width: DEFAULT_VALUE_WIDTH,
            stem: DEFAULT_STEM.to_string(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "environments": self.environments,
            "failure_states": self.failure_states,
            "ignore_paths": self.ignore_paths,
            "show": self.show,
            "value_width": self.value_width,
            "stem": self.stem,
        })
    }
}
