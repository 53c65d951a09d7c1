//! Validation reports
//!
//! Per-overlay rows and the run summary, rendered either as text tables or
//! as a JSON document.

mod table;

pub use table::{truncate_value, Table};

use chrono::{DateTime, Utc};
use cv_core::{Classification, FailureStates, ReconciledRow, Verdict};
use serde::Serialize;

use crate::document::DocumentSource;

/// Schema version for the JSON report
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Schema identifier for the JSON report
pub const REPORT_SCHEMA_ID: &str = "config-validate/report@1";

/// Column headers of the text table.
pub const TABLE_HEADERS: [&str; 5] = ["Key", "Unknown", "Missing", "Value", "Ignored"];

/// One table row. Header rows have no classification and no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub key: String,
    pub display_key: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,

    /// Full value; truncation happens only when rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ReportRow {
    pub fn is_header(&self) -> bool {
        self.classification.is_none()
    }

    fn cells(&self, value_width: usize) -> Vec<String> {
        let Some(class) = self.classification else {
            return vec![self.display_key.clone()];
        };
        vec![
            self.display_key.clone(),
            yes_no(class.is_unknown),
            yes_no(class.is_missing),
            truncate_value(self.value.as_deref().unwrap_or_default(), value_width),
            yes_no(class.is_ignored),
        ]
    }
}

impl From<&ReconciledRow<'_>> for ReportRow {
    fn from(row: &ReconciledRow<'_>) -> Self {
        let entry = row.entry();
        Self {
            key: entry.key.to_string(),
            display_key: entry.display_key.clone(),
            classification: row.classification(),
            value: entry.value().map(str::to_string),
        }
    }
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "Yes" } else { "No" };
    text.to_string()
}

/// Result for one environment overlay.
#[derive(Debug, Clone, Serialize)]
pub struct OverlaySummary {
    /// Environment label (or file path for unlabelled overlays)
    pub name: String,

    pub source: DocumentSource,

    pub rows: Vec<ReportRow>,

    /// Failure states seen in this overlay, including hidden rows
    pub observed: FailureStates,
}

impl OverlaySummary {
    /// Format as a titled text table
    pub fn to_human(&self, value_width: usize) -> String {
        let mut out = String::new();
        out.push_str(&self.name.to_uppercase());
        out.push('\n');
        if self.name != self.source.path {
            out.push_str(&self.source.path);
            out.push('\n');
        }

        let mut table = Table::new(TABLE_HEADERS);
        for row in &self.rows {
            table.add_row(row.cells(value_width));
        }
        out.push_str(&table.render());
        out
    }
}

/// Summary of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub schema_version: u32,
    pub schema_id: String,
    pub created_at: DateTime<Utc>,

    pub baseline: DocumentSource,

    pub overlays: Vec<OverlaySummary>,

    /// Union of every overlay's observed states
    pub observed: FailureStates,

    /// States configured to fail the run
    pub failure_states: FailureStates,

    pub verdict: Verdict,
    pub exit_code: i32,
}

impl RunSummary {
    pub fn new(
        baseline: DocumentSource,
        overlays: Vec<OverlaySummary>,
        observed: FailureStates,
        failure_states: FailureStates,
        verdict: Verdict,
    ) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            schema_id: REPORT_SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            baseline,
            overlays,
            observed,
            failure_states,
            exit_code: verdict.exit_code(),
            verdict,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.verdict.is_failure()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Format as human-readable tables followed by the verdict
    pub fn to_human(&self, value_width: usize) -> String {
        let mut out = String::new();
        for overlay in &self.overlays {
            out.push_str(&overlay.to_human(value_width));
            out.push('\n');
        }
        out.push_str(&format!(
            "Result: {} (observed: {}; failing on: {})\n",
            if self.is_failure() { "FAILED" } else { "PASSED" },
            self.observed,
            self.failure_states,
        ));
        out
    }
}
