//! Validation pipeline
//!
//! Runs one validation end to end:
//! - Discover the baseline and overlays under the root
//! - Load and flatten every document
//! - Reconcile each requested overlay against the baseline
//! - Decide the verdict from the states observed across all overlays

use std::path::Path;

use cv_core::{decide, flatten, reconcile, FailureStates, FlatEntry, IgnorePaths};
use thiserror::Error;

use crate::discovery::{discover, DiscoveryError, OverlayFile};
use crate::document::{self, Document, DocumentError};
use crate::options::{Options, OptionsError};
use crate::summary::{OverlaySummary, ReportRow, RunSummary};

/// Exit code for runs that could not be validated at all
pub const EXIT_FATAL: i32 = 2;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("options error: {0}")]
    Options(#[from] OptionsError),

    #[error("{0}")]
    Discovery(#[from] DiscoveryError),

    #[error("document error: {0}")]
    Document(#[from] DocumentError),
}

impl PipelineError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Options(_) | PipelineError::Discovery(_) | PipelineError::Document(_) => {
                EXIT_FATAL
            }
        }
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Discover, load and validate the settings files under `root`.
pub fn run(root: &Path, options: &Options) -> PipelineResult<RunSummary> {
    let discovery = discover(root, &options.stem)?;
    tracing::info!(
        baseline = %discovery.baseline.display(),
        environments = ?discovery.environment_names(),
        "discovered settings files"
    );

    let selected = discovery.select(&options.environments)?;
    if selected.is_empty() {
        tracing::warn!("no environments requested; only the baseline is loaded");
    }

    let baseline = document::load_file(&discovery.baseline)?;
    let overlays = selected
        .into_iter()
        .map(|overlay| {
            let document = document::load_file(&overlay.path)?;
            Ok((overlay, document))
        })
        .collect::<Result<Vec<_>, DocumentError>>()?;

    Ok(validate(&baseline, &overlays, options))
}

/// Validate already-loaded overlays against a loaded baseline.
pub fn validate(
    baseline: &Document,
    overlays: &[(OverlayFile, Document)],
    options: &Options,
) -> RunSummary {
    let baseline_entries = flatten(&baseline.root);
    let ignore = options.ignore_set();

    let mut observed = FailureStates::new();
    let mut summaries = Vec::with_capacity(overlays.len());

    for (overlay, document) in overlays {
        let summary = check_overlay(&baseline_entries, &overlay.name, document, &ignore, &options.show);
        tracing::info!(
            environment = %summary.name,
            rows = summary.rows.len(),
            observed = %summary.observed,
            "checked overlay"
        );
        observed.merge(&summary.observed);
        summaries.push(summary);
    }

    let verdict = decide(&observed, &options.failure_states);
    tracing::debug!(?verdict, observed = %observed, "run decided");

    RunSummary::new(
        baseline.source.clone(),
        summaries,
        observed,
        options.failure_states.clone(),
        verdict,
    )
}

/// Reconcile one overlay document against the flattened baseline.
pub fn check_overlay(
    baseline_entries: &[FlatEntry],
    name: &str,
    document: &Document,
    ignore: &IgnorePaths,
    show: &FailureStates,
) -> OverlaySummary {
    let overlay_entries = flatten(&document.root);
    let reconciliation = reconcile(baseline_entries, &overlay_entries, ignore, show);

    OverlaySummary {
        name: name.to_string(),
        source: document.source.clone(),
        rows: reconciliation.rows.iter().map(ReportRow::from).collect(),
        observed: reconciliation.observed,
    }
}
