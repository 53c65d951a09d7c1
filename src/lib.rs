//! config-validate - configuration drift detection
//!
//! Compares a baseline settings file (`appsettings.json`) against its
//! environment overlays (`appsettings.<Environment>.json`) and reports keys
//! that are unknown to the baseline, missing from an overlay, or ignored by
//! policy. The key flattening and reconciliation kernel lives in `cv-core`;
//! this crate supplies discovery, loading, options and reporting around it.

pub mod discovery;
pub mod document;
pub mod options;
pub mod pipeline;
pub mod summary;

pub use cv_core::{FailureState, FailureStates, Verdict};
pub use discovery::{discover, Discovery, DiscoveryError, OverlayFile};
pub use document::{Document, DocumentError, DocumentSource};
pub use options::{CliOverrides, EffectiveOptions, Options, OptionsError};
pub use pipeline::{run, validate, PipelineError, EXIT_FATAL};
pub use summary::{OverlaySummary, ReportRow, RunSummary};
