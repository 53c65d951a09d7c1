//! Exit policy: turns the states observed across a run into a verdict.

use serde::Serialize;

use crate::state::FailureStates;

/// Outcome of a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Success,
    Failure,
}

impl Verdict {
    /// Process exit code for this verdict.
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Success => 0,
            Verdict::Failure => 1,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Failure)
    }
}

/// Decide the run outcome.
///
/// `observed` must be the union over every overlay of the run; this is
/// evaluated once, not per overlay.
pub fn decide(observed: &FailureStates, configured: &FailureStates) -> Verdict {
    if observed.intersects(configured) {
        Verdict::Failure
    } else {
        Verdict::Success
    }
}
