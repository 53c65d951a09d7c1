//! Key flattening and reconciliation kernel.
//!
//! Takes a baseline configuration tree and any number of environment
//! overlays, flattens them into colon-separated key paths and classifies
//! every key as unknown, missing or ignored. The accumulated failure states
//! drive a single success/failure verdict for the whole run.
//!
//! Loading documents, finding files and rendering tables are left to the
//! caller; everything in this crate is a pure function over its inputs.

mod flatten;
mod key;
mod node;
mod policy;
mod reconcile;
mod state;

pub use flatten::{flatten, EntryKind, FlatEntry, DISPLAY_MARKER, DISPLAY_SEPARATOR};
pub use key::{fold_key, KeyPath, KEY_SEPARATOR};
pub use node::ConfigNode;
pub use policy::{decide, Verdict};
pub use reconcile::{reconcile, Classification, IgnorePaths, Reconciliation, ReconciledRow};
pub use state::{FailureState, FailureStates, ParseFailureStateError};
