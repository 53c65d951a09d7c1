//! Failure states and sets of them.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::key::fold_key;

/// Why a key is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureState {
    /// Present in the baseline, absent from the overlay.
    Missing,
    /// Present in the overlay, absent from the baseline.
    Unknown,
}

impl FailureState {
    pub const ALL: [FailureState; 2] = [FailureState::Missing, FailureState::Unknown];

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureState::Missing => "Missing",
            FailureState::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FailureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown failure state '{0}' (expected Missing or Unknown)")]
pub struct ParseFailureStateError(pub String);

impl FromStr for FailureState {
    type Err = ParseFailureStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = fold_key(s.trim());
        FailureState::ALL
            .into_iter()
            .find(|state| fold_key(state.as_str()) == folded)
            .ok_or_else(|| ParseFailureStateError(s.to_string()))
    }
}

impl Serialize for FailureState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FailureState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// An ordered set of failure states.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailureStates(BTreeSet<FailureState>);

impl FailureStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, state: FailureState) -> bool {
        self.0.insert(state)
    }

    pub fn contains(&self, state: FailureState) -> bool {
        self.0.contains(&state)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = FailureState> + '_ {
        self.0.iter().copied()
    }

    /// Whether any state is in both sets.
    pub fn intersects(&self, other: &FailureStates) -> bool {
        self.iter().any(|state| other.contains(state))
    }

    /// Add every state of `other`.
    pub fn merge(&mut self, other: &FailureStates) {
        self.0.extend(other.iter());
    }
}

impl FromIterator<FailureState> for FailureStates {
    fn from_iter<I: IntoIterator<Item = FailureState>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[FailureState; N]> for FailureStates {
    fn from(states: [FailureState; N]) -> Self {
        states.into_iter().collect()
    }
}

impl fmt::Display for FailureStates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<_> = self.iter().map(|s| s.as_str()).collect();
        f.write_str(&names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("missing".parse::<FailureState>().unwrap(), FailureState::Missing);
        assert_eq!("UNKNOWN".parse::<FailureState>().unwrap(), FailureState::Unknown);
        assert_eq!(" Missing ".parse::<FailureState>().unwrap(), FailureState::Missing);
    }

    #[test]
    fn test_parse_rejects_other_values() {
        let err = "Ignored".parse::<FailureState>().unwrap_err();
        assert_eq!(err, ParseFailureStateError("Ignored".to_string()));
    }

    #[test]
    fn test_serde_uses_names() {
        let states = FailureStates::from([FailureState::Unknown, FailureState::Missing]);
        let json = serde_json::to_string(&states).unwrap();
        assert_eq!(json, r#"["Missing","Unknown"]"#);

        let parsed: FailureStates = serde_json::from_str(r#"["unknown"]"#).unwrap();
        assert!(parsed.contains(FailureState::Unknown));
        assert!(!parsed.contains(FailureState::Missing));
    }

    #[test]
    fn test_intersects_and_merge() {
        let mut observed = FailureStates::from([FailureState::Unknown]);
        let configured = FailureStates::from([FailureState::Missing]);
        assert!(!observed.intersects(&configured));

        observed.merge(&FailureStates::from([FailureState::Missing]));
        assert!(observed.intersects(&configured));
        assert_eq!(observed.len(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(FailureStates::new().to_string(), "none");
        assert_eq!(
            FailureStates::from([FailureState::Unknown, FailureState::Missing]).to_string(),
            "Missing, Unknown"
        );
    }
}
