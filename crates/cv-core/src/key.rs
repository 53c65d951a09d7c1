//! Case-insensitive key paths.
//!
//! Every case-insensitive comparison in the tool (key lookups, ignore paths,
//! environment names) goes through [`fold_key`] so that they all agree.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

/// Separator between segments of a fully-qualified key.
pub const KEY_SEPARATOR: char = ':';

/// Fold a key for ordinal case-insensitive comparison.
///
/// Each char maps to its simple uppercase form. Chars whose uppercase form
/// expands to several chars (`ß`, `ﬁ`) are kept as they are, so folding
/// never changes the char count and distinct keys never collapse.
pub fn fold_key(key: &str) -> String {
    key.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => c,
    }
}

/// A fully-qualified key such as `Logging:LogLevel:Default`.
///
/// Equality and hashing ignore case; the original spelling is kept for
/// display.
#[derive(Debug, Clone)]
pub struct KeyPath {
    raw: String,
    folded: String,
}

impl KeyPath {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let folded = fold_key(&raw);
        Self { raw, folded }
    }

    /// Append a child segment.
    pub fn child(&self, segment: &str) -> Self {
        Self::new(format!("{}{}{}", self.raw, KEY_SEPARATOR, segment))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of segments in the path.
    pub fn segment_count(&self) -> usize {
        self.raw.split(KEY_SEPARATOR).count()
    }
}

impl PartialEq for KeyPath {
    fn eq(&self, other: &Self) -> bool {
        self.folded == other.folded
    }
}

impl Eq for KeyPath {}

impl Hash for KeyPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded.hash(state);
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for KeyPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl Serialize for KeyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
