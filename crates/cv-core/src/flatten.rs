//! Tree flattening.
//!
//! Turns a [`ConfigNode`] tree into an ordered list of [`FlatEntry`] using a
//! pre-order depth-first walk: each section entry is followed by all of its
//! descendants before the next sibling.

use serde::Serialize;

use crate::key::KeyPath;
use crate::node::ConfigNode;

/// Indentation marker, repeated once per ancestor level.
pub const DISPLAY_MARKER: &str = "--";

/// Glyph between the indentation and the segment.
pub const DISPLAY_SEPARATOR: &str = "> ";

/// Whether an entry is a section header or a value-carrying leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum EntryKind {
    Parent,
    Leaf(String),
}

/// One flattened key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatEntry {
    /// Fully-qualified key, e.g. `Logging:LogLevel:Default`.
    pub key: KeyPath,

    /// Segment with depth indentation, e.g. `----> Default`.
    pub display_key: String,

    /// Zero for top-level keys.
    pub depth: usize,

    pub kind: EntryKind,
}

impl FlatEntry {
    pub fn is_parent(&self) -> bool {
        matches!(self.kind, EntryKind::Parent)
    }

    /// Leaf value; `None` for section headers.
    pub fn value(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Leaf(value) => Some(value),
            EntryKind::Parent => None,
        }
    }
}

/// Flatten the children of `root` in document order.
pub fn flatten(root: &ConfigNode) -> Vec<FlatEntry> {
    let mut entries = Vec::new();
    for child in root.children() {
        flatten_into(child, None, 0, &mut entries);
    }
    entries
}

fn flatten_into(
    node: &ConfigNode,
    parent: Option<&KeyPath>,
    depth: usize,
    entries: &mut Vec<FlatEntry>,
) {
    let key = match parent {
        Some(parent) => parent.child(node.segment()),
        None => KeyPath::new(node.segment()),
    };
    let display_key = display_key(node.segment(), depth);

    if node.has_children() {
        entries.push(FlatEntry {
            key: key.clone(),
            display_key,
            depth,
            kind: EntryKind::Parent,
        });
        for child in node.children() {
            flatten_into(child, Some(&key), depth + 1, entries);
        }
    } else {
        entries.push(FlatEntry {
            key,
            display_key,
            depth,
            kind: EntryKind::Leaf(node.value().unwrap_or_default().to_string()),
        });
    }
}

fn display_key(segment: &str, depth: usize) -> String {
    if depth == 0 {
        segment.to_string()
    } else {
        format!("{}{}{}", DISPLAY_MARKER.repeat(depth), DISPLAY_SEPARATOR, segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample_tree() -> ConfigNode {
        ConfigNode::root()
            .with_child(
                ConfigNode::section("Logging").with_child(
                    ConfigNode::section("LogLevel")
                        .with_child(ConfigNode::leaf("Default", "Information"))
                        .with_child(ConfigNode::leaf("Microsoft", "Warning")),
                ),
            )
            .with_child(ConfigNode::leaf("AllowedHosts", "*"))
            .with_child(
                ConfigNode::section("Api")
                    .with_child(ConfigNode::leaf("Url", "https://example.test"))
                    .with_child(ConfigNode::leaf("Timeout", "")),
            )
    }

    fn keys(entries: &[FlatEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn test_preorder_traversal() {
        let entries = flatten(&sample_tree());
        assert_eq!(
            keys(&entries),
            vec![
                "Logging",
                "Logging:LogLevel",
                "Logging:LogLevel:Default",
                "Logging:LogLevel:Microsoft",
                "AllowedHosts",
                "Api",
                "Api:Url",
                "Api:Timeout",
            ]
        );
    }

    #[test]
    fn test_descendants_are_contiguous() {
        let entries = flatten(&sample_tree());
        for (i, entry) in entries.iter().enumerate() {
            if !entry.is_parent() {
                continue;
            }
            let prefix = format!("{}:", entry.key.as_str());
            let descendants = entries[i + 1..]
                .iter()
                .take_while(|e| e.key.as_str().starts_with(&prefix))
                .count();
            let total = entries
                .iter()
                .filter(|e| e.key.as_str().starts_with(&prefix))
                .count();
            assert!(descendants > 0, "{} has no descendants", entry.key);
            assert_eq!(descendants, total, "{} descendants are split", entry.key);
        }
    }

    #[test]
    fn test_keys_unique() {
        let entries = flatten(&sample_tree());
        let unique: HashSet<_> = entries.iter().map(|e| e.key.clone()).collect();
        assert_eq!(unique.len(), entries.len());
    }

    #[test]
    fn test_display_keys() {
        let entries = flatten(&sample_tree());
        let display: Vec<_> = entries.iter().map(|e| e.display_key.as_str()).collect();
        assert_eq!(
            display,
            vec![
                "Logging",
                "--> LogLevel",
                "----> Default",
                "----> Microsoft",
                "AllowedHosts",
                "Api",
                "--> Url",
                "--> Timeout",
            ]
        );
    }

    #[test]
    fn test_parents_carry_no_value() {
        let entries = flatten(&sample_tree());
        let logging = &entries[0];
        assert!(logging.is_parent());
        assert_eq!(logging.value(), None);
        assert_eq!(entries[4].value(), Some("*"));
    }

    #[test]
    fn test_empty_value_is_present() {
        let entries = flatten(&sample_tree());
        let timeout = entries
            .iter()
            .find(|e| e.key.as_str() == "Api:Timeout")
            .unwrap();
        assert_eq!(timeout.kind, EntryKind::Leaf(String::new()));
    }

    #[test]
    fn test_valueless_leaf_flattens_to_empty_string() {
        let root = ConfigNode::root().with_child(ConfigNode::empty("Feature"));
        let entries = flatten(&root);
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_parent());
        assert_eq!(entries[0].value(), Some(""));
    }

    #[test]
    fn test_empty_tree() {
        assert!(flatten(&ConfigNode::root()).is_empty());
    }

    #[test]
    fn test_depth_matches_segments() {
        for entry in flatten(&sample_tree()) {
            assert_eq!(entry.depth + 1, entry.key.segment_count());
        }
    }
}
