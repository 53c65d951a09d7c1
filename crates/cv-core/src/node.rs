//! Configuration tree input.

use crate::key::fold_key;

/// A node of a hierarchical configuration document.
///
/// Leaves carry an optional value; sections carry ordered children. Sibling
/// segments are unique under case-insensitive comparison: adding a child
/// whose segment already exists merges into the existing slot (see
/// [`ConfigNode::push_child`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigNode {
    segment: String,
    value: Option<String>,
    children: Vec<ConfigNode>,
}

impl ConfigNode {
    /// The unnamed document root. Its children are the top-level keys.
    pub fn root() -> Self {
        Self::section("")
    }

    /// A section without children yet.
    pub fn section(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            value: None,
            children: Vec::new(),
        }
    }

    /// A leaf carrying `value`.
    pub fn leaf(segment: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    /// A leaf with no value at all (e.g. a JSON `null`).
    pub fn empty(segment: impl Into<String>) -> Self {
        Self::section(segment)
    }

    /// Builder form of [`ConfigNode::push_child`].
    pub fn with_child(mut self, child: ConfigNode) -> Self {
        self.push_child(child);
        self
    }

    /// Add a child, keeping sibling segments unique.
    ///
    /// A duplicate segment keeps the position of the first occurrence. Two
    /// sections merge their children recursively; in every other case the
    /// later node replaces the earlier one.
    pub fn push_child(&mut self, child: ConfigNode) {
        let folded = fold_key(&child.segment);
        match self
            .children
            .iter_mut()
            .find(|existing| fold_key(&existing.segment) == folded)
        {
            Some(existing) if existing.has_children() && child.has_children() => {
                for grandchild in child.children {
                    existing.push_child(grandchild);
                }
            }
            Some(existing) => *existing = child,
            None => self.children.push(child),
        }
    }

    pub fn segment(&self) -> &str {
        &self.segment
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn children(&self) -> &[ConfigNode] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
