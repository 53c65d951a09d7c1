//! Settings document loading
//!
//! Reads a JSON settings file into a [`ConfigNode`] tree the way
//! hierarchical configuration providers see it: objects are sections,
//! arrays are sections keyed by element index, and scalars are leaves
//! holding their text.

use std::fs;
use std::path::{Path, PathBuf};

use cv_core::ConfigNode;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Errors while loading a settings document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} must contain a JSON object at the top level")]
    NotAnObject(PathBuf),
}

/// Where a document came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSource {
    pub path: String,

    /// SHA-256 digest of raw file bytes
    pub digest: String,
}

/// A loaded settings document.
#[derive(Debug, Clone)]
pub struct Document {
    pub source: DocumentSource,
    pub root: ConfigNode,
}

/// Load and convert a JSON settings file.
pub fn load_file(path: &Path) -> Result<Document, DocumentError> {
    let bytes = fs::read(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let value: Value = serde_json::from_slice(strip_bom(&bytes)).map_err(|source| {
        DocumentError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let root = to_tree(value).ok_or_else(|| DocumentError::NotAnObject(path.to_path_buf()))?;

    tracing::debug!(path = %path.display(), %digest, "loaded settings document");

    Ok(Document {
        source: DocumentSource {
            path: path.display().to_string(),
            digest,
        },
        root,
    })
}

/// Parse JSON text into a tree. Returns `None` unless the top level is an
/// object.
pub fn parse_str(json: &str) -> Result<Option<ConfigNode>, serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;
    Ok(to_tree(value))
}

/// Convert a JSON value into a tree rooted at an unnamed section.
pub fn to_tree(value: Value) -> Option<ConfigNode> {
    match value {
        Value::Object(map) => {
            let mut root = ConfigNode::root();
            for (key, child) in map {
                root.push_child(to_node(key, child));
            }
            Some(root)
        }
        _ => None,
    }
}

fn to_node(segment: String, value: Value) -> ConfigNode {
    match value {
        Value::Object(map) => {
            let mut node = ConfigNode::section(segment);
            for (key, child) in map {
                node.push_child(to_node(key, child));
            }
            node
        }
        Value::Array(items) => {
            let mut node = ConfigNode::section(segment);
            for (index, item) in items.into_iter().enumerate() {
                node.push_child(to_node(index.to_string(), item));
            }
            node
        }
        Value::String(s) => ConfigNode::leaf(segment, s),
        Value::Null => ConfigNode::empty(segment),
        scalar => ConfigNode::leaf(segment, scalar.to_string()),
    }
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}
