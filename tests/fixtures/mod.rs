//! Test fixtures for settings directories
//!
//! This module provides:
//! - The checked-in `webapp` settings directory
//! - A temporary settings directory builder

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Path to the checked-in web application settings
pub fn webapp_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/webapp")
}

/// Baseline used by the drift scenarios
pub const BASELINE: &str = r#"{"A": {"B": "1", "C": "2"}}"#;

/// Staging overlay: `A:C` is missing, `A:D` is unknown
pub const STAGING: &str = r#"{"A": {"B": "1", "D": "3"}}"#;

/// A temporary directory of settings files
pub struct SettingsDir {
    dir: TempDir,
}

impl SettingsDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Directory with the drift scenario baseline and Staging overlay
    pub fn drift() -> Self {
        Self::new()
            .file("appsettings.json", BASELINE)
            .file("appsettings.Staging.json", STAGING)
    }

    pub fn file(self, name: &str, contents: &str) -> Self {
        fs::write(self.dir.path().join(name), contents).expect("write fixture file");
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
