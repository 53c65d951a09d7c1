//! Baseline and overlay discovery
//!
//! Lists `<stem>*.json` files directly inside an explicit root directory.
//! `<stem>.json` is the baseline; `<stem>.<Environment>.json` files are the
//! overlays, named after the text between the dots.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use cv_core::fold_key;
use globset::{GlobBuilder, GlobMatcher};
use regex_lite::Regex;
use serde::Serialize;
use walkdir::WalkDir;

/// Errors while locating settings files
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("root directory {0} does not exist")]
    RootNotFound(PathBuf),

    #[error("could not find `{stem}.json` in {root}; run in the directory where this file resides or pass --root")]
    BaselineNotFound { root: PathBuf, stem: String },

    #[error("could not find settings files for environments: {}", missing.join(", "))]
    EnvironmentsNotFound {
        requested: Vec<String>,
        missing: Vec<String>,
    },

    #[error("invalid file stem '{0}'")]
    InvalidStem(String),

    #[error("failed to list directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("glob pattern error: {0}")]
    Glob(#[from] globset::Error),
}

/// An environment overlay file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayFile {
    /// Environment label, or the file path when the name does not follow
    /// `<stem>.<Environment>.json`.
    pub name: String,
    pub path: PathBuf,
}

/// Files found under the root.
#[derive(Debug, Clone)]
pub struct Discovery {
    pub baseline: PathBuf,

    /// Every overlay in file-name order.
    pub overlays: Vec<OverlayFile>,
}

impl Discovery {
    /// Overlays for the requested environments, compared case-insensitively.
    ///
    /// Fails unless every requested environment has an overlay.
    pub fn select(&self, environments: &[String]) -> Result<Vec<OverlayFile>, DiscoveryError> {
        let mut requested: Vec<String> = Vec::new();
        let mut folded: HashSet<String> = HashSet::new();
        for env in environments {
            if folded.insert(fold_key(env)) {
                requested.push(env.clone());
            }
        }

        let selected: Vec<OverlayFile> = self
            .overlays
            .iter()
            .filter(|overlay| folded.contains(&fold_key(&overlay.name)))
            .cloned()
            .collect();

        let found: HashSet<String> = selected.iter().map(|o| fold_key(&o.name)).collect();
        let missing: Vec<String> = requested
            .iter()
            .filter(|env| !found.contains(&fold_key(env)))
            .cloned()
            .collect();

        if !missing.is_empty() {
            return Err(DiscoveryError::EnvironmentsNotFound { requested, missing });
        }

        Ok(selected)
    }

    pub fn environment_names(&self) -> Vec<&str> {
        self.overlays.iter().map(|o| o.name.as_str()).collect()
    }
}

/// Locate the baseline and overlays for `stem` directly inside `root`.
pub fn discover(root: &Path, stem: &str) -> Result<Discovery, DiscoveryError> {
    if !root.is_dir() {
        return Err(DiscoveryError::RootNotFound(root.to_path_buf()));
    }
    if stem.is_empty() || stem.contains(['/', '\\']) {
        return Err(DiscoveryError::InvalidStem(stem.to_string()));
    }

    let matcher = settings_matcher(stem)?;
    let baseline_name = fold_key(&format!("{}.json", stem));

    let mut baseline = None;
    let mut overlays = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        let folded_name = fold_key(&file_name);
        if !matcher.is_match(&folded_name) {
            continue;
        }

        let path = entry.path().to_path_buf();
        if folded_name == baseline_name {
            tracing::debug!(path = %path.display(), "found baseline");
            baseline = Some(path);
            continue;
        }

        let name = environment_name(stem, &file_name)
            .unwrap_or_else(|| path.display().to_string());
        tracing::debug!(environment = %name, path = %path.display(), "found overlay");
        overlays.push(OverlayFile { name, path });
    }

    let baseline = baseline.ok_or_else(|| DiscoveryError::BaselineNotFound {
        root: root.to_path_buf(),
        stem: stem.to_string(),
    })?;

    Ok(Discovery { baseline, overlays })
}

/// Matches folded file names, so case is handled by [`fold_key`] alone.
fn settings_matcher(stem: &str) -> Result<GlobMatcher, globset::Error> {
    let pattern = format!("{}*{}", globset_escape(&fold_key(stem)), fold_key(".json"));
    Ok(GlobBuilder::new(&pattern)
        .literal_separator(true)
        .build()?
        .compile_matcher())
}

fn globset_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '{' | '}') {
            escaped.push('[');
            escaped.push(c);
            escaped.push(']');
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Extract `Staging` from `appsettings.Staging.json`.
///
/// The pattern runs on the folded file name. Folding keeps the char count,
/// so the captured char range is cut from the original spelling.
fn environment_name(stem: &str, file_name: &str) -> Option<String> {
    let folded = fold_key(file_name);
    let pattern = format!(
        r"^{}\.(?P<environment>.*?){}$",
        regex_lite::escape(&fold_key(stem)),
        regex_lite::escape(&fold_key(".json"))
    );
    // The stem is escaped, so the pattern is always valid.
    let re = Regex::new(&pattern).ok()?;
    let capture = re.captures(&folded)?.name("environment")?;
    let start = folded[..capture.start()].chars().count();
    let len = capture.as_str().chars().count();
    let name: String = file_name.chars().skip(start).take(len).collect();
    (!name.is_empty()).then_some(name)
}
