//! Run options with provenance
//!
//! Options are merged from up to three layers, later layers winning:
//! 1. Built-in defaults
//! 2. Options file (`--config <path>`, or the `.config-validate` dotfile in
//!    the discovery root)
//! 3. CLI flags

mod defaults;
mod merge;

pub use defaults::{BuiltinDefaults, DEFAULT_ENVIRONMENT, DEFAULT_STEM, DEFAULT_VALUE_WIDTH};
pub use merge::{apply_layer, merge_layers};

use std::fs;
use std::path::{Path, PathBuf};

use cv_core::{FailureState, FailureStates, IgnorePaths};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Dotfile looked up in the discovery root when no `--config` is given.
pub const DOTFILE_NAME: &str = ".config-validate";

/// Option names as they appear after key normalization.
const OPTION_KEYS: &[&str] = &[
    "environments",
    "failure_states",
    "ignore_paths",
    "show",
    "value_width",
    "stem",
];

/// Errors while reading or validating options
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("failed to read options file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in options file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid TOML in options file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("options file {0} must contain an object at the top level")]
    NotAnObject(PathBuf),

    #[error("invalid options: {0}")]
    Invalid(String),
}

/// Resolved options for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Environment names whose overlays are checked.
    pub environments: Vec<String>,

    /// States that make the run fail.
    pub failure_states: FailureStates,

    /// Keys never counted as failures.
    pub ignore_paths: Vec<String>,

    /// States whose rows are shown; empty shows all rows.
    pub show: FailureStates,

    /// Display truncation width for values.
    pub value_width: usize,

    /// Shared file-name prefix of baseline and overlays.
    pub stem: String,
}

impl Default for Options {
    fn default() -> Self {
        let defaults = BuiltinDefaults::default();
        Self {
            environments: defaults.environments,
            failure_states: defaults.failure_states.into_iter().collect(),
            ignore_paths: defaults.ignore_paths,
            show: defaults.show.into_iter().collect(),
            value_width: defaults.value_width,
            stem: defaults.stem,
        }
    }
}

impl Options {
    /// Ignore paths in the form the reconciler consumes.
    pub fn ignore_set(&self) -> IgnorePaths {
        self.ignore_paths.iter().collect()
    }

    fn validate(&self) -> Result<(), OptionsError> {
        if self.value_width == 0 {
            return Err(OptionsError::Invalid(
                "value_width must be at least 1".to_string(),
            ));
        }
        if self.stem.trim().is_empty() {
            return Err(OptionsError::Invalid("stem must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Option values given on the command line; `None` leaves the lower layers
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub environments: Option<Vec<String>>,
    pub failure_states: Option<Vec<FailureState>>,
    pub ignore_paths: Option<Vec<String>>,
    pub show: Option<Vec<FailureState>>,
    pub value_width: Option<usize>,
    pub stem: Option<String>,
}

impl CliOverrides {
    pub fn is_empty(&self) -> bool {
        self.to_value().as_object().map_or(true, Map::is_empty)
    }

    /// Convert to a JSON layer holding only the flags that were given
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(environments) = &self.environments {
            map.insert("environments".to_string(), Value::from(environments.clone()));
        }
        if let Some(states) = &self.failure_states {
            map.insert("failure_states".to_string(), states_value(states));
        }
        if let Some(paths) = &self.ignore_paths {
            map.insert("ignore_paths".to_string(), Value::from(paths.clone()));
        }
        if let Some(states) = &self.show {
            map.insert("show".to_string(), states_value(states));
        }
        if let Some(width) = self.value_width {
            map.insert("value_width".to_string(), Value::from(width));
        }
        if let Some(stem) = &self.stem {
            map.insert("stem".to_string(), Value::from(stem.clone()));
        }
        Value::Object(map)
    }
}

fn states_value(states: &[FailureState]) -> Value {
    Value::Array(
        states
            .iter()
            .map(|s| Value::String(s.as_str().to_string()))
            .collect(),
    )
}

/// Origin of an options layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OptionsOrigin {
    Builtin,
    Dotfile,
    File,
    Cli,
}

/// A contributing options layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsSource {
    pub origin: OptionsOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Merged options plus the layers they came from.
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveOptions {
    pub options: Options,

    /// Contributing layers in precedence order
    pub sources: Vec<OptionsSource>,
}

impl EffectiveOptions {
    /// Build options from the layers.
    ///
    /// An explicit `config_path` must exist and parse. Without one, the
    /// dotfile in `root` is used when present; if it cannot be read or does
    /// not hold valid options it is skipped with a warning.
    pub fn build(
        root: &Path,
        config_path: Option<&Path>,
        cli: &CliOverrides,
    ) -> Result<Self, OptionsError> {
        let defaults = BuiltinDefaults::default().to_value();
        let mut layers = vec![defaults.clone()];
        let mut sources = vec![OptionsSource {
            origin: OptionsOrigin::Builtin,
            path: None,
            digest: None,
        }];

        match config_path {
            Some(path) => {
                let (value, digest) = load_options_file(path)?;
                layers.push(value);
                sources.push(OptionsSource {
                    origin: OptionsOrigin::File,
                    path: Some(path.display().to_string()),
                    digest: Some(digest),
                });
            }
            None => {
                let dotfile = root.join(DOTFILE_NAME);
                if dotfile.is_file() {
                    tracing::info!(path = %dotfile.display(), "found dotfile");
                    match load_dotfile(&dotfile, &defaults) {
                        Ok((value, digest)) => {
                            layers.push(value);
                            sources.push(OptionsSource {
                                origin: OptionsOrigin::Dotfile,
                                path: Some(dotfile.display().to_string()),
                                digest: Some(digest),
                            });
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "could not use dotfile, falling back to defaults");
                        }
                    }
                }
            }
        }

        if !cli.is_empty() {
            layers.push(cli.to_value());
            sources.push(OptionsSource {
                origin: OptionsOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let options = parse_options(merge_layers(layers))?;
        options.validate()?;

        Ok(Self { options, sources })
    }
}

fn load_dotfile(path: &Path, defaults: &Value) -> Result<(Value, String), OptionsError> {
    let (value, digest) = load_options_file(path)?;
    // Reject the whole layer up front so a bad dotfile can be skipped.
    let options = parse_options(merge_layers([defaults.clone(), value.clone()]))?;
    options.validate()?;
    Ok((value, digest))
}

fn parse_options(merged: Value) -> Result<Options, OptionsError> {
    serde_json::from_value(merged).map_err(|e| OptionsError::Invalid(e.to_string()))
}

/// Load an options file, returning its normalized value and digest.
///
/// `.toml` files are parsed as TOML, everything else as JSON.
pub fn load_options_file(path: &Path) -> Result<(Value, String), OptionsError> {
    let bytes = fs::read(path).map_err(|source| OptionsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    let value = if is_toml {
        let contents = String::from_utf8_lossy(&bytes);
        let table: toml::Value = toml::from_str(&contents).map_err(|source| OptionsError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        toml_to_json(table)
    } else {
        serde_json::from_slice(&bytes).map_err(|source| OptionsError::Json {
            path: path.to_path_buf(),
            source,
        })?
    };

    match value {
        Value::Object(map) => Ok((Value::Object(normalize_keys(map)), digest)),
        _ => Err(OptionsError::NotAnObject(path.to_path_buf())),
    }
}

/// Map `IgnorePaths`, `ignorePaths`, `ignore-paths` and friends onto the
/// snake_case option names.
fn normalize_keys(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| {
            let squashed: String = key
                .chars()
                .filter(|c| *c != '_' && *c != '-')
                .flat_map(char::to_lowercase)
                .collect();
            match OPTION_KEYS.iter().find(|k| k.replace('_', "") == squashed) {
                Some(canonical) => (canonical.to_string(), value),
                None => {
                    tracing::debug!(key = %key, "ignoring unrecognized option");
                    (key, value)
                }
            }
        })
        .collect()
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
