//! Options layer merging
//!
//! Options are flat, so a layer is a map from option name to value. Each
//! option a layer names replaces the lower layers' value whole; lists are
//! never concatenated. A `null` value leaves the lower layers in place.

use serde_json::{Map, Value};

/// Apply one layer on top of the options merged so far.
///
/// Layers that are not objects contribute nothing; loaders reject them
/// before they get here.
pub fn apply_layer(mut merged: Map<String, Value>, layer: Value) -> Map<String, Value> {
    if let Value::Object(options) = layer {
        for (name, value) in options {
            if !value.is_null() {
                merged.insert(name, value);
            }
        }
    }
    merged
}

/// Merge layers in order (first is base, last has highest precedence)
pub fn merge_layers(layers: impl IntoIterator<Item = Value>) -> Value {
    Value::Object(layers.into_iter().fold(Map::new(), apply_layer))
}
