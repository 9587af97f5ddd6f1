//! Navigation helpers for constraint configuration nodes.
//!
//! Every node keeps its type-specific settings under an `attributes` sub-map.

use serde_json::{Map, Value};

/// Key of the per-node settings map.
pub const ATTRIBUTES: &str = "attributes";

/// Returns the `attributes` sub-map of a node.
pub fn attributes(node: &Map<String, Value>) -> Option<&Map<String, Value>> {
    node.get(ATTRIBUTES).and_then(Value::as_object)
}

/// Returns one entry of the node's `attributes` sub-map.
pub fn attribute<'a>(node: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    attributes(node).and_then(|attrs| attrs.get(key))
}

/// Returns one string entry of the node's `attributes` sub-map.
pub fn attribute_str<'a>(node: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    attribute(node, key).and_then(Value::as_str)
}

/// Reads a string field, treating blank strings as absent.
pub fn non_blank<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
