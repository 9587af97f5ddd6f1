//! Builders for raw trigger-filter trees.
//!
//! # Example
//!
//! ```
//! use rapidsetup_test::filter::{and, attribute, static_leaf, trigger_filter};
//!
//! let filter = trigger_filter(and(vec![
//!     attribute("department", "Equals", "String", "Finance"),
//!     static_leaf(true),
//! ]));
//! assert_eq!(filter["group"]["items"][1]["type"], "Static");
//! ```

use serde_json::{json, Value};

/// Wraps a root node the way business-process configuration stores it.
pub fn trigger_filter(group: Value) -> Value {
    json!({ "group": group })
}

/// An AND group.
pub fn and(items: Vec<Value>) -> Value {
    group("AND", items)
}

/// An OR group.
pub fn or(items: Vec<Value>) -> Value {
    group("OR", items)
}

/// A group with an arbitrary boolean operation string.
pub fn group(operation: &str, items: Vec<Value>) -> Value {
    json!({
        "type": "group",
        "booleanOperation": operation,
        "items": items,
    })
}

/// A static leaf.
pub fn static_leaf(value: bool) -> Value {
    json!({ "type": "Static", "attributes": { "value": value } })
}

/// A population-membership leaf.
pub fn population(name: &str) -> Value {
    json!({ "type": "Population", "attributes": { "population": name } })
}

/// An attribute comparison leaf.
pub fn attribute(property: &str, operator: &str, data_type: &str, value: impl Into<Value>) -> Value {
    attribute_with(json!({
        "property": property,
        "operator": operator,
        "dataType": data_type,
        "value": value.into(),
    }))
}

/// A date comparison leaf.
pub fn date_attribute(property: &str, operator: &str, date_format: &str, value: &str) -> Value {
    attribute_with(json!({
        "property": property,
        "operator": operator,
        "dataType": "Date",
        "dateFormat": date_format,
        "value": value,
    }))
}

/// An attribute leaf from a raw `attributeValue` map.
pub fn attribute_with(attribute_value: Value) -> Value {
    json!({ "type": "Attribute", "attributes": { "attributeValue": attribute_value } })
}
