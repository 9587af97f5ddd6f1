//! Typed attribute-comparison descriptors parsed from `Attribute` nodes.

use std::fmt;

use serde_json::{Map, Value};
use tracing::warn;

use crate::util;

/// Key of the comparison settings inside a node's `attributes` map.
pub const ATTRIBUTE_VALUE: &str = "attributeValue";

/// Comparison operator of an attribute constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    NotEquals,
    /// Previous and new values differ.
    Changed,
    /// Previous and new values are the same.
    NotChanged,
    /// Previous value matched the literal and the value changed.
    ChangedFrom,
    /// New value matches the literal and the value changed.
    ChangedTo,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl Operator {
    /// Parses an operator name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let op = match s.trim().to_ascii_lowercase().as_str() {
            "equals" | "eq" => Operator::Equals,
            "notequals" | "ne" => Operator::NotEquals,
            "changed" => Operator::Changed,
            "notchanged" => Operator::NotChanged,
            "changedfrom" => Operator::ChangedFrom,
            "changedto" => Operator::ChangedTo,
            "contains" => Operator::Contains,
            "notcontains" => Operator::NotContains,
            "startswith" => Operator::StartsWith,
            "endswith" => Operator::EndsWith,
            "greaterthan" | "gt" | "after" => Operator::GreaterThan,
            "greaterthanorequal" | "ge" => Operator::GreaterThanOrEqual,
            "lessthan" | "lt" | "before" => Operator::LessThan,
            "lessthanorequal" | "le" => Operator::LessThanOrEqual,
            _ => return None,
        };
        Some(op)
    }

    /// Returns true for operators that only detect a difference between
    /// previous and new values.
    pub fn is_change_detection(&self) -> bool {
        matches!(self, Operator::Changed | Operator::NotChanged)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Declared data type of an attribute constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Date,
    Boolean,
    String,
    Number,
    Identity,
}

impl DataType {
    /// Parses a data type name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let data_type = match s.trim().to_ascii_lowercase().as_str() {
            "date" => DataType::Date,
            "boolean" => DataType::Boolean,
            "string" => DataType::String,
            "number" => DataType::Number,
            "identity" => DataType::Identity,
            _ => return None,
        };
        Some(data_type)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A typed attribute comparison.
///
/// Parsing is tolerant: unknown operator or data type names are logged and
/// leave the field unset, which [`has_operator`](Self::has_operator) and
/// [`has_data_type`](Self::has_data_type) report. Turning an unset field into a
/// failure is the evaluator registry's job.
///
/// # Example
///
/// ```
/// use rapidsetup_constraint::{AttributeValueDto, DataType, Operator};
/// use serde_json::json;
///
/// let config = json!({
///     "property": "costCenter",
///     "operator": "Equals",
///     "dataType": "String",
///     "coercedType": "Number",
///     "value": "1200"
/// });
/// let dto = AttributeValueDto::from_config(config.as_object().unwrap());
///
/// assert_eq!(dto.operator(), Some(Operator::Equals));
/// assert_eq!(dto.data_type(), Some(DataType::Number));
/// assert!(dto.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeValueDto {
    property: String,
    operator: Option<Operator>,
    data_type: Option<DataType>,
    coerced_type: Option<DataType>,
    date_format: Option<String>,
    value: Value,
}

impl AttributeValueDto {
    /// Parses the `attributeValue` map of an `Attribute` node.
    pub fn from_config(config: &Map<String, Value>) -> Self {
        let property = config
            .get("property")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string();

        let operator = util::non_blank(config, "operator").and_then(|raw| {
            let op = Operator::parse(raw);
            if op.is_none() {
                warn!(property = %property, operator = raw, "Unrecognized operator");
            }
            op
        });

        let data_type = parse_data_type(config, "dataType", &property);
        let coerced_type = parse_data_type(config, "coercedType", &property);
        let date_format = util::non_blank(config, "dateFormat").map(str::to_string);
        let value = config.get("value").cloned().unwrap_or(Value::Null);

        Self {
            property,
            operator,
            data_type,
            coerced_type,
            date_format,
            value,
        }
    }

    /// Parses the descriptor of an `Attribute` node via `attributes.attributeValue`.
    pub fn from_node(node: &Map<String, Value>) -> Self {
        util::attribute(node, ATTRIBUTE_VALUE)
            .and_then(Value::as_object)
            .map(Self::from_config)
            .unwrap_or_default()
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    pub fn has_operator(&self) -> bool {
        self.operator.is_some()
    }

    /// Returns the effective data type: the coerced type when present,
    /// the declared type otherwise.
    pub fn data_type(&self) -> Option<DataType> {
        self.coerced_type.or(self.data_type)
    }

    pub fn has_data_type(&self) -> bool {
        self.data_type.is_some()
    }

    pub fn coerced_type(&self) -> Option<DataType> {
        self.coerced_type
    }

    pub fn has_coerced_type(&self) -> bool {
        self.coerced_type.is_some()
    }

    pub fn date_format(&self) -> Option<&str> {
        self.date_format.as_deref()
    }

    pub fn has_date_format(&self) -> bool {
        self.date_format.is_some()
    }

    /// Literal operand of the comparison.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// A descriptor is usable once it names a property and an operator.
    pub fn is_valid(&self) -> bool {
        self.operator.is_some() && !self.property.is_empty()
    }
}

fn parse_data_type(config: &Map<String, Value>, key: &str, property: &str) -> Option<DataType> {
    let raw = util::non_blank(config, key)?;
    let data_type = DataType::parse(raw);
    if data_type.is_none() {
        warn!(property, field = key, value = raw, "Unrecognized data type");
    }
    data_type
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dto(config: Value) -> AttributeValueDto {
        AttributeValueDto::from_config(config.as_object().unwrap())
    }

    #[test]
    fn test_fields_round_trip() {
        let dto = dto(json!({
            "property": "startDate",
            "operator": "GreaterThan",
            "dataType": "Date",
            "dateFormat": "yyyy-MM-dd",
            "value": "2024-01-01"
        }));

        assert_eq!(dto.property(), "startDate");
        assert_eq!(dto.operator(), Some(Operator::GreaterThan));
        assert_eq!(dto.data_type(), Some(DataType::Date));
        assert_eq!(dto.date_format(), Some("yyyy-MM-dd"));
        assert_eq!(dto.value(), &json!("2024-01-01"));
        assert!(dto.has_date_format());
        assert!(!dto.has_coerced_type());
    }

    #[test]
    fn test_absent_optionals() {
        let dto = dto(json!({"property": "title", "operator": "Changed"}));
        assert!(!dto.has_data_type());
        assert!(!dto.has_coerced_type());
        assert!(!dto.has_date_format());
        assert_eq!(dto.value(), &Value::Null);
        assert!(dto.is_valid());
    }

    #[test]
    fn test_invalid_coerced_type_falls_back_to_declared() {
        let dto = dto(json!({
            "property": "level",
            "operator": "Equals",
            "dataType": "Number",
            "coercedType": "Complex"
        }));
        assert!(!dto.has_coerced_type());
        assert_eq!(dto.data_type(), Some(DataType::Number));
    }

    #[test]
    fn test_unknown_operator_is_unset() {
        let dto = dto(json!({"property": "title", "operator": "Like", "dataType": "String"}));
        assert!(!dto.has_operator());
        assert!(!dto.is_valid());
    }

    #[test]
    fn test_blank_property_is_invalid() {
        let dto = dto(json!({"property": "  ", "operator": "Equals"}));
        assert!(!dto.is_valid());
    }

    #[test]
    fn test_operator_aliases() {
        assert_eq!(Operator::parse("notEquals"), Some(Operator::NotEquals));
        assert_eq!(Operator::parse("ge"), Some(Operator::GreaterThanOrEqual));
        assert_eq!(Operator::parse("Before"), Some(Operator::LessThan));
        assert_eq!(Operator::parse("between"), None);
        assert!(Operator::Changed.is_change_detection());
        assert!(!Operator::ChangedTo.is_change_detection());
    }

    #[test]
    fn test_from_node_without_descriptor() {
        let node = json!({"type": "Attribute", "attributes": {}});
        let dto = AttributeValueDto::from_node(node.as_object().unwrap());
        assert_eq!(dto, AttributeValueDto::default());
        assert!(!dto.is_valid());
    }
}
