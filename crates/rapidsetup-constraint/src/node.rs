//! Decoding of raw constraint configuration into a typed tree.
//!
//! Discriminators (`type`, `booleanOperation`, population operator) are decoded
//! once here; unknown tags fail at decode time instead of deep inside dispatch.

use serde_json::{Map, Value};

use rapidsetup_core::{AttributeValue, EvaluationError, Result};

use crate::attribute_value::AttributeValueDto;
use crate::util;

/// Nesting limit for decoded trees. Filters are authored by administrators and
/// are shallow in practice; the limit turns a runaway tree into an error.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Node type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintType {
    Group,
    Population,
    Attribute,
    Static,
}

impl ConstraintType {
    /// Parses a `type` value, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("group") {
            Some(ConstraintType::Group)
        } else if s.eq_ignore_ascii_case("population") {
            Some(ConstraintType::Population)
        } else if s.eq_ignore_ascii_case("attribute") {
            Some(ConstraintType::Attribute)
        } else if s.eq_ignore_ascii_case("static") {
            Some(ConstraintType::Static)
        } else {
            None
        }
    }
}

/// Boolean combinator of a group node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOperation {
    And,
    Or,
}

impl BooleanOperation {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("and") {
            Some(BooleanOperation::And)
        } else if s.eq_ignore_ascii_case("or") {
            Some(BooleanOperation::Or)
        } else {
            None
        }
    }
}

/// Membership test applied by a population node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PopulationOperator {
    #[default]
    MemberOf,
    NotMemberOf,
}

impl PopulationOperator {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memberof" | "in" => Some(PopulationOperator::MemberOf),
            "notmemberof" | "notin" => Some(PopulationOperator::NotMemberOf),
            _ => None,
        }
    }
}

/// Settings of a population node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PopulationConstraint {
    /// Name of the population filter; validated before evaluation.
    pub population: Option<String>,
    pub operator: PopulationOperator,
}

/// A decoded constraint tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintNode {
    /// A null or empty node. Evaluates to false.
    Empty,
    Group {
        operation: BooleanOperation,
        items: Vec<ConstraintNode>,
    },
    Population(PopulationConstraint),
    Attribute(AttributeValueDto),
    Static(bool),
}

impl ConstraintNode {
    /// Decodes a raw configuration node using [`DEFAULT_MAX_DEPTH`].
    pub fn parse(config: &Value) -> Result<Self> {
        Self::parse_with_limit(config, DEFAULT_MAX_DEPTH)
    }

    /// Decodes a raw configuration node, failing beyond `max_depth` levels.
    pub fn parse_with_limit(config: &Value, max_depth: usize) -> Result<Self> {
        parse_node(config, 0, max_depth)
    }

    /// Short label for diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            ConstraintNode::Empty => "empty",
            ConstraintNode::Group {
                operation: BooleanOperation::And,
                ..
            } => "group(AND)",
            ConstraintNode::Group {
                operation: BooleanOperation::Or,
                ..
            } => "group(OR)",
            ConstraintNode::Population(_) => "Population",
            ConstraintNode::Attribute(_) => "Attribute",
            ConstraintNode::Static(_) => "Static",
        }
    }
}

/// Returns true when a raw node carries no configuration.
pub fn is_blank(config: &Value) -> bool {
    match config {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn parse_node(config: &Value, depth: usize, max_depth: usize) -> Result<ConstraintNode> {
    if depth > max_depth {
        return Err(EvaluationError::invalid(format!(
            "Constraint tree exceeds maximum depth of {}",
            max_depth
        )));
    }
    if is_blank(config) {
        return Ok(ConstraintNode::Empty);
    }
    let Some(node) = config.as_object() else {
        return Err(EvaluationError::invalid(format!(
            "Constraint node must be a map, found {}",
            config
        )));
    };

    let raw_type = util::non_blank(node, "type")
        .ok_or_else(|| EvaluationError::invalid("Missing constraint type"))?;
    let constraint_type = ConstraintType::parse(raw_type).ok_or_else(|| {
        EvaluationError::invalid(format!("Unknown constraint type '{}'", raw_type))
    })?;

    match constraint_type {
        ConstraintType::Group => parse_group(node, depth, max_depth),
        ConstraintType::Population => parse_population(node),
        ConstraintType::Attribute => Ok(ConstraintNode::Attribute(AttributeValueDto::from_node(
            node,
        ))),
        ConstraintType::Static => Ok(ConstraintNode::Static(
            util::attribute(node, "value").map(truthy_json).unwrap_or(false),
        )),
    }
}

fn parse_group(node: &Map<String, Value>, depth: usize, max_depth: usize) -> Result<ConstraintNode> {
    let raw_operation = util::non_blank(node, "booleanOperation").unwrap_or_default();
    let operation = BooleanOperation::parse(raw_operation).ok_or_else(|| {
        EvaluationError::invalid(format!(
            "Unknown boolean operation '{}' in group",
            raw_operation
        ))
    })?;

    // Missing or empty items are rejected by the combinator's validation.
    let items = match node.get("items") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(raw_items)) => raw_items
            .iter()
            .map(|item| parse_node(item, depth + 1, max_depth))
            .collect::<Result<Vec<_>>>()?,
        Some(other) => {
            return Err(EvaluationError::invalid(format!(
                "Group items must be a list, found {}",
                other
            )))
        }
    };

    Ok(ConstraintNode::Group { operation, items })
}

fn parse_population(node: &Map<String, Value>) -> Result<ConstraintNode> {
    let population = util::attribute_str(node, "population")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let operator = match util::attribute_str(node, "operator") {
        None => PopulationOperator::default(),
        Some(raw) => PopulationOperator::parse(raw).ok_or_else(|| {
            EvaluationError::invalid(format!("Unknown population operator '{}'", raw))
        })?,
    };

    Ok(ConstraintNode::Population(PopulationConstraint {
        population,
        operator,
    }))
}

fn truthy_json(value: &Value) -> bool {
    AttributeValue::from(value).is_truthy()
}
