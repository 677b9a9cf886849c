//! Expression tree as shipped by the backend
//!
//! Nodes are JSON objects tagged by `"Type"` with PascalCase keys:
//!
//! ```json
//! { "Type": "BinaryExpression", "Operator": ">",
//!   "Arguments": [ { "Type": "Identifier", "Name": "MRP" },
//!                  { "Type": "Literal", "Value": 0 } ] }
//! ```
//!
//! Unknown node types and unknown operators still parse; they fail when
//! evaluated, so one bad rule cannot keep a whole schema from loading.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::error::ExpressionError;

/// A node of a rule expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type", rename_all_fields = "PascalCase")]
pub enum ExpressionNode {
    /// Embedded constant
    Literal {
        #[serde(default)]
        value: Value,
    },

    /// Reference to a field of the record under validation
    Identifier { name: String },

    /// Reference to a runtime-supplied value (`NOW`, `TODAY`, `CURRENT_USER`)
    SystemIdentifier {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        property: Option<PropertyRef>,
    },

    /// `left <op> right`
    BinaryExpression {
        operator: BinaryOperator,
        #[serde(default)]
        arguments: Vec<ExpressionNode>,
    },

    /// `AND` / `OR` over any number of operands, `!` over exactly one
    LogicalExpression {
        operator: LogicalOperator,
        #[serde(default)]
        arguments: Vec<ExpressionNode>,
    },

    /// Named function call
    CallExpression {
        #[serde(deserialize_with = "callee_name")]
        callee: String,
        #[serde(default)]
        arguments: Vec<ExpressionNode>,
    },

    /// Property access on the value of the single argument
    MemberExpression {
        #[serde(default)]
        arguments: Vec<ExpressionNode>,
        property: PropertyRef,
    },

    /// Wrapper that evaluates to its single argument
    AssignmentExpression {
        #[serde(default)]
        arguments: Vec<ExpressionNode>,
    },

    /// Any node type this runtime does not know
    #[serde(other)]
    Unsupported,
}

/// `{"Name": "..."}` property reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRef {
    #[serde(rename = "Name")]
    pub name: String,
}

impl PropertyRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

fn callee_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Callee {
        Bare(String),
        Named {
            #[serde(rename = "Name")]
            name: String,
        },
    }

    Ok(match Callee::deserialize(deserializer)? {
        Callee::Bare(name) | Callee::Named { name } => name,
    })
}

impl ExpressionNode {
    /// Parse a tree from a JSON value
    pub fn from_value(value: Value) -> Result<Self, ExpressionError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier { name: name.into() }
    }

    pub fn system(name: impl Into<String>) -> Self {
        Self::SystemIdentifier {
            name: name.into(),
            property: None,
        }
    }

    pub fn system_property(name: impl Into<String>, property: impl Into<String>) -> Self {
        Self::SystemIdentifier {
            name: name.into(),
            property: Some(PropertyRef::new(property)),
        }
    }

    pub fn binary(operator: BinaryOperator, left: Self, right: Self) -> Self {
        Self::BinaryExpression {
            operator,
            arguments: vec![left, right],
        }
    }

    pub fn logical(operator: LogicalOperator, operands: Vec<Self>) -> Self {
        Self::LogicalExpression {
            operator,
            arguments: operands,
        }
    }

    pub fn not(operand: Self) -> Self {
        Self::logical(LogicalOperator::Not, vec![operand])
    }

    pub fn call(callee: impl Into<String>, arguments: Vec<Self>) -> Self {
        Self::CallExpression {
            callee: callee.into(),
            arguments,
        }
    }

    pub fn member(base: Self, property: impl Into<String>) -> Self {
        Self::MemberExpression {
            arguments: vec![base],
            property: PropertyRef::new(property),
        }
    }

    pub fn assignment(child: Self) -> Self {
        Self::AssignmentExpression {
            arguments: vec![child],
        }
    }

    /// The wire `Type` tag of this node
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Literal { .. } => "Literal",
            Self::Identifier { .. } => "Identifier",
            Self::SystemIdentifier { .. } => "SystemIdentifier",
            Self::BinaryExpression { .. } => "BinaryExpression",
            Self::LogicalExpression { .. } => "LogicalExpression",
            Self::CallExpression { .. } => "CallExpression",
            Self::MemberExpression { .. } => "MemberExpression",
            Self::AssignmentExpression { .. } => "AssignmentExpression",
            Self::Unsupported => "Unsupported",
        }
    }
}

impl FromStr for ExpressionNode {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Comparison and arithmetic operators
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BinaryOperator {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    /// Operator text not understood by this runtime
    Other(String),
}

impl BinaryOperator {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Other(op) => op,
        }
    }
}

impl From<&str> for BinaryOperator {
    fn from(op: &str) -> Self {
        match op.trim() {
            "==" => Self::Equal,
            "!=" => Self::NotEqual,
            "<" => Self::Less,
            "<=" => Self::LessEqual,
            ">" => Self::Greater,
            ">=" => Self::GreaterEqual,
            "+" => Self::Add,
            "-" => Self::Subtract,
            "*" => Self::Multiply,
            "/" => Self::Divide,
            "%" => Self::Modulo,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for BinaryOperator {
    fn from(op: String) -> Self {
        Self::from(op.as_str())
    }
}

impl From<BinaryOperator> for String {
    fn from(op: BinaryOperator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean combinators
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogicalOperator {
    And,
    Or,
    Not,
    Other(String),
}

impl LogicalOperator {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "!",
            Self::Other(op) => op,
        }
    }
}

impl From<&str> for LogicalOperator {
    fn from(op: &str) -> Self {
        let op = op.trim();
        match op.to_ascii_uppercase().as_str() {
            "AND" | "&&" => Self::And,
            "OR" | "||" => Self::Or,
            "!" | "NOT" => Self::Not,
            _ => Self::Other(op.to_string()),
        }
    }
}

impl From<String> for LogicalOperator {
    fn from(op: String) -> Self {
        Self::from(op.as_str())
    }
}

impl From<LogicalOperator> for String {
    fn from(op: LogicalOperator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(json: &str) -> ExpressionNode {
        json.parse().unwrap()
    }

    #[test]
    fn parses_nested_tree() {
        let node = ExpressionNode::from_value(json!({
            "Type": "BinaryExpression",
            "Operator": "<=",
            "Arguments": [
                { "Type": "Identifier", "Name": "Stock" },
                { "Type": "Identifier", "Name": "ReorderLevel" }
            ]
        }))
        .unwrap();

        assert_eq!(
            node,
            ExpressionNode::binary(
                BinaryOperator::LessEqual,
                ExpressionNode::identifier("Stock"),
                ExpressionNode::identifier("ReorderLevel"),
            )
        );
    }

    #[test]
    fn unknown_type_parses_as_unsupported() {
        let node = parse(r#"{"Type":"ArrowFunction","Body":{}}"#);
        assert_eq!(node, ExpressionNode::Unsupported);
        assert_eq!(node.kind_name(), "Unsupported");
    }

    #[test]
    fn unknown_operator_is_kept_verbatim() {
        let node = parse(r#"{"Type":"BinaryExpression","Operator":"**","Arguments":[]}"#);
        let ExpressionNode::BinaryExpression { operator, .. } = node else {
            panic!("expected binary node");
        };
        assert_eq!(operator, BinaryOperator::Other("**".into()));
        assert_eq!(operator.to_string(), "**");
    }

    #[test]
    fn callee_accepts_string_or_name_object() {
        let bare = parse(r#"{"Type":"CallExpression","Callee":"UUID"}"#);
        let named = parse(r#"{"Type":"CallExpression","Callee":{"Name":"UUID"}}"#);
        assert_eq!(bare, named);
    }

    #[test]
    fn literal_without_value_is_null() {
        let node = parse(r#"{"Type":"Literal"}"#);
        assert_eq!(node, ExpressionNode::literal(Value::Null));
    }

    #[test]
    fn logical_aliases() {
        assert_eq!(LogicalOperator::from("&&"), LogicalOperator::And);
        assert_eq!(LogicalOperator::from("or"), LogicalOperator::Or);
        assert_eq!(LogicalOperator::from("NOT"), LogicalOperator::Not);
        assert_eq!(
            LogicalOperator::from("XOR"),
            LogicalOperator::Other("XOR".into())
        );
    }

    #[test]
    fn serializes_back_to_wire_shape() {
        let node = ExpressionNode::system_property("CURRENT_USER", "Name");
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({
                "Type": "SystemIdentifier",
                "Name": "CURRENT_USER",
                "Property": { "Name": "Name" }
            })
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = "{\"Type\":".parse::<ExpressionNode>().unwrap_err();
        assert_eq!(err.code(), "EXPR:MALFORMED_TREE");
    }
}
