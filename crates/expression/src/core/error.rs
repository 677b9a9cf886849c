//! Evaluation errors
//!
//! Only structural problems are errors: a malformed tree, an operator or
//! node type the runtime does not know, or a call to an unregistered
//! function. Data problems (nulls, non-numeric strings, bad dates) never
//! raise; the operators and functions degrade to neutral values instead.

use thiserror::Error;

/// Result type for evaluation
pub type ExpressionResult<T> = Result<T, ExpressionError>;

/// Structural evaluation failure
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ExpressionError {
    /// Node type not understood by this runtime
    #[error("Unsupported expression node type")]
    UnsupportedNode,

    /// Operator text not understood by this runtime
    #[error("Unsupported {kind} operator `{operator}`")]
    UnsupportedOperator {
        /// `binary` or `logical`
        kind: &'static str,
        /// Operator as it appeared in the tree
        operator: String,
    },

    /// Node carries the wrong number of operands
    #[error("{node} requires {expected} operand(s), found {found}")]
    MissingOperands {
        /// Wire type of the node
        node: &'static str,
        /// Human-readable arity
        expected: &'static str,
        /// Operands actually present
        found: usize,
    },

    /// Call to a name absent from the function registry
    #[error("Unknown function `{name}`")]
    FunctionNotFound {
        /// Callee as written in the tree
        name: String,
    },

    /// Tree nested deeper than the configured limit
    #[error("Maximum recursion depth ({limit}) exceeded")]
    RecursionLimit {
        /// Configured limit
        limit: usize,
    },

    /// Tree JSON could not be parsed
    #[error("Malformed expression tree: {0}")]
    MalformedTree(#[from] serde_json::Error),
}

impl ExpressionError {
    /// Stable machine-readable code
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedNode => "EXPR:UNSUPPORTED_NODE",
            Self::UnsupportedOperator { .. } => "EXPR:UNSUPPORTED_OPERATOR",
            Self::MissingOperands { .. } => "EXPR:MISSING_OPERANDS",
            Self::FunctionNotFound { .. } => "EXPR:FUNCTION_NOT_FOUND",
            Self::RecursionLimit { .. } => "EXPR:RECURSION_LIMIT",
            Self::MalformedTree(_) => "EXPR:MALFORMED_TREE",
        }
    }

    pub fn function_not_found(name: impl Into<String>) -> Self {
        Self::FunctionNotFound { name: name.into() }
    }

    pub fn unsupported_operator(kind: &'static str, operator: impl Into<String>) -> Self {
        Self::UnsupportedOperator {
            kind,
            operator: operator.into(),
        }
    }

    pub fn missing_operands(node: &'static str, expected: &'static str, found: usize) -> Self {
        Self::MissingOperands {
            node,
            expected,
            found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_and_codes() {
        let err = ExpressionError::function_not_found("NOPE");
        assert_eq!(err.to_string(), "Unknown function `NOPE`");
        assert_eq!(err.code(), "EXPR:FUNCTION_NOT_FOUND");

        let err = ExpressionError::unsupported_operator("binary", "**");
        assert_eq!(err.to_string(), "Unsupported binary operator `**`");
        assert_eq!(err.code(), "EXPR:UNSUPPORTED_OPERATOR");

        let err = ExpressionError::missing_operands("BinaryExpression", "exactly 2", 1);
        assert_eq!(
            err.to_string(),
            "BinaryExpression requires exactly 2 operand(s), found 1"
        );

        assert_eq!(
            ExpressionError::RecursionLimit { limit: 8 }.to_string(),
            "Maximum recursion depth (8) exceeded"
        );
        assert_eq!(
            ExpressionError::UnsupportedNode.code(),
            "EXPR:UNSUPPORTED_NODE"
        );
    }
}
