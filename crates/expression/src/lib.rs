//! # bdo-expression
//!
//! Interpreter for the rule expression trees that accompany BDO schemas.
//!
//! ```rust
//! use bdo_expression::prelude::*;
//! use serde_json::json;
//!
//! let rule: ExpressionNode = r#"{
//!     "Type": "BinaryExpression", "Operator": ">",
//!     "Arguments": [ {"Type": "Identifier", "Name": "MRP"},
//!                    {"Type": "Literal", "Value": 0} ]
//! }"#.parse()?;
//!
//! let ctx = EvaluationContext::builder().field("MRP", json!(120)).build();
//! assert_eq!(Evaluator::new().evaluate(&rule, &ctx)?, json!(true));
//! # Ok::<(), ExpressionError>(())
//! ```

#![forbid(unsafe_code)]

pub mod builtins;
pub mod config;
pub mod context;
pub mod core;
pub mod eval;
pub mod value_utils;

pub use builtins::{BuiltinFunction, FunctionRegistry};
pub use config::EvaluatorConfig;
pub use context::{EvaluationContext, EvaluationContextBuilder, SystemValues};
pub use crate::core::ast::{BinaryOperator, ExpressionNode, LogicalOperator, PropertyRef};
pub use crate::core::error::{ExpressionError, ExpressionResult};
pub use eval::Evaluator;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BinaryOperator, EvaluationContext, Evaluator, ExpressionError, ExpressionNode,
        ExpressionResult, FunctionRegistry, LogicalOperator, SystemValues,
    };
}
