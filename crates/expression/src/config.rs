//! Evaluator configuration

use serde::{Deserialize, Serialize};

/// Default bound on tree nesting
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Tunables for [`crate::Evaluator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Deepest node nesting evaluated before giving up
    pub max_depth: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config: EvaluatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        let config: EvaluatorConfig = serde_json::from_str(r#"{"max_depth": 4}"#).unwrap();
        assert_eq!(config.max_depth, 4);
    }
}
