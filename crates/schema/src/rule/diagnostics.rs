use bdo_log::observability::ObservabilityEvent;
use serde_json::json;

/// A rule that could not be evaluated and was counted as passed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEvaluationFailed {
    pub entity_id: Option<String>,
    pub field_id: String,
    pub rule_id: String,
    /// `EXPR:*` code of the evaluation error
    pub code: &'static str,
    pub message: String,
}

impl ObservabilityEvent for RuleEvaluationFailed {
    fn name(&self) -> &str {
        "rule_evaluation_failed"
    }

    fn data(&self) -> Option<serde_json::Value> {
        Some(json!({
            "entity_id": self.entity_id,
            "field_id": self.field_id,
            "rule_id": self.rule_id,
            "code": self.code,
            "message": self.message,
        }))
    }
}
