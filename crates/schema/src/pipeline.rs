//! Per-field validation stages
//!
//! 1. type check of the kind
//! 2. constraints: required first, then kind-specific limits
//! 3. expression rules, when the entity has a loaded schema
//!
//! The first failing stage ends the run. A field that is not required and
//! holds a blank value (absent, `null`, `""` or `[]`) skips every stage.

use serde_json::Value;

use crate::field::FieldDescriptor;
use crate::record::{Record, is_blank};
use crate::rule::RuleEngine;
use crate::verdict::ValidationVerdict;

pub(crate) fn validate_field(
    field: &FieldDescriptor,
    record: &Record,
    rules: &RuleEngine,
) -> ValidationVerdict {
    let value = record.get(field.id());
    if !field.is_required() && is_blank(value) {
        return ValidationVerdict::valid();
    }

    let verdict = field.validate(value);
    if !verdict.is_valid() {
        return verdict;
    }

    let errors = constraint_errors(field, value);
    if !errors.is_empty() {
        return ValidationVerdict::from_errors(errors);
    }

    if !rules.has_schema() {
        return ValidationVerdict::valid();
    }
    rules.validate_field(field.id(), value.unwrap_or(&Value::Null), record.as_map())
}

/// Every editable field in entity order, messages concatenated
pub(crate) fn validate_record<'f>(
    fields: impl IntoIterator<Item = &'f FieldDescriptor>,
    record: &Record,
    rules: &RuleEngine,
) -> ValidationVerdict {
    fields
        .into_iter()
        .filter(|field| !field.is_read_only())
        .map(|field| validate_field(field, record, rules))
        .collect()
}

fn constraint_errors(field: &FieldDescriptor, value: Option<&Value>) -> Vec<String> {
    match value {
        Some(value) if !is_blank(Some(value)) => field.constraint_errors(value),
        _ if field.is_required() => vec![format!("{} is required", field.label())],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bdo_expression::{BinaryOperator, ExpressionNode};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use crate::document::SchemaDocument;
    use crate::field::{ArrayField, NumberField, StringField};
    use crate::rule::ValidationRule;

    fn positive(field: &str) -> ValidationRule {
        ValidationRule::new(
            format!("{field}_POSITIVE"),
            ExpressionNode::binary(
                BinaryOperator::Greater,
                ExpressionNode::identifier(field),
                ExpressionNode::literal(0),
            ),
        )
        .with_message(format!("{field} must be positive"))
    }

    fn ruled(entity: &str, field: &FieldDescriptor) -> RuleEngine {
        let rules = RuleEngine::new();
        rules.load_schema(&SchemaDocument::new(entity).with_field(field.clone()));
        rules
    }

    #[rstest]
    #[case(None)]
    #[case(Some(json!(null)))]
    #[case(Some(json!("")))]
    #[case(Some(json!([])))]
    fn optional_blank_skips_all_stages(#[case] value: Option<Value>) {
        let field: FieldDescriptor = ArrayField::new("Lines", "")
            .with_rule(positive("Lines"))
            .into();
        let rules = ruled("Order", &field);

        let mut record = Record::new();
        if let Some(value) = value {
            record.set("Lines", value);
        }
        assert!(validate_field(&field, &record, &rules).is_valid());
    }

    #[test]
    fn required_blank_fails_with_label() {
        let field: FieldDescriptor = StringField::new("Name", "Product name").required().into();
        let record = Record::new().with("Name", json!(""));
        let verdict = validate_field(&field, &record, &RuleEngine::new());
        assert_eq!(verdict.errors(), ["Product name is required".to_string()]);
    }

    #[test]
    fn type_failure_stops_before_constraints() {
        let field: FieldDescriptor = NumberField::new("Price", "")
            .required()
            .with_min(0.0)
            .into();
        let record = Record::new().with("Price", json!("cheap"));
        let verdict = validate_field(&field, &record, &RuleEngine::new());
        assert_eq!(
            verdict.errors(),
            ["Price must be a finite number".to_string()]
        );
    }

    #[test]
    fn rules_run_only_after_constraints_pass() {
        let field: FieldDescriptor = NumberField::new("MRP", "")
            .with_max(100.0)
            .with_rule(positive("MRP"))
            .into();
        let rules = ruled("Product", &field);

        let too_big = validate_field(&field, &Record::new().with("MRP", json!(500)), &rules);
        assert_eq!(too_big.errors(), ["MRP must be at most 100".to_string()]);

        let negative = validate_field(&field, &Record::new().with("MRP", json!(-5)), &rules);
        assert_eq!(negative.errors(), ["MRP must be positive".to_string()]);
    }

    #[test]
    fn rules_are_skipped_without_schema() {
        let field: FieldDescriptor = NumberField::new("MRP", "")
            .with_rule(positive("MRP"))
            .into();
        let record = Record::new().with("MRP", json!(-5));
        let verdict = validate_field(&field, &record, &RuleEngine::new());
        assert!(verdict.is_valid());
    }

    #[test]
    fn record_skips_read_only_fields() {
        let fields: Vec<FieldDescriptor> = vec![
            NumberField::new("_version", "")
                .read_only()
                .required()
                .into(),
            StringField::new("Name", "").required().into(),
            NumberField::new("Price", "").required().into(),
        ];
        let verdict = validate_record(&fields, &Record::new(), &RuleEngine::new());
        assert_eq!(
            verdict.errors(),
            [
                "Name is required".to_string(),
                "Price is required".to_string(),
            ]
        );
    }
}
