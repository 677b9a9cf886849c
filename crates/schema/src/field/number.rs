use bdo_expression::value_utils::{format_number, to_number};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::meta::{FieldMeta, meta_builders};
use super::FieldType;

/// Digit ceilings and bounds of a number field
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NumberConstraint {
    /// Maximum digits before the decimal point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integer_part: Option<u32>,

    /// Maximum digits after the decimal point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fraction_part: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NumberField {
    #[serde(flatten)]
    pub meta: FieldMeta,

    #[serde(default)]
    pub constraint: NumberConstraint,
}

impl NumberField {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            meta: FieldMeta::new(id, name),
            constraint: NumberConstraint::default(),
        }
    }

    #[must_use]
    pub fn with_digits(mut self, integer_part: u32, fraction_part: u32) -> Self {
        self.constraint.integer_part = Some(integer_part);
        self.constraint.fraction_part = Some(fraction_part);
        self
    }

    #[must_use]
    pub fn with_min(mut self, min: f64) -> Self {
        self.constraint.min = Some(min);
        self
    }

    #[must_use]
    pub fn with_max(mut self, max: f64) -> Self {
        self.constraint.max = Some(max);
        self
    }

    #[must_use]
    pub fn integer_digits(&self) -> Option<u32> {
        self.constraint.integer_part
    }

    #[must_use]
    pub fn fraction_digits(&self) -> Option<u32> {
        self.constraint.fraction_part
    }

    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.constraint.min
    }

    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.constraint.max
    }
}

meta_builders!(NumberField);

impl FieldType for NumberField {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn type_errors(&self, value: &Value) -> Vec<String> {
        // serde_json never holds NaN or infinities, so any number is finite
        if value.is_number() {
            Vec::new()
        } else {
            vec![format!("{} must be a finite number", self.meta.label())]
        }
    }

    fn constraint_errors(&self, value: &Value) -> Vec<String> {
        let label = self.meta.label();
        let number = to_number(value);
        let (integer_digits, fraction_digits) = digit_counts(number);
        let mut errors = Vec::new();

        if let Some(limit) = self.constraint.integer_part
            && integer_digits > limit as usize
        {
            errors.push(format!("{label} must have at most {limit} integer digits"));
        }
        if let Some(limit) = self.constraint.fraction_part
            && fraction_digits > limit as usize
        {
            errors.push(format!("{label} must have at most {limit} decimal places"));
        }
        if let Some(min) = self.constraint.min
            && number < min
        {
            errors.push(format!("{label} must be at least {}", format_number(min)));
        }
        if let Some(max) = self.constraint.max
            && number > max
        {
            errors.push(format!("{label} must be at most {}", format_number(max)));
        }
        errors
    }
}

/// Digits before and after the point in the shortest decimal rendering
fn digit_counts(number: f64) -> (usize, usize) {
    let text = format_number(number.abs());
    match text.split_once('.') {
        Some((integer, fraction)) => (integer.len(), fraction.len()),
        None => (text.len(), 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(0.0, (1, 0))]
    #[case(123.0, (3, 0))]
    #[case(-123.45, (3, 2))]
    #[case(0.5, (1, 1))]
    fn digit_counts_from_decimal_text(#[case] number: f64, #[case] expected: (usize, usize)) {
        assert_eq!(digit_counts(number), expected);
    }

    #[test]
    fn type_stage_requires_numbers() {
        let field = NumberField::new("Price", "");
        assert!(field.validate(Some(&json!(12.5))).is_valid());
        assert_eq!(
            field.validate(Some(&json!("12.5"))).errors(),
            ["Price must be a finite number".to_string()]
        );
    }

    #[test]
    fn digit_ceilings() {
        let field = NumberField::new("Price", "").with_digits(3, 2);
        assert!(field.constraint_errors(&json!(999.99)).is_empty());
        assert_eq!(
            field.constraint_errors(&json!(1000.001)),
            [
                "Price must have at most 3 integer digits".to_string(),
                "Price must have at most 2 decimal places".to_string(),
            ]
        );
    }

    #[test]
    fn bounds_name_the_field() {
        let field = NumberField::new("Price", "").with_min(0.0).with_max(100.0);
        assert_eq!(
            field.constraint_errors(&json!(-1)),
            ["Price must be at least 0".to_string()]
        );
        assert_eq!(
            field.constraint_errors(&json!(100.5)),
            ["Price must be at most 100".to_string()]
        );
    }
}
