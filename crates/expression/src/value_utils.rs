//! Loose value semantics shared by the operators and the builtins
//!
//! Backend rules were authored against a dynamically typed runtime, so
//! equality, truthiness and numeric coercion follow those loose rules here:
//! `null` equals only `null`, numeric strings compare equal to numbers,
//! and arithmetic on garbage degrades to `0` instead of failing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Number, Value};

/// 2^53, the largest integer an f64 holds exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Naive date-time layouts tried after RFC 3339
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Extract f64 from Number, trying both f64 and i64 representations
#[inline]
pub fn number_as_f64(num: &Number) -> Option<f64> {
    num.as_f64().or_else(|| num.as_i64().map(|i| i as f64))
}

/// Loose truthiness: `null`, `false`, `0` and `""` are falsy; every array
/// and object is truthy, including empty ones.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => number_as_f64(n).is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric coercion that reports failure as `None`
///
/// `null` → 0, booleans → 0/1, blank strings → 0, numeric strings → their
/// value, single-element arrays → their element.
pub fn to_number_strict(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => number_as_f64(n),
        Value::String(s) => parse_numeric(s),
        Value::Array(items) => match items.as_slice() {
            [] => Some(0.0),
            [single] => to_number_strict(single),
            _ => None,
        },
        Value::Object(_) => None,
    }
}

/// Numeric coercion that never fails: anything non-numeric becomes `0`
pub fn to_number(value: &Value) -> f64 {
    to_number_strict(value).unwrap_or(0.0)
}

fn parse_numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// True when `value` is a number or a non-blank numeric string
pub fn is_numeric_like(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => !s.trim().is_empty() && parse_numeric(s).is_some(),
        _ => false,
    }
}

/// Wrap an arithmetic result: integral values become JSON integers,
/// non-finite values become `0`.
pub fn number_value(f: f64) -> Value {
    if !f.is_finite() {
        return Value::from(0);
    }
    if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
        return Value::from(f as i64);
    }
    Number::from_f64(f).map_or_else(|| Value::from(0), Value::Number)
}

/// Render a number the way a dynamic runtime prints it: `3`, not `3.0`
pub fn format_number(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    if f.fract() == 0.0 && f.abs() < 1e21 {
        return format!("{f:.0}");
    }
    format!("{f}")
}

/// String form used by the text functions; `null` renders as ""
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) if n.is_f64() => number_as_f64(n).map(format_number).unwrap_or_default(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(to_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Loose (`==`) equality
pub fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Number(a), Value::Number(b)) => number_as_f64(a) == number_as_f64(b),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Bool(b), other) | (other, Value::Bool(b)) => {
            loose_eq(&Value::from(i64::from(*b)), other)
        }
        (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
            match (to_number_strict(left), to_number_strict(right)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
        }
        (Value::Array(_) | Value::Object(_), Value::Array(_) | Value::Object(_)) => left == right,
        (container @ (Value::Array(_) | Value::Object(_)), primitive)
        | (primitive, container @ (Value::Array(_) | Value::Object(_))) => {
            loose_eq(&Value::String(to_text(container)), primitive)
        }
    }
}

/// Parse a date value: RFC 3339 / ISO-8601 strings, `YYYY-MM-DD`, or
/// epoch milliseconds. Naive inputs are taken as UTC.
pub fn parse_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_datetime_str(s.trim()),
        Value::Number(n) => number_as_f64(n)
            .filter(|ms| ms.is_finite())
            .and_then(|ms| DateTime::from_timestamp_millis(ms as i64)),
        _ => None,
    }
}

fn parse_datetime_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn format_iso(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(null), false)]
    #[case(json!(false), false)]
    #[case(json!(0), false)]
    #[case(json!(0.0), false)]
    #[case(json!(""), false)]
    #[case(json!("0"), true)]
    #[case(json!([]), true)]
    #[case(json!({}), true)]
    #[case(json!(-1), true)]
    fn truthiness(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_truthy(&value), expected);
    }

    #[rstest]
    #[case(json!(null), 0.0)]
    #[case(json!(true), 1.0)]
    #[case(json!(" 42 "), 42.0)]
    #[case(json!("1.5"), 1.5)]
    #[case(json!(""), 0.0)]
    #[case(json!("abc"), 0.0)]
    #[case(json!([7]), 7.0)]
    #[case(json!([1, 2]), 0.0)]
    #[case(json!({"a": 1}), 0.0)]
    fn coercion(#[case] value: Value, #[case] expected: f64) {
        assert_eq!(to_number(&value), expected);
    }

    #[rstest]
    #[case(json!(null), json!(null), true)]
    #[case(json!(null), json!(0), false)]
    #[case(json!(null), json!(""), false)]
    #[case(json!(1), json!(1.0), true)]
    #[case(json!(1), json!("1"), true)]
    #[case(json!("abc"), json!(0), false)]
    #[case(json!(""), json!(0), true)]
    #[case(json!(true), json!(1), true)]
    #[case(json!(true), json!("1"), true)]
    #[case(json!(false), json!(""), true)]
    #[case(json!([1, 2]), json!("1,2"), true)]
    #[case(json!({"a": 1}), json!({"a": 1}), true)]
    #[case(json!("a"), json!("b"), false)]
    fn loose_equality(#[case] left: Value, #[case] right: Value, #[case] expected: bool) {
        assert_eq!(loose_eq(&left, &right), expected);
        assert_eq!(loose_eq(&right, &left), expected);
    }

    #[test]
    fn integral_results_become_integers() {
        assert_eq!(number_value(3.0), json!(3));
        assert_eq!(number_value(-0.0), json!(0));
        assert_eq!(number_value(2.5), json!(2.5));
        assert_eq!(number_value(f64::NAN), json!(0));
        assert_eq!(number_value(f64::INFINITY), json!(0));
    }

    #[test]
    fn text_rendering() {
        assert_eq!(to_text(&json!(null)), "");
        assert_eq!(to_text(&json!(3.0)), "3");
        assert_eq!(to_text(&json!(0.5)), "0.5");
        assert_eq!(to_text(&json!([1, null, "x"])), "1,,x");
        assert_eq!(to_text(&json!({"k": 1})), "[object Object]");
    }

    #[test]
    fn parses_common_date_shapes() {
        let expected = "2024-03-15T00:00:00.000Z";
        for input in [
            json!("2024-03-15"),
            json!("2024-03-15T00:00:00Z"),
            json!("2024-03-15T00:00:00.000+00:00"),
            json!("2024-03-15T00:00:00"),
            json!("2024-03-15 00:00:00"),
            json!(1_710_460_800_000_i64),
        ] {
            let parsed = parse_datetime(&input).unwrap_or_else(|| panic!("{input} should parse"));
            assert_eq!(format_iso(parsed), expected);
        }
        assert!(parse_datetime(&json!("not a date")).is_none());
        assert!(parse_datetime(&json!(null)).is_none());
        assert!(parse_datetime(&json!("2024-02-30")).is_none());
    }
}
