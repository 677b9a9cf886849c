//! Date functions
//!
//! Extractors and `DATE_DIFF` return 0 for unparseable input; the adders
//! return null.

use chrono::{DateTime, Datelike, Months, TimeDelta, Utc};
use serde_json::Value;

use super::arg;
use crate::context::EvaluationContext;
use crate::value_utils::{format_iso, parse_datetime, to_number};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Calendar year
pub fn year(args: &[Value], _ctx: &EvaluationContext) -> Value {
    Value::from(parse_datetime(arg(args, 0)).map_or(0, |dt| dt.year()))
}

/// Month, 1-12
pub fn month(args: &[Value], _ctx: &EvaluationContext) -> Value {
    Value::from(parse_datetime(arg(args, 0)).map_or(0, |dt| dt.month()))
}

/// Day of month
pub fn day(args: &[Value], _ctx: &EvaluationContext) -> Value {
    Value::from(parse_datetime(arg(args, 0)).map_or(0, |dt| dt.day()))
}

/// Whole days between two dates, regardless of order
pub fn date_diff(args: &[Value], _ctx: &EvaluationContext) -> Value {
    match (parse_datetime(arg(args, 0)), parse_datetime(arg(args, 1))) {
        (Some(a), Some(b)) => Value::from((a - b).num_milliseconds().abs() / MILLIS_PER_DAY),
        _ => Value::from(0),
    }
}

/// `ADD_DAYS(date, n)`; `n` is truncated to whole days
pub fn add_days(args: &[Value], _ctx: &EvaluationContext) -> Value {
    shifted(arg(args, 0), |dt| {
        let days = whole(to_number(arg(args, 1)))?;
        dt.checked_add_signed(TimeDelta::try_days(days)?)
    })
}

/// `ADD_MONTHS(date, n)`; day-of-month is clamped to the target month
pub fn add_months(args: &[Value], _ctx: &EvaluationContext) -> Value {
    shifted(arg(args, 0), |dt| {
        let months = whole(to_number(arg(args, 1)))?;
        let span = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
        if months >= 0 {
            dt.checked_add_months(span)
        } else {
            dt.checked_sub_months(span)
        }
    })
}

fn shifted(date: &Value, shift: impl FnOnce(DateTime<Utc>) -> Option<DateTime<Utc>>) -> Value {
    parse_datetime(date)
        .and_then(shift)
        .map_or(Value::Null, |dt| Value::String(format_iso(dt)))
}

fn whole(n: f64) -> Option<i64> {
    n.is_finite().then(|| n.trunc() as i64)
}
