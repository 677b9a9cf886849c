//! End-to-end evaluation of wire-format trees

use bdo_expression::prelude::*;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

fn parse(tree: Value) -> ExpressionNode {
    ExpressionNode::from_value(tree).expect("tree parses")
}

fn ident(name: &str) -> Value {
    json!({ "Type": "Identifier", "Name": name })
}

fn lit(value: Value) -> Value {
    json!({ "Type": "Literal", "Value": value })
}

fn call(callee: &str, args: Vec<Value>) -> Value {
    json!({ "Type": "CallExpression", "Callee": callee, "Arguments": args })
}

fn binary(op: &str, left: Value, right: Value) -> Value {
    json!({ "Type": "BinaryExpression", "Operator": op, "Arguments": [left, right] })
}

#[rstest]
#[case(3, 5, true)]
#[case(5, 5, true)]
#[case(9, 5, false)]
fn reorder_flag(#[case] stock: i64, #[case] reorder_level: i64, #[case] expected: bool) {
    let tree = parse(call(
        "IF",
        vec![
            binary("<=", ident("Stock"), ident("ReorderLevel")),
            lit(json!(true)),
            lit(json!(false)),
        ],
    ));
    let ctx = EvaluationContext::builder()
        .field("Stock", json!(stock))
        .field("ReorderLevel", json!(reorder_level))
        .build();

    let result = Evaluator::new().evaluate(&tree, &ctx).unwrap();
    assert_eq!(result, json!(expected));
}

#[rstest]
#[case(json!(0))]
#[case(json!(1))]
#[case(json!(-12.5))]
#[case(json!("17"))]
#[case(json!(null))]
fn division_by_zero_is_zero(#[case] numerator: Value) {
    let tree = parse(binary("/", lit(numerator), lit(json!(0))));
    let result = Evaluator::new()
        .evaluate(&tree, &EvaluationContext::new())
        .unwrap();
    assert_eq!(result, json!(0));
}

#[test]
fn null_equals_missing_field() {
    let tree = parse(binary("==", lit(Value::Null), ident("NeverSet")));
    let result = Evaluator::new()
        .evaluate(&tree, &EvaluationContext::new())
        .unwrap();
    assert_eq!(result, json!(true));

    let tree = parse(binary("!=", ident("NeverSet"), lit(json!(0))));
    let result = Evaluator::new()
        .evaluate(&tree, &EvaluationContext::new())
        .unwrap();
    assert_eq!(result, json!(true));
}

#[test]
fn empty_aggregates_and_null_concat() {
    let evaluator = Evaluator::new();
    let ctx = EvaluationContext::new();

    for name in ["SUM", "AVG"] {
        let tree = parse(call(name, vec![]));
        let result = evaluator.evaluate(&tree, &ctx).unwrap();
        assert_eq!(result, json!(0), "{name}()");
    }

    let tree = parse(call(
        "CONCAT",
        vec![lit(json!("a")), lit(Value::Null), lit(json!("b"))],
    ));
    assert_eq!(evaluator.evaluate(&tree, &ctx).unwrap(), json!("ab"));
}

#[test]
fn unknown_function_surfaces_from_evaluator() {
    let tree = parse(call("SHIP_IT", vec![lit(json!(1))]));
    let err = Evaluator::new()
        .evaluate(&tree, &EvaluationContext::new())
        .unwrap_err();
    assert_eq!(err.code(), "EXPR:FUNCTION_NOT_FOUND");
    assert_eq!(err.to_string(), "Unknown function `SHIP_IT`");
}

#[test]
fn date_rules_against_fixed_clock() {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
    let ctx = EvaluationContext::builder()
        .field("DueDate", json!("2026-10-29"))
        .system_values(SystemValues::at(now, None))
        .build();

    let evaluator = Evaluator::new();

    // DATE_DIFF(TODAY, DueDate) <= 10
    let today = json!({ "Type": "SystemIdentifier", "Name": "TODAY" });
    let tree = parse(binary(
        "<=",
        call("DATE_DIFF", vec![today, ident("DueDate")]),
        lit(json!(10)),
    ));
    assert_eq!(evaluator.evaluate(&tree, &ctx).unwrap(), json!(true));

    let shifted = call("ADD_MONTHS", vec![ident("DueDate"), lit(json!(3))]);
    let tree = parse(call("YEAR", vec![shifted]));
    assert_eq!(evaluator.evaluate(&tree, &ctx).unwrap(), json!(2027));
}

#[test]
fn nested_logical_rule() {
    // (Price > 0 AND MRP >= Price) OR !Active
    let tree = parse(json!({
        "Type": "LogicalExpression",
        "Operator": "OR",
        "Arguments": [
            {
                "Type": "LogicalExpression",
                "Operator": "AND",
                "Arguments": [
                    binary(">", ident("Price"), lit(json!(0))),
                    binary(">=", ident("MRP"), ident("Price"))
                ]
            },
            { "Type": "LogicalExpression", "Operator": "!", "Arguments": [ident("Active")] }
        ]
    }));
    let evaluator = Evaluator::new();

    let ok = EvaluationContext::builder()
        .field("Price", json!(50))
        .field("MRP", json!(60))
        .field("Active", json!(true))
        .build();
    assert_eq!(evaluator.evaluate(&tree, &ok).unwrap(), json!(true));

    let bad = EvaluationContext::builder()
        .field("Price", json!(50))
        .field("MRP", json!("40"))
        .field("Active", json!(true))
        .build();
    assert_eq!(evaluator.evaluate(&tree, &bad).unwrap(), json!(false));

    let inactive = EvaluationContext::builder()
        .field("Active", json!(false))
        .build();
    assert_eq!(evaluator.evaluate(&tree, &inactive).unwrap(), json!(true));
}

#[test]
fn assignment_wrapper_and_member_access() {
    let tree = parse(json!({
        "Type": "AssignmentExpression",
        "Arguments": [{
            "Type": "MemberExpression",
            "Arguments": [ident("Supplier")],
            "Property": { "Name": "Country" }
        }]
    }));
    let ctx = EvaluationContext::builder()
        .field("Supplier", json!({ "_id": "s1", "Country": "IN" }))
        .build();
    let result = Evaluator::new().evaluate(&tree, &ctx).unwrap();
    assert_eq!(result, json!("IN"));
}
