//! Tests for selecting an if/else branch against runtime data.
use kiseki::prelude::*;
use serde_json::json;

fn conditions(json: serde_json::Value) -> ConditionsInputValue {
    ConditionsInputValue::from_json(&json.to_string()).expect("valid conditions fixture")
}

fn thermostat() -> ConditionsInputValue {
    conditions(json!({
        "when": [
            {
                "id": "hot",
                "logicOperator": "AND",
                "expressionType": "condition",
                "conditions": [
                    { "id": "c1", "expressionValue": { "key": "sensor.temp", "operator": "GREATER_THAN", "value": "30" } },
                    { "id": "c2", "expressionValue": { "key": "sensor.online", "operator": "EQUAL", "value": true } }
                ]
            },
            {
                "id": "named",
                "logicOperator": "OR",
                "expressionType": "condition",
                "conditions": [
                    { "id": "c3", "expressionValue": { "key": "room", "operator": "START_WITH", "value": "lab" } },
                    { "id": "c4", "expressionValue": { "key": "tags", "operator": "CONTAINS", "value": "watch" } }
                ]
            }
        ],
        "otherwise": { "id": "else" }
    }))
}

#[test]
fn test_first_matching_block_wins() {
    let context = json!({ "sensor": { "temp": 32.5, "online": true }, "room": "lab-2" });
    let selection = BranchSelector::select(&thermostat(), &context).unwrap();

    assert_eq!(
        selection.target,
        BranchTarget::Block {
            index: 0,
            id: "hot".to_string()
        }
    );
    assert_eq!(
        selection.reason,
        "$sensor.temp (was 32.5) > 30 AND $sensor.online (was true) == true"
    );
}

#[test]
fn test_and_short_circuits() {
    let context = json!({ "sensor": { "temp": 12, "online": true }, "room": "office" });
    let selection = BranchSelector::select(&thermostat(), &context).unwrap();
    assert_eq!(selection.target.id(), "else");
}

#[test]
fn test_or_block_matches_on_any() {
    let context = json!({
        "sensor": { "temp": 10, "online": true },
        "room": "office",
        "tags": ["watch", "floor-1"]
    });
    let selection = BranchSelector::select(&thermostat(), &context).unwrap();

    assert_eq!(selection.target.id(), "named");
    assert_eq!(
        selection.reason,
        "$room (was office) starts with lab OR $tags (was [\"watch\",\"floor-1\"]) contains watch"
    );
}

#[test]
fn test_otherwise_when_nothing_matches() {
    let context = json!({ "sensor": { "temp": 10, "online": false } });
    let selection = BranchSelector::select(&thermostat(), &context).unwrap();
    assert_eq!(
        selection.target,
        BranchTarget::Otherwise {
            id: "else".to_string()
        }
    );
}

#[test]
fn test_emptiness_checks() {
    let value = conditions(json!({
        "when": [{
            "id": "b",
            "logicOperator": "AND",
            "expressionType": "condition",
            "conditions": [
                { "id": "c1", "expressionValue": { "key": "note", "operator": "IS_EMPTY", "value": "" } },
                { "id": "c2", "expressionValue": { "key": "owner", "operator": "IS_NOT_EMPTY" } }
            ]
        }],
        "otherwise": { "id": "e" }
    }));

    let matches = json!({ "note": "", "owner": "ops" });
    assert_eq!(BranchSelector::select(&value, &matches).unwrap().target.id(), "b");

    let missing_owner = json!({ "note": null });
    assert_eq!(BranchSelector::select(&value, &missing_owner).unwrap().target.id(), "e");
}

#[test]
fn test_raw_expression_is_unsupported() {
    let value = conditions(json!({
        "when": [{
            "id": "raw",
            "logicOperator": "AND",
            "expressionType": "javascript",
            "conditions": [{ "id": "c", "expressionValue": "input.a > 1" }]
        }],
        "otherwise": { "id": "e" }
    }));

    let err = BranchSelector::select(&value, &json!({})).unwrap_err();
    assert_eq!(
        err,
        EvaluationError::UnsupportedExpression {
            block_id: "raw".to_string(),
            language: "javascript".to_string()
        }
    );
}

#[test]
fn test_incomplete_condition_is_an_error() {
    let editor = ConditionEditor::with_id_generator(SequentialGenerator::new("x"));
    let value = editor.initial_value();
    let err = BranchSelector::select(&value, &json!({})).unwrap_err();
    assert!(matches!(err, EvaluationError::IncompleteCondition { .. }));
}

#[test]
fn test_numeric_comparison_on_text_is_an_error() {
    let context = json!({ "sensor": { "temp": "warm", "online": true } });
    let err = BranchSelector::select(&thermostat(), &context).unwrap_err();
    assert!(matches!(
        err,
        EvaluationError::NotANumber { ref found, operator: FilterOperator::GreaterThan, .. } if found == "warm"
    ));
    assert!(err.to_string().contains("sensor.temp"));
}

#[test]
fn test_editor_built_conditions_evaluate() {
    let editor = ConditionEditor::with_id_generator(SequentialGenerator::new("x"));
    let mut value = editor.initial_value();
    value = editor.set_condition_key(&value, 0, 0, "mode");
    value = editor.set_condition_operator(&value, 0, 0, FilterOperator::NotEqual);
    value = editor.set_condition_value(&value, 0, 0, ConditionOperand::Text("eco".into()));

    let boost = BranchSelector::select(&value, &json!({ "mode": "boost" })).unwrap();
    assert_eq!(boost.target.id(), value.when[0].id);

    let eco = BranchSelector::select(&value, &json!({ "mode": "eco" })).unwrap();
    assert_eq!(eco.target.id(), value.otherwise.id);
}
