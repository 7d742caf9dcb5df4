//! Tests for the condition model: editing operations, invariants and wire format.
use kiseki::condition::{
    ConditionBlock, ConditionLimits, ExpressionType, ExpressionValue, StructuredCondition,
};
use kiseki::prelude::*;
use serde_json::json;

fn editor() -> ConditionEditor<SequentialGenerator> {
    ConditionEditor::with_id_generator(SequentialGenerator::new("c"))
}

fn structured(block: &ConditionBlock, index: usize) -> &StructuredCondition {
    block.conditions[index]
        .structured()
        .expect("structured condition")
}

#[test]
fn test_initial_value_shape() {
    let editor = editor();
    let value = editor.initial_value();

    assert_eq!(value.when.len(), 1);
    let block = &value.when[0];
    assert_eq!(block.logic_operator, LogicOperator::And);
    assert_eq!(block.expression_type, ExpressionType::Condition);
    assert_eq!(block.conditions.len(), 1);
    assert!(!value.otherwise.id.is_empty());
    assert!(value.validate(&ConditionLimits::default()).is_ok());
}

#[test]
fn test_add_block_stops_at_five() {
    let editor = editor();
    let mut value = editor.initial_value();
    for _ in 0..5 {
        value = editor.add_block(&value);
    }
    assert_eq!(value.when.len(), 5);

    let sixth = editor.add_block(&value);
    assert_eq!(sixth, value);
    assert!(!editor.can_add_block(&value));
}

#[test]
fn test_add_condition_stops_at_five() {
    let editor = editor();
    let mut value = editor.initial_value();
    for _ in 0..10 {
        value = editor.add_condition(&value, 0);
        assert!(value.when.iter().all(|b| b.conditions.len() <= 5));
    }
    assert_eq!(value.when[0].conditions.len(), 5);
}

#[test]
fn test_remove_block_keeps_at_least_one() {
    let editor = editor();
    let value = editor.initial_value();
    assert_eq!(editor.remove_block(&value, 0), value);

    let two = editor.add_block(&value);
    let second_id = two.when[1].id.clone();
    let one = editor.remove_block(&two, 0);
    assert_eq!(one.when.len(), 1);
    assert_eq!(one.when[0].id, second_id);

    assert_eq!(editor.remove_block(&two, 7), two);
}

#[test]
fn test_remove_condition_keeps_at_least_one() {
    let editor = editor();
    let value = editor.initial_value();
    assert_eq!(editor.remove_condition(&value, 0, 0), value);

    let two = editor.add_condition(&value, 0);
    let kept = two.when[0].conditions[1].id.clone();
    let one = editor.remove_condition(&two, 0, 0);
    assert_eq!(one.when[0].conditions.len(), 1);
    assert_eq!(one.when[0].conditions[0].id, kept);
}

#[test]
fn test_logic_toggle_closure() {
    let editor = editor();
    let value = editor.initial_value();
    let once = editor.toggle_logic_operator(&value, 0);
    assert_eq!(once.when[0].logic_operator, LogicOperator::Or);
    let twice = editor.toggle_logic_operator(&once, 0);
    assert_eq!(twice, value);

    for op in [LogicOperator::And, LogicOperator::Or] {
        assert_eq!(op.toggled().toggled(), op);
    }
}

#[test]
fn test_toggle_expression_type_resets_conditions() {
    let editor = editor();
    let mut value = editor.initial_value();
    value = editor.add_condition(&value, 0);
    value = editor.set_condition_key(&value, 0, 0, "temperature");

    let raw = editor.toggle_expression_type(&value, 0);
    let block = &raw.when[0];
    assert_eq!(
        block.expression_type,
        ExpressionType::Raw("javascript".to_string())
    );
    assert_eq!(block.conditions.len(), 1);
    assert_eq!(block.conditions[0].raw_text(), Some(""));
    assert!(raw.validate(&ConditionLimits::default()).is_ok());

    let back = editor.toggle_expression_type(&raw, 0);
    assert_eq!(back.when[0].expression_type, ExpressionType::Condition);
    assert_eq!(back.when[0].conditions.len(), 1);
    assert_eq!(structured(&back.when[0], 0), &StructuredCondition::default());
}

#[test]
fn test_raw_language_is_configurable() {
    let editor = editor().limits(ConditionLimits {
        raw_language: "jsonata".to_string(),
        ..ConditionLimits::default()
    });
    let value = editor.toggle_expression_type(&editor.initial_value(), 0);
    assert_eq!(
        value.when[0].expression_type,
        ExpressionType::Raw("jsonata".to_string())
    );
}

#[test]
fn test_raw_block_edits() {
    let editor = editor();
    let raw = editor.toggle_expression_type(&editor.initial_value(), 0);

    assert_eq!(editor.add_condition(&raw, 0).when[0].conditions.len(), 1);
    let edited = editor.set_raw_expression(
        &raw,
        0,
        "input.temp > 30",
        Some("too hot".to_string()),
    );
    let condition = &edited.when[0].conditions[0];
    assert_eq!(condition.raw_text(), Some("input.temp > 30"));
    assert_eq!(condition.expression_description.as_deref(), Some("too hot"));

    // Structured edits do not apply to raw blocks.
    assert_eq!(
        editor.set_condition_operator(&edited, 0, 0, FilterOperator::Equal),
        edited
    );
}

#[test]
fn test_emptiness_operator_clears_value() {
    let editor = editor();
    let mut value = editor.initial_value();
    value = editor.set_condition_key(&value, 0, 0, "name");
    value = editor.set_condition_operator(&value, 0, 0, FilterOperator::Equal);
    value = editor.set_condition_value(&value, 0, 0, ConditionOperand::Text("bob".into()));
    assert_eq!(
        structured(&value.when[0], 0).value,
        Some(ConditionOperand::Text("bob".into()))
    );

    for operator in [FilterOperator::IsEmpty, FilterOperator::IsNotEmpty] {
        let cleared = editor.set_condition_operator(&value, 0, 0, operator);
        let s = structured(&cleared.when[0], 0);
        assert_eq!(s.operator, Some(operator));
        assert_eq!(s.value, Some(ConditionOperand::empty()));
        assert_eq!(s.key.as_deref(), Some("name"));

        // Values cannot be typed in while an emptiness check is selected.
        let ignored =
            editor.set_condition_value(&cleared, 0, 0, ConditionOperand::Flag(true));
        assert_eq!(ignored, cleared);
    }
}

#[test]
fn test_otherwise_id_is_stable_across_edits() {
    let editor = editor();
    let loaded = ConditionsInputValue {
        when: vec![editor.new_block()],
        otherwise: Default::default(),
    };

    let first = editor.add_block(&loaded);
    let otherwise = first.otherwise.id.clone();
    assert!(!otherwise.is_empty());

    let mut value = first;
    value = editor.toggle_logic_operator(&value, 1);
    value = editor.add_condition(&value, 0);
    value = editor.toggle_expression_type(&value, 1);
    value = editor.remove_block(&value, 1);
    value = editor.add_block(&value);
    assert_eq!(value.otherwise.id, otherwise);
}

#[test]
fn test_generated_ids_are_unique() {
    let editor = ConditionEditor::new();
    let mut value = editor.initial_value();
    for _ in 0..4 {
        value = editor.add_block(&value);
        value = editor.add_condition(&value, 0);
    }
    assert!(value.validate(&ConditionLimits::default()).is_ok());
}

#[test]
fn test_controlled_value_notifies_only_on_change() {
    let editor = editor();
    let mut published = Vec::new();
    {
        let mut controlled = Controlled::new(editor.initial_value(), |v: &ConditionsInputValue| {
            published.push(v.when.len())
        });
        assert!(controlled.update(|v| editor.add_block(v)));
        assert!(!controlled.update(|v| editor.remove_condition(v, 0, 0)));
        assert!(controlled.update(|v| editor.remove_block(v, 1)));
        assert_eq!(controlled.value().when.len(), 1);
    }
    assert_eq!(published, vec![2, 1]);
}

#[test]
fn test_wire_format_field_names() {
    let json = json!({
        "when": [
            {
                "id": "b1",
                "logicOperator": "OR",
                "expressionType": "condition",
                "conditions": [
                    { "id": "c1", "expressionValue": { "key": "temp", "operator": "GREATER_THAN", "value": "30" } },
                    { "id": "c2", "expressionValue": { "key": "online", "operator": "EQUAL", "value": true } }
                ]
            },
            {
                "id": "b2",
                "logicOperator": "AND",
                "expressionType": "javascript",
                "conditions": [
                    { "id": "c3", "expressionValue": "input.a && input.b", "expressionDescription": "both set" }
                ]
            }
        ],
        "otherwise": { "id": "else-1" }
    });

    let value = ConditionsInputValue::from_json(&json.to_string()).unwrap();
    assert_eq!(value.when[0].logic_operator, LogicOperator::Or);
    assert_eq!(
        structured(&value.when[0], 1).value,
        Some(ConditionOperand::Flag(true))
    );
    assert!(matches!(
        value.when[1].conditions[0].expression_value,
        Some(ExpressionValue::Raw(_))
    ));

    let back: serde_json::Value = serde_json::from_str(&value.to_json().unwrap()).unwrap();
    assert_eq!(back, json);
}

#[test]
fn test_validation_rejects_broken_values() {
    let blocks: Vec<serde_json::Value> = (0..6)
        .map(|i| {
            json!({
                "id": format!("b{i}"), "logicOperator": "AND", "expressionType": "condition",
                "conditions": [{ "id": "c" }]
            })
        })
        .collect();
    let too_many = json!({ "when": blocks, "otherwise": { "id": "e" } });
    assert!(matches!(
        ConditionsInputValue::from_json(&too_many.to_string()),
        Err(ConditionError::TooManyBlocks { found: 6, max: 5 })
    ));

    let duplicate = json!({
        "when": [{ "id": "b", "logicOperator": "AND", "expressionType": "condition",
                   "conditions": [{ "id": "c" }, { "id": "c" }] }],
        "otherwise": { "id": "e" }
    });
    assert!(matches!(
        ConditionsInputValue::from_json(&duplicate.to_string()),
        Err(ConditionError::DuplicateConditionId { .. })
    ));

    let stale = json!({
        "when": [{ "id": "b", "logicOperator": "AND", "expressionType": "condition",
                   "conditions": [{ "id": "c", "expressionValue": { "key": "k", "operator": "IS_EMPTY", "value": "x" } }] }],
        "otherwise": { "id": "e" }
    });
    assert!(matches!(
        ConditionsInputValue::from_json(&stale.to_string()),
        Err(ConditionError::StaleEmptinessValue { .. })
    ));

    let raw_with_two = json!({
        "when": [{ "id": "b", "logicOperator": "AND", "expressionType": "javascript",
                   "conditions": [{ "id": "c1", "expressionValue": "a" }, { "id": "c2", "expressionValue": "b" }] }],
        "otherwise": { "id": "e" }
    });
    assert!(matches!(
        ConditionsInputValue::from_json(&raw_with_two.to_string()),
        Err(ConditionError::MalformedRawBlock { .. })
    ));

    assert!(matches!(
        ConditionsInputValue::from_json("{ \"when\": [] }"),
        Err(ConditionError::NoBlocks)
    ));
    assert!(matches!(
        ConditionsInputValue::from_json("not json"),
        Err(ConditionError::Json(_))
    ));
}

#[test]
fn test_operator_wire_names_round_trip() {
    for operator in FilterOperator::ALL {
        let encoded = serde_json::to_value(operator).unwrap();
        assert_eq!(encoded, json!(operator.wire_name()));
        assert_eq!(operator.to_string(), operator.wire_name());
    }
}
