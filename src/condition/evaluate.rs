use super::model::{
    Condition, ConditionBlock, ConditionOperand, ConditionsInputValue, ExpressionType,
    LogicOperator,
};
use super::operator::FilterOperator;
use crate::error::EvaluationError;
use itertools::Itertools;
use serde_json::Value;

/// Which branch of an `if/else` node a context selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchTarget {
    Block { index: usize, id: String },
    Otherwise { id: String },
}

impl BranchTarget {
    pub fn id(&self) -> &str {
        match self {
            BranchTarget::Block { id, .. } | BranchTarget::Otherwise { id } => id,
        }
    }
}

/// The result of a branch selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSelection {
    pub target: BranchTarget,
    /// A human-readable explanation of the decisive conditions.
    pub reason: String,
}

/// Evaluates structured condition blocks against a JSON context.
///
/// Blocks are tried in order and the first one that holds wins; when none does,
/// the `otherwise` branch is selected. `AND` blocks stop at the first failing
/// condition and `OR` blocks at the first passing one, and only the conditions
/// that were actually evaluated appear in the reason.
pub struct BranchSelector;

impl BranchSelector {
    pub fn select(
        value: &ConditionsInputValue,
        context: &Value,
    ) -> Result<BranchSelection, EvaluationError> {
        for (index, block) in value.when.iter().enumerate() {
            let (holds, explanation) = Self::eval_block(block, context)?;
            if holds {
                return Ok(BranchSelection {
                    target: BranchTarget::Block {
                        index,
                        id: block.id.clone(),
                    },
                    reason: explanation,
                });
            }
        }
        Ok(BranchSelection {
            target: BranchTarget::Otherwise {
                id: value.otherwise.id.clone(),
            },
            reason: "No condition block matched".to_string(),
        })
    }

    fn eval_block(block: &ConditionBlock, context: &Value) -> Result<(bool, String), EvaluationError> {
        if let ExpressionType::Raw(language) = &block.expression_type {
            return Err(EvaluationError::UnsupportedExpression {
                block_id: block.id.clone(),
                language: language.clone(),
            });
        }

        let mut parts = Vec::with_capacity(block.conditions.len());
        let mut outcome = block.logic_operator == LogicOperator::And;
        for condition in &block.conditions {
            let (holds, part) = Self::eval_condition(block, condition, context)?;
            parts.push(part);
            match block.logic_operator {
                LogicOperator::And if !holds => {
                    outcome = false;
                    break;
                }
                LogicOperator::Or if holds => {
                    outcome = true;
                    break;
                }
                _ => {}
            }
        }

        let separator = format!(" {} ", block.logic_operator);
        Ok((outcome, parts.into_iter().join(&separator)))
    }

    fn eval_condition(
        block: &ConditionBlock,
        condition: &Condition,
        context: &Value,
    ) -> Result<(bool, String), EvaluationError> {
        let incomplete = || EvaluationError::IncompleteCondition {
            block_id: block.id.clone(),
            condition_id: condition.id.clone(),
        };
        let structured = condition.structured().ok_or_else(incomplete)?;
        let key = structured.key.as_deref().ok_or_else(incomplete)?;
        let operator = structured.operator.ok_or_else(incomplete)?;

        let actual = lookup(context, key);
        let empty = ConditionOperand::empty();
        let expected = structured.value.as_ref().unwrap_or(&empty);
        let holds = compare(key, operator, actual, expected)?;

        let shown = actual.map(display_value).unwrap_or_else(|| "missing".to_string());
        let part = if operator.is_emptiness_check() {
            format!("${} (was {}) {}", key, shown, operator.symbol())
        } else {
            format!("${} (was {}) {} {}", key, shown, operator.symbol(), expected)
        };
        Ok((holds, part))
    }
}

/// Resolves a dotted path (`user.address.city`, `items.0`) inside the context.
fn lookup<'v>(context: &'v Value, key: &str) -> Option<&'v Value> {
    key.split('.').try_fold(context, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn matches_operand(actual: &Value, expected: &ConditionOperand) -> bool {
    match (actual, expected) {
        (Value::Bool(a), ConditionOperand::Flag(b)) => a == b,
        (Value::Bool(a), ConditionOperand::Text(t)) => *t == a.to_string(),
        (Value::String(a), ConditionOperand::Text(t)) => a == t,
        (Value::Number(n), ConditionOperand::Text(t)) => {
            match (n.as_f64(), t.trim().parse::<f64>()) {
                (Some(a), Ok(b)) => a == b,
                _ => false,
            }
        }
        _ => false,
    }
}

fn compare(
    key: &str,
    operator: FilterOperator,
    actual: Option<&Value>,
    expected: &ConditionOperand,
) -> Result<bool, EvaluationError> {
    let text = expected.to_string();
    let holds = match operator {
        FilterOperator::IsEmpty => is_empty_value(actual),
        FilterOperator::IsNotEmpty => !is_empty_value(actual),
        FilterOperator::Equal => actual.is_some_and(|a| matches_operand(a, expected)),
        FilterOperator::NotEqual => !actual.is_some_and(|a| matches_operand(a, expected)),
        FilterOperator::Contains => contains(actual, expected),
        FilterOperator::NotContains => !contains(actual, expected),
        FilterOperator::StartWith => {
            actual.and_then(Value::as_str).is_some_and(|s| s.starts_with(&text))
        }
        FilterOperator::EndWith => actual.and_then(Value::as_str).is_some_and(|s| s.ends_with(&text)),
        FilterOperator::GreaterThan
        | FilterOperator::GreaterThanOrEqual
        | FilterOperator::LessThan
        | FilterOperator::LessThanOrEqual => {
            let not_a_number = |found: String| EvaluationError::NotANumber {
                key: key.to_string(),
                operator,
                found,
            };
            let Some(actual) = actual else {
                return Ok(false);
            };
            let left = as_number(actual).ok_or_else(|| not_a_number(display_value(actual)))?;
            let right = text
                .trim()
                .parse::<f64>()
                .map_err(|_| not_a_number(text.clone()))?;
            match operator {
                FilterOperator::GreaterThan => left > right,
                FilterOperator::GreaterThanOrEqual => left >= right,
                FilterOperator::LessThan => left < right,
                _ => left <= right,
            }
        }
    };
    Ok(holds)
}

fn contains(actual: Option<&Value>, expected: &ConditionOperand) -> bool {
    match actual {
        Some(Value::String(s)) => s.contains(&expected.to_string()),
        Some(Value::Array(items)) => items.iter().any(|item| matches_operand(item, expected)),
        _ => false,
    }
}
