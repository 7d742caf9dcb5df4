use super::operator::FilterOperator;
use crate::error::ConditionError;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Most `if`/`elseif` blocks a node may hold.
pub const MAX_BLOCKS: usize = 5;
/// Most conditions a single block may hold.
pub const MAX_CONDITIONS: usize = 5;
/// Language a block switches to when leaving structured mode.
pub const DEFAULT_RAW_LANGUAGE: &str = "javascript";

/// Bounds enforced by the editor and by validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionLimits {
    pub max_blocks: usize,
    pub max_conditions: usize,
    pub raw_language: String,
}

impl Default for ConditionLimits {
    fn default() -> Self {
        Self {
            max_blocks: MAX_BLOCKS,
            max_conditions: MAX_CONDITIONS,
            raw_language: DEFAULT_RAW_LANGUAGE.to_string(),
        }
    }
}

/// Persisted branch definition of an `if/else` node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionsInputValue {
    pub when: Vec<ConditionBlock>,
    #[serde(default)]
    pub otherwise: Otherwise,
}

/// Target of the implicit `else` branch. The id is generated once and must
/// stay stable across edits; an empty id means "not generated yet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Otherwise {
    #[serde(default)]
    pub id: String,
}

/// One `if`/`elseif` clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionBlock {
    pub id: String,
    #[serde(default)]
    pub logic_operator: LogicOperator,
    #[serde(default)]
    pub expression_type: ExpressionType,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl ConditionBlock {
    pub fn is_raw(&self) -> bool {
        self.expression_type.is_raw()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicOperator {
    #[default]
    And,
    Or,
}

impl LogicOperator {
    pub fn toggled(self) -> Self {
        match self {
            LogicOperator::And => LogicOperator::Or,
            LogicOperator::Or => LogicOperator::And,
        }
    }
}

impl fmt::Display for LogicOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicOperator::And => write!(f, "AND"),
            LogicOperator::Or => write!(f, "OR"),
        }
    }
}

/// `"condition"` for structured conditions, otherwise the name of the
/// expression language the raw text is written in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExpressionType {
    #[default]
    Condition,
    Raw(String),
}

impl ExpressionType {
    pub fn is_raw(&self) -> bool {
        matches!(self, ExpressionType::Raw(_))
    }

    /// Structured becomes `raw_language`; any raw language becomes structured.
    pub fn toggled(&self, raw_language: &str) -> Self {
        match self {
            ExpressionType::Condition => ExpressionType::Raw(raw_language.to_string()),
            ExpressionType::Raw(_) => ExpressionType::Condition,
        }
    }
}

impl From<String> for ExpressionType {
    fn from(s: String) -> Self {
        if s == "condition" {
            ExpressionType::Condition
        } else {
            ExpressionType::Raw(s)
        }
    }
}

impl From<ExpressionType> for String {
    fn from(t: ExpressionType) -> Self {
        match t {
            ExpressionType::Condition => "condition".to_string(),
            ExpressionType::Raw(language) => language,
        }
    }
}

impl fmt::Display for ExpressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionType::Condition => write!(f, "condition"),
            ExpressionType::Raw(language) => f.write_str(language),
        }
    }
}

/// A single predicate inside a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression_value: Option<ExpressionValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression_description: Option<String>,
}

impl Condition {
    pub fn structured(&self) -> Option<&StructuredCondition> {
        match &self.expression_value {
            Some(ExpressionValue::Structured(s)) => Some(s),
            _ => None,
        }
    }

    pub fn raw_text(&self) -> Option<&str> {
        match &self.expression_value {
            Some(ExpressionValue::Raw(text)) => Some(text),
            _ => None,
        }
    }
}

/// Raw expression text, or a structured `key operator value` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpressionValue {
    Raw(String),
    Structured(StructuredCondition),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<FilterOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ConditionOperand>,
}

impl StructuredCondition {
    /// Sets the operator. Emptiness checks clear the value in the same step.
    pub fn with_operator(mut self, operator: FilterOperator) -> Self {
        self.operator = Some(operator);
        if operator.is_emptiness_check() {
            self.value = Some(ConditionOperand::empty());
        }
        self
    }

    pub fn takes_value(&self) -> bool {
        !self.operator.is_some_and(FilterOperator::is_emptiness_check)
    }
}

/// Right-hand side of a structured condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionOperand {
    Text(String),
    Flag(bool),
}

impl ConditionOperand {
    pub fn empty() -> Self {
        ConditionOperand::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ConditionOperand::Text(t) if t.is_empty())
    }
}

impl fmt::Display for ConditionOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionOperand::Text(t) => f.write_str(t),
            ConditionOperand::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl ConditionsInputValue {
    /// Parses a persisted value and checks it against the default limits.
    pub fn from_json(json: &str) -> Result<Self, ConditionError> {
        let value: Self = serde_json::from_str(json)?;
        value.validate(&ConditionLimits::default())?;
        Ok(value)
    }

    pub fn to_json(&self) -> Result<String, ConditionError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Checks bounds, id uniqueness, raw-block shape and cleared emptiness values.
    pub fn validate(&self, limits: &ConditionLimits) -> Result<(), ConditionError> {
        if self.when.is_empty() {
            return Err(ConditionError::NoBlocks);
        }
        if self.when.len() > limits.max_blocks {
            return Err(ConditionError::TooManyBlocks {
                found: self.when.len(),
                max: limits.max_blocks,
            });
        }

        let mut block_ids = AHashSet::with_capacity(self.when.len());
        for block in &self.when {
            if !block_ids.insert(block.id.as_str()) {
                return Err(ConditionError::DuplicateBlockId(block.id.clone()));
            }
            validate_block(block, limits)?;
        }
        Ok(())
    }
}

fn validate_block(block: &ConditionBlock, limits: &ConditionLimits) -> Result<(), ConditionError> {
    if block.conditions.is_empty() {
        return Err(ConditionError::EmptyBlock(block.id.clone()));
    }
    if block.conditions.len() > limits.max_conditions {
        return Err(ConditionError::TooManyConditions {
            block_id: block.id.clone(),
            found: block.conditions.len(),
            max: limits.max_conditions,
        });
    }

    if let ExpressionType::Raw(language) = &block.expression_type {
        let well_formed = block.conditions.len() == 1
            && !matches!(
                block.conditions[0].expression_value,
                Some(ExpressionValue::Structured(_))
            );
        if !well_formed {
            return Err(ConditionError::MalformedRawBlock {
                block_id: block.id.clone(),
                language: language.clone(),
            });
        }
    }

    let mut condition_ids = AHashSet::with_capacity(block.conditions.len());
    for condition in &block.conditions {
        if !condition_ids.insert(condition.id.as_str()) {
            return Err(ConditionError::DuplicateConditionId {
                block_id: block.id.clone(),
                condition_id: condition.id.clone(),
            });
        }
        let Some(structured) = condition.structured() else {
            continue;
        };
        if let Some(operator) = structured.operator.filter(|op| op.is_emptiness_check()) {
            if structured.value.as_ref().is_some_and(|v| !v.is_empty()) {
                return Err(ConditionError::StaleEmptinessValue {
                    condition_id: condition.id.clone(),
                    operator,
                });
            }
        }
    }
    Ok(())
}
