use crate::condition::FilterOperator;
use thiserror::Error;

/// Errors that can occur while loading a workflow graph definition.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Failed to parse workflow graph JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid custom graph data: {0}")]
    Conversion(String),
}

/// Errors that can occur while loading a list of trace records.
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Failed to parse trace list JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown run mode '{0}'")]
    UnknownMode(String),
}

/// Errors raised when a persisted condition structure breaks one of its invariants.
#[derive(Error, Debug)]
pub enum ConditionError {
    #[error("Failed to parse conditions JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Too many condition blocks: {found} (at most {max})")]
    TooManyBlocks { found: usize, max: usize },

    #[error("Condition blocks list is empty")]
    NoBlocks,

    #[error("Block '{block_id}' holds {found} conditions (at most {max})")]
    TooManyConditions {
        block_id: String,
        found: usize,
        max: usize,
    },

    #[error("Block '{0}' holds no conditions")]
    EmptyBlock(String),

    #[error("Duplicate block id '{0}'")]
    DuplicateBlockId(String),

    #[error("Duplicate condition id '{condition_id}' in block '{block_id}'")]
    DuplicateConditionId {
        block_id: String,
        condition_id: String,
    },

    #[error(
        "Block '{block_id}' uses expression type '{language}' and must hold exactly one raw-expression condition"
    )]
    MalformedRawBlock { block_id: String, language: String },

    #[error(
        "Condition '{condition_id}' uses '{operator}' but still carries a value; emptiness checks take no value"
    )]
    StaleEmptinessValue {
        condition_id: String,
        operator: FilterOperator,
    },
}

/// Errors that can occur while selecting a branch for a runtime context.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("Block '{block_id}' uses raw '{language}' expressions, which cannot be evaluated here")]
    UnsupportedExpression { block_id: String, language: String },

    #[error("Condition '{condition_id}' in block '{block_id}' is missing a key or operator")]
    IncompleteCondition {
        block_id: String,
        condition_id: String,
    },

    #[error("Operator '{operator}' on key '{key}' needs a numeric value, but found '{found}'")]
    NotANumber {
        key: String,
        operator: FilterOperator,
        found: String,
    },
}
