use crate::error::TraceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal outcome of one node execution. Reconstruction only ever sees
/// completed runs, so there is no pending state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TraceStatus {
    Success,
    Error,
}

impl fmt::Display for TraceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceStatus::Success => write!(f, "SUCCESS"),
            TraceStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// One recorded execution of a single workflow node.
///
/// Field names follow the snake_case wire format of the log API. `input` and
/// `output` are JSON documents encoded as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub node_id: String,
    pub message_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_cost: Option<f64>,
    pub status: TraceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl TraceRecord {
    pub fn new(
        node_id: impl Into<String>,
        message_id: impl Into<String>,
        status: TraceStatus,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            message_id: message_id.into(),
            parent_trace_id: None,
            start_time: None,
            time_cost: None,
            status,
            input: None,
            output: None,
            error_message: None,
        }
    }

    pub fn with_parent(mut self, parent_trace_id: impl Into<String>) -> Self {
        self.parent_trace_id = Some(parent_trace_id.into());
        self
    }

    /// Parses a JSON array of trace records.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, TraceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// `"{message_id}-{node_id}"`: identifies one executed instance of a node
    /// within one run.
    pub fn composite_key(&self) -> String {
        composite_key(&self.message_id, &self.node_id)
    }

    /// The composite key under which this record's parent is expected, if it
    /// declares one.
    pub fn parent_key(&self) -> Option<String> {
        self.parent_trace_id
            .as_deref()
            .map(|parent| composite_key(&self.message_id, parent))
    }

    pub fn is_root(&self) -> bool {
        self.parent_trace_id.is_none()
    }
}

pub fn composite_key(message_id: &str, node_id: &str) -> String {
    format!("{}-{}", message_id, node_id)
}
