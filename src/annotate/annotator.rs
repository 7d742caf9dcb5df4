use super::node::AnnotatedNode;
use crate::graph::Node;
use crate::id::IdGenerator;
use crate::trace::TraceRecord;

/// Merges graph nodes with their trace records.
pub struct NodeAnnotator<'g> {
    tokens: &'g dyn IdGenerator,
}

impl<'g> NodeAnnotator<'g> {
    pub fn new(tokens: &'g dyn IdGenerator) -> Self {
        Self { tokens }
    }

    /// Builds an annotated node, or `None` when the graph node is unknown.
    ///
    /// Missing metadata never fails: the name falls back to `""` and payloads
    /// that are not valid JSON are passed through as-is.
    pub fn annotate(
        &self,
        node: Option<&Node>,
        trace: Option<&TraceRecord>,
    ) -> Option<AnnotatedNode> {
        let node = node?;
        Some(AnnotatedNode {
            token: self.tokens.generate(),
            node_id: node.id.clone(),
            name: node.data.node_name.clone().unwrap_or_default(),
            kind: node.kind.clone(),
            status: trace.map(|t| t.status),
            start_time: trace.and_then(|t| t.start_time),
            time_cost: trace.and_then(|t| t.time_cost),
            input: trace.and_then(|t| t.input.as_deref()).map(pretty_json),
            output: trace.and_then(|t| t.output.as_deref()).map(pretty_json),
            error_message: trace.and_then(|t| t.error_message.clone()),
            orphan: false,
            children: Vec::new(),
        })
    }
}

/// Re-indents a JSON document with two spaces. Anything that does not parse
/// is returned unchanged.
pub fn pretty_json(raw: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
        return raw.to_string();
    };
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.to_string())
}
