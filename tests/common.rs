//! Common test utilities for building graphs, traces and condition values.
use kiseki::prelude::*;
use serde_json::json;

/// Three nodes `A`, `B`, `C` in graph order.
#[allow(dead_code)]
pub fn create_abc_graph() -> WorkflowGraph {
    serde_json::from_value(json!({
        "nodes": [
            { "id": "A", "type": "start", "data": { "nodeName": "Start" } },
            { "id": "B", "type": "action", "data": { "nodeName": "Notify" } },
            { "id": "C", "type": "action", "data": { "nodeName": "Log" } }
        ],
        "edges": [
            { "source": "A", "target": "B" },
            { "source": "A", "target": "C" }
        ]
    }))
    .expect("valid graph fixture")
}

/// `A` is the root of run `m1`; `B` and `C` both ran as branches of `A`.
#[allow(dead_code)]
pub fn create_branching_traces() -> Vec<TraceRecord> {
    serde_json::from_value(json!([
        { "node_id": "A", "message_id": "m1", "status": "SUCCESS" },
        { "node_id": "B", "message_id": "m1", "parent_trace_id": "A", "status": "SUCCESS" },
        { "node_id": "C", "message_id": "m1", "parent_trace_id": "A", "status": "ERROR" }
    ]))
    .expect("valid trace fixture")
}

/// A deeper graph: `start -> ifelse -> (notify | alarm -> log)`.
#[allow(dead_code)]
pub fn create_nested_graph() -> WorkflowGraph {
    WorkflowGraph {
        nodes: vec![
            Node::new("start", "start").with_name("Start"),
            Node::new("ifelse", "ifElse").with_name("Check temperature"),
            Node::new("notify", "action").with_name("Notify"),
            Node::new("alarm", "action").with_name("Alarm"),
            Node::new("log", "action").with_name("Log"),
        ],
        edges: vec![],
    }
}

#[allow(dead_code)]
pub fn trace(node_id: &str, message_id: &str, parent: Option<&str>) -> TraceRecord {
    let record = TraceRecord::new(node_id, message_id, TraceStatus::Success);
    match parent {
        Some(p) => record.with_parent(p),
        None => record,
    }
}

/// Deterministic token/id generator for structural comparisons.
#[allow(dead_code)]
pub fn tokens() -> SequentialGenerator {
    SequentialGenerator::new("t")
}

/// Node ids of a forest's roots, in order.
#[allow(dead_code)]
pub fn root_ids(forest: &Forest) -> Vec<&str> {
    forest.roots.iter().map(|n| n.node_id.as_str()).collect()
}

/// Node ids of a node's children, in order.
#[allow(dead_code)]
pub fn child_ids(node: &AnnotatedNode) -> Vec<&str> {
    node.children.iter().map(|n| n.node_id.as_str()).collect()
}
