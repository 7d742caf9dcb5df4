use super::forest::{Anomaly, Forest};
use crate::annotate::NodeAnnotator;
use crate::graph::{GraphIndex, WorkflowGraph};
use crate::trace::{TraceIndex, TraceRecord};

/// One root per graph node, in graph order. Validation runs never branch, so
/// trace linkage is ignored and every root is a leaf.
pub(super) fn build(
    graph: &WorkflowGraph,
    traces: &[TraceRecord],
    annotator: &NodeAnnotator<'_>,
) -> Forest {
    let index = TraceIndex::flat(traces);
    let nodes = GraphIndex::new(graph);

    let roots = graph
        .nodes
        .iter()
        .filter_map(|node| annotator.annotate(Some(node), index.get(&node.id)))
        .collect();

    let mut anomalies: Vec<Anomaly> = index
        .collisions()
        .iter()
        .map(|key| Anomaly::DuplicateKey { key: key.clone() })
        .collect();
    anomalies.extend(
        traces
            .iter()
            .filter(|t| nodes.lookup(&t.node_id).is_none())
            .map(|t| Anomaly::UnknownNode {
                node_id: t.node_id.clone(),
                message_id: t.message_id.clone(),
            }),
    );

    Forest { roots, anomalies }
}
