use super::OrphanPolicy;
use super::forest::{Anomaly, Forest};
use crate::annotate::{AnnotatedNode, NodeAnnotator};
use crate::graph::{GraphIndex, WorkflowGraph};
use crate::trace::{TraceIndex, TraceRecord, composite_key};
use ahash::{AHashMap, AHashSet};

/// Rebuilds real parent/child branching from trace linkage.
///
/// Nodes live in an arena indexed by their position in the trace list; links
/// are resolved through composite keys, so input order is the only ordering
/// used. Children are appended in arrival order.
pub(super) fn build(
    graph: &WorkflowGraph,
    traces: &[TraceRecord],
    annotator: &NodeAnnotator<'_>,
    orphan_policy: OrphanPolicy,
) -> Forest {
    let nodes = GraphIndex::new(graph);
    let index = TraceIndex::linked(traces);

    let mut anomalies: Vec<Anomaly> = index
        .collisions()
        .iter()
        .map(|key| Anomaly::DuplicateKey { key: key.clone() })
        .collect();

    // Annotate every trace that survived key collisions and map it by key.
    let mut arena: Vec<Option<AnnotatedNode>> = Vec::with_capacity(traces.len());
    let mut slots: AHashMap<String, usize> = AHashMap::with_capacity(traces.len());
    for (position, trace) in traces.iter().enumerate() {
        let key = trace.composite_key();
        if index.position(&key) != Some(position) {
            arena.push(None);
            continue;
        }
        let annotated = annotator.annotate(nodes.lookup(&trace.node_id), Some(trace));
        if annotated.is_some() {
            slots.insert(key, position);
        } else {
            anomalies.push(Anomaly::UnknownNode {
                node_id: trace.node_id.clone(),
                message_id: trace.message_id.clone(),
            });
        }
        arena.push(annotated);
    }

    // Link in arrival order.
    let mut roots: Vec<usize> = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); traces.len()];
    for (position, trace) in traces.iter().enumerate() {
        let Some(node) = arena[position].as_mut() else {
            continue;
        };
        let Some(parent_id) = trace.parent_trace_id.as_ref() else {
            roots.push(position);
            continue;
        };
        let parent_key = composite_key(&trace.message_id, parent_id);
        match slots.get(&parent_key) {
            Some(&parent) => children[parent].push(position),
            None => {
                let promoted = orphan_policy == OrphanPolicy::PromoteToRoot;
                if promoted {
                    node.orphan = true;
                    roots.push(position);
                }
                anomalies.push(Anomaly::Orphan {
                    node_id: trace.node_id.clone(),
                    message_id: trace.message_id.clone(),
                    parent_trace_id: parent_id.clone(),
                    promoted,
                });
            }
        }
    }

    let roots = materialize(&roots, &mut arena, &children);

    // Anything still in the arena hangs off a parent cycle.
    let leftovers: Vec<usize> = (0..arena.len()).filter(|&p| arena[p].is_some()).collect();
    let on_cycle = cycle_members(&leftovers, &children);
    for position in leftovers {
        let trace = &traces[position];
        let node_id = trace.node_id.clone();
        let message_id = trace.message_id.clone();
        anomalies.push(if on_cycle.contains(&position) {
            Anomaly::Cycle {
                node_id,
                message_id,
            }
        } else {
            Anomaly::Unreachable {
                node_id,
                message_id,
            }
        });
    }

    Forest { roots, anomalies }
}

/// Moves the subtrees under `roots` out of the arena without recursing, so
/// parent chains of any length are safe.
fn materialize(
    roots: &[usize],
    arena: &mut [Option<AnnotatedNode>],
    children: &[Vec<usize>],
) -> Vec<AnnotatedNode> {
    // Every parent is listed before its descendants.
    let mut order = Vec::with_capacity(arena.len());
    let mut pending = roots.to_vec();
    while let Some(position) = pending.pop() {
        if arena[position].is_some() {
            order.push(position);
            pending.extend(&children[position]);
        }
    }

    let mut finished: AHashMap<usize, AnnotatedNode> = AHashMap::with_capacity(order.len());
    for &position in order.iter().rev() {
        let Some(mut node) = arena[position].take() else {
            continue;
        };
        node.children = children[position]
            .iter()
            .filter_map(|child| finished.remove(child))
            .collect();
        finished.insert(position, node);
    }

    roots
        .iter()
        .filter_map(|root| finished.remove(root))
        .collect()
}

/// Positions among `leftovers` that sit on a parent loop, as opposed to
/// hanging below one.
fn cycle_members(leftovers: &[usize], children: &[Vec<usize>]) -> AHashSet<usize> {
    let mut parent: AHashMap<usize, usize> = AHashMap::with_capacity(leftovers.len());
    for &position in leftovers {
        for &child in &children[position] {
            parent.insert(child, position);
        }
    }

    let mut seen: AHashMap<usize, usize> = AHashMap::with_capacity(leftovers.len());
    let mut members = AHashSet::new();
    for (walk, &start) in leftovers.iter().enumerate() {
        let mut position = start;
        let closing = loop {
            if let Some(&owner) = seen.get(&position) {
                break (owner == walk).then_some(position);
            }
            seen.insert(position, walk);
            match parent.get(&position) {
                Some(&next) => position = next,
                None => break None,
            }
        };

        // The walk ran into itself: everything from here around is the loop.
        if let Some(entry) = closing {
            let mut position = entry;
            while members.insert(position) {
                match parent.get(&position) {
                    Some(&next) => position = next,
                    None => break,
                }
            }
        }
    }
    members
}
