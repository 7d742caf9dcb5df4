use crate::annotate::AnnotatedNode;
use serde::Serialize;
use std::fmt;

/// The reconstructed execution tree: a list of roots plus every record that
/// could not be placed in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Forest {
    pub roots: Vec<AnnotatedNode>,
    pub anomalies: Vec<Anomaly>,
}

impl Forest {
    /// Total number of nodes across all roots.
    pub fn len(&self) -> usize {
        self.roots.iter().map(AnnotatedNode::subtree_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Pre-order walk over every node of every root.
    pub fn iter(&self) -> impl Iterator<Item = &AnnotatedNode> {
        self.roots.iter().flat_map(|root| root.walk())
    }

    /// All placed nodes built from `node_id`, in pre-order.
    pub fn find_all<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a AnnotatedNode> {
        self.iter().filter(move |n| n.node_id == node_id)
    }

    /// Structural equality, ignoring render tokens.
    pub fn same_shape(&self, other: &Self) -> bool {
        self.anomalies == other.anomalies
            && self.roots.len() == other.roots.len()
            && self
                .roots
                .iter()
                .zip(&other.roots)
                .all(|(a, b)| a.same_shape(b))
    }
}

/// A trace record that was left out of the forest, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Anomaly {
    /// The trace names a node that is not part of the graph.
    #[serde(rename_all = "camelCase")]
    UnknownNode { node_id: String, message_id: String },
    /// The trace declares a parent that is not in this batch.
    #[serde(rename_all = "camelCase")]
    Orphan {
        node_id: String,
        message_id: String,
        parent_trace_id: String,
        promoted: bool,
    },
    /// Several traces shared one key; only the last was kept.
    DuplicateKey { key: String },
    /// The trace's parent chain loops back on itself and never reaches a root.
    #[serde(rename_all = "camelCase")]
    Cycle { node_id: String, message_id: String },
    /// The trace is not on a loop itself but hangs below one.
    #[serde(rename_all = "camelCase")]
    Unreachable { node_id: String, message_id: String },
}

impl Anomaly {
    /// Whether the record still made it into the forest, as a promoted orphan.
    pub fn is_placed(&self) -> bool {
        matches!(self, Anomaly::Orphan { promoted: true, .. })
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::UnknownNode {
                node_id,
                message_id,
            } => write!(f, "trace {}-{} references an unknown node", message_id, node_id),
            Anomaly::Orphan {
                node_id,
                message_id,
                parent_trace_id,
                promoted,
            } => {
                write!(
                    f,
                    "trace {}-{} has no parent '{}'",
                    message_id, node_id, parent_trace_id
                )?;
                if *promoted {
                    write!(f, " (shown as root)")?;
                }
                Ok(())
            }
            Anomaly::DuplicateKey { key } => write!(f, "duplicate trace key '{}'", key),
            Anomaly::Cycle {
                node_id,
                message_id,
            } => write!(f, "trace {}-{} is part of a parent cycle", message_id, node_id),
            Anomaly::Unreachable {
                node_id,
                message_id,
            } => write!(
                f,
                "trace {}-{} only hangs below a parent cycle",
                message_id, node_id
            ),
        }
    }
}
