use crate::graph::NodeKind;
use crate::trace::TraceStatus;
use serde::{Deserialize, Serialize};

/// A graph node merged with the trace record that executed it, ready to render.
///
/// `token` is a render-only identity, regenerated on every reconstruction. It
/// is never used to match traces; use `node_id` and composite keys for that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedNode {
    pub token: String,
    pub node_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TraceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Set when the node was promoted to a root because its parent was missing.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub orphan: bool,
    #[serde(default)]
    pub children: Vec<AnnotatedNode>,
}

impl AnnotatedNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        self.walk().count()
    }

    /// Pre-order walk over this subtree.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Compares two subtrees while ignoring render tokens.
    pub fn same_shape(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if !a.same_fields(b) || a.children.len() != b.children.len() {
                return false;
            }
            pending.extend(a.children.iter().zip(&b.children));
        }
        true
    }

    fn same_fields(&self, other: &Self) -> bool {
        self.node_id == other.node_id
            && self.name == other.name
            && self.kind == other.kind
            && self.status == other.status
            && self.start_time == other.start_time
            && self.time_cost == other.time_cost
            && self.input == other.input
            && self.output == other.output
            && self.error_message == other.error_message
            && self.orphan == other.orphan
    }
}

// Long parent chains nest deeply; unlink children before the default drop runs.
impl Drop for AnnotatedNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Pre-order iterator returned by [`AnnotatedNode::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a AnnotatedNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a AnnotatedNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
