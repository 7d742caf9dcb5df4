use super::definition::{Node, WorkflowGraph};
use ahash::AHashMap;

/// O(1) lookup of graph nodes by id.
///
/// Borrowing the graph keeps the index cheap to build per reconstruction. If
/// two nodes share an id, the later one wins.
#[derive(Debug)]
pub struct GraphIndex<'a> {
    nodes: AHashMap<&'a str, &'a Node>,
}

impl<'a> GraphIndex<'a> {
    pub fn new(graph: &'a WorkflowGraph) -> Self {
        let nodes = graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
        Self { nodes }
    }

    pub fn lookup(&self, id: &str) -> Option<&'a Node> {
        self.nodes.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
