use super::definition::WorkflowGraph;
use crate::error::GraphError;

/// A trait for custom graph formats that can be converted into a `WorkflowGraph`.
///
/// Editors that store their graph in a different shape implement this to feed
/// the reconstruction engine without going through the JSON wire format.
///
/// # Example
///
/// ```rust
/// use kiseki::error::GraphError;
/// use kiseki::graph::{IntoGraph, Node, WorkflowGraph};
///
/// struct Canvas {
///     boxes: Vec<(String, String, String)>, // (id, kind, label)
/// }
///
/// impl IntoGraph for Canvas {
///     fn into_graph(self) -> Result<WorkflowGraph, GraphError> {
///         let nodes = self
///             .boxes
///             .into_iter()
///             .map(|(id, kind, label)| Node::new(id, kind).with_name(label))
///             .collect();
///         Ok(WorkflowGraph { nodes, edges: vec![] })
///     }
/// }
///
/// let canvas = Canvas { boxes: vec![("a".into(), "start".into(), "Start".into())] };
/// let graph = canvas.into_graph().unwrap();
/// assert_eq!(graph.nodes.len(), 1);
/// ```
pub trait IntoGraph {
    /// Consumes the object and converts it into a workflow graph.
    fn into_graph(self) -> Result<WorkflowGraph, GraphError>;
}

impl IntoGraph for WorkflowGraph {
    fn into_graph(self) -> Result<WorkflowGraph, GraphError> {
        Ok(self)
    }
}

impl IntoGraph for serde_json::Value {
    fn into_graph(self) -> Result<WorkflowGraph, GraphError> {
        Ok(serde_json::from_value(self)?)
    }
}
