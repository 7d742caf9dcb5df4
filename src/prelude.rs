//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the kiseki crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use kiseki::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let graph = WorkflowGraph::from_json(&std::fs::read_to_string("path/to/graph.json")?)?;
//! let traces = TraceRecord::list_from_json(&std::fs::read_to_string("path/to/traces.json")?)?;
//!
//! let forest = TreeBuilder::builder(&graph, &traces)
//!     .selector("test")
//!     .orphan_policy(OrphanPolicy::PromoteToRoot)
//!     .build()
//!     .build_forest();
//!
//! println!("{}", TraceFormatter::format_forest(&forest));
//! # Ok(())
//! # }
//! ```

// Reconstruction
pub use crate::annotate::{AnnotatedNode, NodeAnnotator};
pub use crate::builder::{Anomaly, Forest, MemoizedReconstruction, OrphanPolicy, TreeBuilder};
pub use crate::mode::{RunMode, Strategy};

// Inputs
pub use crate::graph::{GraphIndex, IntoGraph, Node, NodeKind, WorkflowGraph};
pub use crate::trace::{TraceFormatter, TraceIndex, TraceRecord, TraceStatus};

// Conditions
pub use crate::condition::{
    BranchSelection, BranchSelector, BranchTarget, ConditionEditor, ConditionOperand,
    ConditionsInputValue, Controlled, FilterOperator, LogicOperator,
};

// Identity
pub use crate::id::{IdGenerator, SequentialGenerator, UuidGenerator};

// Error types
pub use crate::error::{ConditionError, EvaluationError, GraphError, TraceError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
