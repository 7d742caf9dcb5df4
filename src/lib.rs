//! # Kiseki - Workflow Execution-Trace Reconstruction
//!
//! **Kiseki** turns the flat execution logs of a node-based workflow back into the
//! tree that actually ran, and models the branching conditions of `if/else`
//! nodes that decide which path that tree takes.
//!
//! ## Core Workflow
//!
//! 1.  **Load the graph**: Parse the workflow definition into a `WorkflowGraph` (or
//!     implement `IntoGraph` for your own format).
//! 2.  **Load the traces**: Parse the per-node execution records into `TraceRecord`s.
//! 3.  **Reconstruct**: Use `TreeBuilder::builder` to pick the mode and options, then
//!     call `build_forest`. Validation runs produce one flat entry per graph node;
//!     test and production runs are rebuilt from parent linkage, so parallel and
//!     nested branches show up as siblings and children.
//! 4.  **Render**: Walk the returned `Forest`, or print it with `TraceFormatter`.
//!
//! Branch conditions are edited through `ConditionEditor`, persisted as
//! `ConditionsInputValue` JSON, and can be checked against a runtime context with
//! `BranchSelector`.
//!
//! ## Quick Start
//!
//! ```rust
//! use kiseki::prelude::*;
//!
//! let graph = WorkflowGraph::from_json(r#"{
//!     "nodes": [
//!         { "id": "A", "type": "start",  "data": { "nodeName": "Start" } },
//!         { "id": "B", "type": "action", "data": { "nodeName": "Notify" } },
//!         { "id": "C", "type": "action", "data": { "nodeName": "Log" } }
//!     ],
//!     "edges": []
//! }"#)?;
//!
//! let traces = TraceRecord::list_from_json(r#"[
//!     { "node_id": "A", "message_id": "m1", "status": "SUCCESS" },
//!     { "node_id": "B", "message_id": "m1", "parent_trace_id": "A", "status": "SUCCESS" },
//!     { "node_id": "C", "message_id": "m1", "parent_trace_id": "A", "status": "ERROR" }
//! ]"#)?;
//!
//! let forest = TreeBuilder::builder(&graph, &traces)
//!     .mode(RunMode::Run)
//!     .build()
//!     .build_forest();
//!
//! assert_eq!(forest.roots.len(), 1);
//! assert_eq!(forest.roots[0].children.len(), 2);
//! println!("{}", TraceFormatter::format_forest(&forest));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod annotate;
pub mod builder;
pub mod condition;
pub mod error;
pub mod graph;
pub mod id;
pub mod mode;
pub mod prelude;
pub mod trace;
