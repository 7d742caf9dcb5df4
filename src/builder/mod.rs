use crate::annotate::NodeAnnotator;
use crate::graph::WorkflowGraph;
use crate::id::{IdGenerator, UuidGenerator};
use crate::mode::{RunMode, Strategy};
use crate::trace::TraceRecord;
use tracing::{debug, warn};

mod flat;
mod forest;
mod linked;
pub mod memo;

pub use forest::{Anomaly, Forest};
pub use memo::MemoizedReconstruction;

/// What to do with a trace whose declared parent is not in the batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrphanPolicy {
    /// Leave it out of the tree. It is still listed in `Forest::anomalies`.
    #[default]
    Drop,
    /// Show it as an extra root, flagged with `orphan = true`.
    PromoteToRoot,
}

/// Reconstructs the execution forest for one graph and one batch of traces.
pub struct TreeBuilder<'a> {
    graph: &'a WorkflowGraph,
    traces: &'a [TraceRecord],
    strategy: Strategy,
    orphan_policy: OrphanPolicy,
    tokens: Box<dyn IdGenerator + 'a>,
}

pub struct TreeBuilderBuilder<'a> {
    graph: &'a WorkflowGraph,
    traces: &'a [TraceRecord],
    strategy: Strategy,
    orphan_policy: OrphanPolicy,
    tokens: Box<dyn IdGenerator + 'a>,
}

impl<'a> TreeBuilderBuilder<'a> {
    pub fn new(graph: &'a WorkflowGraph, traces: &'a [TraceRecord]) -> Self {
        Self {
            graph,
            traces,
            strategy: Strategy::Linked,
            orphan_policy: OrphanPolicy::default(),
            tokens: Box::new(UuidGenerator),
        }
    }

    pub fn mode(mut self, mode: RunMode) -> Self {
        self.strategy = mode.strategy();
        self
    }

    /// Same as [`mode`](Self::mode) but from the raw selector string sent by the
    /// log viewer. Unknown selectors fall back to the linked strategy.
    pub fn selector(mut self, selector: &str) -> Self {
        self.strategy = Strategy::from_selector(selector);
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn orphan_policy(mut self, policy: OrphanPolicy) -> Self {
        self.orphan_policy = policy;
        self
    }

    /// Replaces the render-token generator, e.g. with a sequential one in tests.
    pub fn id_generator(mut self, tokens: impl IdGenerator + 'a) -> Self {
        self.tokens = Box::new(tokens);
        self
    }

    pub fn build(self) -> TreeBuilder<'a> {
        TreeBuilder {
            graph: self.graph,
            traces: self.traces,
            strategy: self.strategy,
            orphan_policy: self.orphan_policy,
            tokens: self.tokens,
        }
    }
}

impl<'a> TreeBuilder<'a> {
    pub fn builder(graph: &'a WorkflowGraph, traces: &'a [TraceRecord]) -> TreeBuilderBuilder<'a> {
        TreeBuilderBuilder::new(graph, traces)
    }

    /// Runs the reconstruction. Never fails: records that cannot be placed are
    /// reported on the returned forest instead.
    pub fn build_forest(&self) -> Forest {
        let annotator = NodeAnnotator::new(&*self.tokens);
        let forest = match self.strategy {
            Strategy::Flat => flat::build(self.graph, self.traces, &annotator),
            Strategy::Linked => {
                linked::build(self.graph, self.traces, &annotator, self.orphan_policy)
            }
        };

        for anomaly in &forest.anomalies {
            if anomaly.is_placed() {
                warn!(%anomaly, "orphaned trace record shown as a root");
            } else {
                warn!(%anomaly, "trace record left out of the execution tree");
            }
        }
        debug!(
            strategy = ?self.strategy,
            graph_nodes = self.graph.nodes.len(),
            traces = self.traces.len(),
            roots = forest.roots.len(),
            placed = forest.len(),
            anomalies = forest.anomalies.len(),
            "reconstructed execution forest"
        );
        forest
    }
}
