use super::record::TraceRecord;
use crate::mode::Strategy;
use ahash::AHashMap;

/// Keyed lookup over a flat trace list.
///
/// The key scheme depends on the strategy: flat (validation) traces are keyed
/// by `node_id`, linked (execution) traces by their composite key. On
/// collisions the record that comes later in the input wins.
#[derive(Debug)]
pub struct TraceIndex<'a> {
    strategy: Strategy,
    records: AHashMap<String, (usize, &'a TraceRecord)>,
    collisions: Vec<String>,
}

impl<'a> TraceIndex<'a> {
    pub fn new(strategy: Strategy, traces: &'a [TraceRecord]) -> Self {
        let mut records = AHashMap::with_capacity(traces.len());
        let mut collisions = Vec::new();
        for (position, trace) in traces.iter().enumerate() {
            let key = Self::key_for(strategy, trace);
            if records.insert(key.clone(), (position, trace)).is_some() {
                collisions.push(key);
            }
        }
        Self {
            strategy,
            records,
            collisions,
        }
    }

    pub fn flat(traces: &'a [TraceRecord]) -> Self {
        Self::new(Strategy::Flat, traces)
    }

    pub fn linked(traces: &'a [TraceRecord]) -> Self {
        Self::new(Strategy::Linked, traces)
    }

    fn key_for(strategy: Strategy, trace: &TraceRecord) -> String {
        match strategy {
            Strategy::Flat => trace.node_id.clone(),
            Strategy::Linked => trace.composite_key(),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn get(&self, key: &str) -> Option<&'a TraceRecord> {
        self.records.get(key).map(|(_, trace)| *trace)
    }

    /// Position in the input list of the record that won `key`.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.records.get(key).map(|(position, _)| *position)
    }

    /// Keys that were written more than once, in the order the overwrites happened.
    pub fn collisions(&self) -> &[String] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
