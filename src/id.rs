use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of fresh opaque identifiers.
///
/// Used for render tokens on annotated nodes and for new condition/block ids.
/// Production code uses [`UuidGenerator`]; tests inject [`SequentialGenerator`]
/// to get deterministic output.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Monotonic ids of the form `{prefix}{n}`, starting at 1.
#[derive(Debug)]
pub struct SequentialGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialGenerator {
    fn default() -> Self {
        Self::new("id-")
    }
}

impl IdGenerator for SequentialGenerator {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.prefix, n)
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for &G {
    fn generate(&self) -> String {
        (**self).generate()
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn generate(&self) -> String {
        (**self).generate()
    }
}
