//! Identifier generation for newly created nodes.
//!
//! The mutation engine never mints ids; callers draw one from an
//! [`IdGenerator`] before building the node they insert.

use compact_str::{CompactString, format_compact};

use crate::model::node::NodeId;

/// Default length of random ids. 64-symbol alphabet, so 10 symbols give
/// 60 bits of entropy.
pub const DEFAULT_ID_LENGTH: usize = 10;

/// Source of fresh node identifiers.
pub trait IdGenerator {
    fn next_id(&mut self) -> NodeId;
}

/// Random url-safe ids from `nanoid`.
#[derive(Debug, Clone, Copy)]
pub struct NanoIdGenerator {
    length: usize,
}

impl NanoIdGenerator {
    #[must_use]
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }

    #[inline]
    pub const fn length(&self) -> usize {
        self.length
    }
}

impl Default for NanoIdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_LENGTH)
    }
}

impl IdGenerator for NanoIdGenerator {
    fn next_id(&mut self) -> NodeId {
        let length = self.length;
        NodeId::from(nanoid::nanoid!(length))
    }
}

/// Monotonic `prefix-N` ids. Deterministic, for tests and demos.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: CompactString,
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<CompactString>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Start counting from `next` instead of 1.
    #[must_use]
    pub fn starting_at(mut self, next: u64) -> Self {
        self.next = next;
        self
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("node")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> NodeId {
        let id = format_compact!("{}-{}", self.prefix, self.next);
        self.next += 1;
        NodeId::from(id)
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for &mut G {
    fn next_id(&mut self) -> NodeId {
        (**self).next_id()
    }
}
