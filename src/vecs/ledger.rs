//! Mutation bookkeeping that lets cursors notice, after the fact, that their
//! parent changed shape.
//!
//! Two counters are kept. `generation` moves on every structural change
//! (push, pop, clear, copy/move assignment). `reallocations` moves only when
//! the backing block is replaced, and always together with `generation`.

use crate::error::Severity;

/// Kind of structural change being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Size or layout changed inside the same block.
    Reshape,
    /// The backing block was replaced.
    Relocate,
}

/// Counters read by a cursor at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LedgerSnapshot {
    generation: u64,
    reallocations: u64,
}

/// Live generation and reallocation counters of one sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationLedger {
    generation: u64,
    reallocations: u64,
}

impl MutationLedger {
    pub const fn new() -> Self {
        Self {
            generation: 0,
            reallocations: 0,
        }
    }

    #[inline(always)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline(always)]
    pub fn reallocations(&self) -> u64 {
        self.reallocations
    }

    #[inline(always)]
    pub fn record(&mut self, mutation: Mutation) {
        self.generation += 1;
        if mutation == Mutation::Relocate {
            self.reallocations += 1;
        }
    }

    #[inline(always)]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            generation: self.generation,
            reallocations: self.reallocations,
        }
    }

    /// Classifies a snapshot taken earlier against the live counters.
    ///
    /// Returns `None` while nothing has changed. Otherwise a replaced block
    /// wins over everything else, then a position that fell out of a range it
    /// used to be inside, and anything left over is mild.
    pub fn classify(
        &self,
        snapshot: &LedgerSnapshot,
        position: isize,
        was_in_bounds: bool,
        len: usize,
    ) -> Option<Severity> {
        if snapshot.generation == self.generation {
            return None;
        }
        if snapshot.reallocations != self.reallocations {
            return Some(Severity::Moderate);
        }
        if was_in_bounds && !in_range(position, len) {
            return Some(Severity::Severe);
        }
        Some(Severity::Mild)
    }
}

/// `true` when `position` lies in `[0, len)`.
#[inline(always)]
pub fn in_range(position: isize, len: usize) -> bool {
    position >= 0 && (position as usize) < len
}
