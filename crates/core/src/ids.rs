//! Product identifier allocation
//!
//! Identifiers come from a monotonic counter that is stored with the catalog, so two
//! products created in the same instant still receive distinct ids.

use crate::products::ProductId;

/// Monotonic product identifier sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    /// Sequence whose next allocation is `next`. Zero is bumped to one.
    pub const fn starting_at(next: u64) -> Self {
        Self {
            next: if next == 0 { 1 } else { next },
        }
    }

    /// Sequence that continues after the largest of `ids`.
    pub fn resume_after(ids: impl IntoIterator<Item = ProductId>) -> Self {
        let mut sequence = Self::default();

        for id in ids {
            sequence.observe(id);
        }

        sequence
    }

    /// The value the next allocation will return.
    pub const fn peek(&self) -> u64 {
        self.next
    }

    /// Allocates the next identifier.
    pub fn allocate(&mut self) -> ProductId {
        let id = ProductId::new(self.next);

        self.next = self.next.saturating_add(1);

        id
    }

    /// Moves the sequence past `id` if it would otherwise be handed out again.
    pub fn observe(&mut self, id: ProductId) {
        if id.get() >= self.next {
            self.next = id.get().saturating_add(1);
        }
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_are_strictly_increasing() {
        let mut ids = IdSequence::default();

        let first = ids.allocate();
        let second = ids.allocate();

        assert_eq!(first, ProductId::new(1));
        assert_eq!(second, ProductId::new(2));
        assert_eq!(ids.peek(), 3);
    }

    #[test]
    fn resume_after_skips_past_largest_id() {
        let ids = IdSequence::resume_after([
            ProductId::new(1_700_000_000_123),
            ProductId::new(4),
            ProductId::new(1_700_000_000_000),
        ]);

        assert_eq!(ids.peek(), 1_700_000_000_124);
    }

    #[test]
    fn resume_after_nothing_starts_at_one() {
        assert_eq!(IdSequence::resume_after([]).peek(), 1);
    }

    #[test]
    fn observe_never_moves_backwards() {
        let mut ids = IdSequence::starting_at(50);

        ids.observe(ProductId::new(10));

        assert_eq!(ids.peek(), 50);
    }

    #[test]
    fn zero_start_is_bumped() {
        assert_eq!(IdSequence::starting_at(0).peek(), 1);
    }
}
