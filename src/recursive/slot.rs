/*!
 * Slot Allocation
 *
 * Process-wide identifiers for `RecursiveLock` instances, used as keys in
 * each thread's local access map
 */

use std::sync::atomic::{AtomicU32, Ordering};

/// What the slot will be for the next constructed lock instance. Slots are
/// monotonically increasing and never reused.
static NEXT_SLOT: AtomicU32 = AtomicU32::new(0);

/// Unique integer identity of one `RecursiveLock` instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Slot(u32);

impl Slot {
    /// Claim the next slot. The allocator is the only cross-thread state in
    /// the recursion layer, so a relaxed increment is all it needs.
    pub(crate) fn next() -> Self {
        Slot(NEXT_SLOT.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_unique_and_increasing() {
        let a = Slot::next();
        let b = Slot::next();
        let c = Slot::next();

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert!(a.0 < b.0 && b.0 < c.0);
    }
}
