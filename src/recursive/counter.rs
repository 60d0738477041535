/*!
 * Per-Thread Access Counters
 *
 * Packed recursion bookkeeping: one counter per (thread, slot), holding the
 * session mode in the top bit and the nesting depth in the remaining bits,
 * plus the thread-local map the counters live in.
 */

use super::slot::Slot;
use ahash::RandomState;
use std::cell::RefCell;
use std::collections::HashMap;

/// Packed per-thread access record for one lock instance.
///
/// Top bit: set while the thread's current recursive session is exclusive.
/// Remaining 31 bits: nesting depth. Depth has no overflow check; nesting
/// past `2^31 - 1` corrupts into the mode bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct AccessCounter(u32);

impl AccessCounter {
    const WRITE_BIT: u32 = 1 << 31;
    const DEPTH_MASK: u32 = Self::WRITE_BIT - 1;

    /// Whether this thread holds nothing on the slot
    #[inline(always)]
    pub(crate) fn is_clear(self) -> bool {
        self.0 == 0
    }

    /// Whether the current session is exclusive
    #[inline(always)]
    pub(crate) fn exclusive(self) -> bool {
        self.0 & Self::WRITE_BIT != 0
    }

    /// Nesting depth of the current session
    #[inline(always)]
    pub(crate) fn depth(self) -> u32 {
        self.0 & Self::DEPTH_MASK
    }

    /// One more nested exclusive acquisition
    #[inline(always)]
    pub(crate) fn enter_exclusive(self) -> Self {
        Self((self.0 + 1) | Self::WRITE_BIT)
    }

    /// One more nested shared acquisition. The mode bit is left untouched:
    /// a shared re-entry inside an exclusive session stays exclusive.
    #[inline(always)]
    pub(crate) fn enter_shared(self) -> Self {
        Self(self.0 + 1)
    }

    /// One nested release in either mode
    #[inline(always)]
    pub(crate) fn leave(self) -> Self {
        Self(self.0 - 1)
    }
}

thread_local! {
    /// Access counters of the current thread, one per held lock instance.
    /// Entries exist only while genuinely held; absence is the canonical
    /// "not held" signal.
    static ACCESS_BY_SLOT: RefCell<HashMap<Slot, AccessCounter, RandomState>> =
        RefCell::new(HashMap::default());
}

/// Current thread's counter for a slot (clear if absent)
pub(crate) fn held(slot: Slot) -> AccessCounter {
    ACCESS_BY_SLOT.with(|map| map.borrow().get(&slot).copied().unwrap_or_default())
}

/// Store the current thread's counter for a slot
pub(crate) fn record(slot: Slot, counter: AccessCounter) {
    ACCESS_BY_SLOT.with(|map| {
        map.borrow_mut().insert(slot, counter);
    });
}

/// Drop the current thread's entry for a slot, restoring the "not held"
/// signal
pub(crate) fn erase(slot: Slot) {
    ACCESS_BY_SLOT.with(|map| {
        map.borrow_mut().remove(&slot);
    });
}
