/*!
 * Default Raw Lock
 *
 * parking_lot-backed implementation of the `RawShared` primitive
 */

use crate::traits::RawShared;
use parking_lot::lock_api::RawRwLock as _;
use parking_lot::RawRwLock;

/// Default shared-exclusive primitive, backed by `parking_lot::RawRwLock`.
///
/// Word-sized and statically constructible. Like the trait it implements,
/// it is non-recursive: a thread that re-acquires while already holding
/// deadlocks (shared re-acquisition may also deadlock once writers wait).
pub struct DefaultRaw {
    inner: RawRwLock,
}

impl DefaultRaw {
    /// Create an unlocked raw lock
    pub const fn new() -> Self {
        Self {
            inner: RawRwLock::INIT,
        }
    }
}

impl Default for DefaultRaw {
    fn default() -> Self {
        Self::new()
    }
}

impl RawShared for DefaultRaw {
    #[inline]
    fn acquire_shared(&self) {
        self.inner.lock_shared();
    }

    #[inline]
    fn try_acquire_shared(&self) -> bool {
        self.inner.try_lock_shared()
    }

    #[inline]
    fn release_shared(&self) {
        // Safety: the RawShared contract pairs this call with a successful
        // shared acquisition on the same instance.
        unsafe { self.inner.unlock_shared() }
    }

    #[inline]
    fn acquire_exclusive(&self) {
        self.inner.lock_exclusive();
    }

    #[inline]
    fn try_acquire_exclusive(&self) -> bool {
        self.inner.try_lock_exclusive()
    }

    #[inline]
    fn release_exclusive(&self) {
        // Safety: paired with a successful exclusive acquisition.
        unsafe { self.inner.unlock_exclusive() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusive_excludes_shared() {
        let raw = DefaultRaw::new();

        assert!(raw.try_acquire_exclusive());
        assert!(!raw.try_acquire_shared());
        assert!(!raw.try_acquire_exclusive());

        raw.release_exclusive();
        assert!(raw.try_acquire_shared());
        raw.release_shared();
    }

    #[test]
    fn test_shared_allows_shared() {
        let raw = DefaultRaw::new();

        assert!(raw.try_acquire_shared());
        assert!(raw.try_acquire_shared());
        assert!(!raw.try_acquire_exclusive());

        raw.release_shared();
        assert!(!raw.try_acquire_exclusive());
        raw.release_shared();
        assert!(raw.try_acquire_exclusive());
        raw.release_exclusive();
    }
}
