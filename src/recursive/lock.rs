/*!
 * Recursion-Aware Shared/Exclusive Lock
 *
 * Lets one thread nest acquisitions of the same instance without
 * deadlocking itself. Only the outermost acquisition per thread touches the
 * raw primitive; nested calls are resolved from the thread-local counter.
 */

use super::counter;
use super::slot::Slot;
use crate::raw::DefaultRaw;
use crate::traits::{RawShared, RwAccess};

/// Recursive shared/exclusive lock.
///
/// Every instance claims a process-unique slot at construction; each thread
/// keeps a local counter per slot recording its current session (mode and
/// nesting depth). Threads that do not hold the instance observe ordinary
/// shared/exclusive semantics through the raw primitive; the recursion layer
/// is a pure thread-local bypass with no cross-thread ordering implications.
///
/// A thread holding only shared access must not call `lock`/`try_lock`:
/// upgrades are not supported, and the precondition is checked by a
/// debug-time assertion only.
///
/// # Examples
///
/// ```
/// use rwsync::RecursiveLock;
///
/// let lock = RecursiveLock::new();
/// lock.lock();
/// lock.lock(); // nested, resolved locally
/// lock.unlock();
/// lock.unlock(); // depth back to zero releases the raw lock
/// ```
pub struct RecursiveLock<R: RawShared = DefaultRaw> {
    raw: R,
    slot: Slot,
}

impl RecursiveLock<DefaultRaw> {
    /// Create an unowned lock over the default raw primitive
    pub fn new() -> Self {
        Self::with_raw(DefaultRaw::new())
    }
}

impl Default for RecursiveLock<DefaultRaw> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RawShared> RecursiveLock<R> {
    /// Create an unowned lock over a caller-supplied raw primitive
    pub fn with_raw(raw: R) -> Self {
        Self {
            raw,
            slot: Slot::next(),
        }
    }

    /// Acquire exclusive access, blocking only on the outermost call
    pub fn lock(&self) {
        let held = counter::held(self.slot);
        debug_assert!(
            held.is_clear() || held.exclusive(),
            "shared access cannot be upgraded to exclusive"
        );

        if held.is_clear() {
            self.raw.acquire_exclusive();
        }

        counter::record(self.slot, held.enter_exclusive());
    }

    /// Attempt exclusive access without blocking.
    ///
    /// Nested attempts inside a session this thread already owns always
    /// succeed; a failed outermost attempt leaves no thread-local entry
    /// behind.
    pub fn try_lock(&self) -> bool {
        let held = counter::held(self.slot);
        debug_assert!(
            held.is_clear() || held.exclusive(),
            "shared access cannot be upgraded to exclusive"
        );

        if held.is_clear() && !self.raw.try_acquire_exclusive() {
            return false;
        }

        counter::record(self.slot, held.enter_exclusive());
        true
    }

    /// Release one level of exclusive access; depth reaching zero releases
    /// the raw lock and erases the thread's entry
    pub fn unlock(&self) {
        let held = counter::held(self.slot);
        debug_assert!(held.depth() > 0, "unlock without a matching lock");

        let next = held.leave();
        if next.depth() == 0 {
            self.raw.release_exclusive();
            counter::erase(self.slot);
        } else {
            counter::record(self.slot, next);
        }
    }

    /// Acquire shared access, blocking only on the outermost call
    pub fn lock_shared(&self) {
        let held = counter::held(self.slot);

        if held.is_clear() {
            self.raw.acquire_shared();
        }

        counter::record(self.slot, held.enter_shared());
    }

    /// Attempt shared access without blocking; same entry semantics as
    /// `try_lock`
    pub fn try_lock_shared(&self) -> bool {
        let held = counter::held(self.slot);

        if held.is_clear() && !self.raw.try_acquire_shared() {
            return false;
        }

        counter::record(self.slot, held.enter_shared());
        true
    }

    /// Release one level of shared access; depth reaching zero releases the
    /// raw lock and erases the thread's entry
    pub fn unlock_shared(&self) {
        let held = counter::held(self.slot);
        debug_assert!(held.depth() > 0, "unlock_shared without a matching lock_shared");

        let next = held.leave();
        if next.depth() == 0 {
            self.raw.release_shared();
            counter::erase(self.slot);
        } else {
            counter::record(self.slot, next);
        }
    }
}

/// Session adapters. Unlike `FairLock`, every call performs a real (possibly
/// purely thread-local) acquisition, so all of them return `true`.
impl<R: RawShared> RwAccess for RecursiveLock<R> {
    fn start_read(&self) -> bool {
        self.lock_shared();
        true
    }

    fn end_read(&self) {
        self.unlock_shared();
    }

    fn start_write(&self) -> bool {
        self.lock();
        true
    }

    fn end_write(&self) {
        self.unlock();
    }
}
