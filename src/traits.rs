/*!
 * Lock Traits
 *
 * Core abstractions at the two seams of the crate: the raw shared-exclusive
 * primitive underneath both locks, and the uniform acquire/release session
 * interface on top of them.
 */

/// Raw shared-exclusive primitive (single writer XOR many readers).
///
/// This is the basic lock both `FairLock` and `RecursiveLock` are built on.
/// It is non-recursive and makes no fairness guarantee of its own; those
/// properties are layered on by the lock types in this crate.
///
/// # Implementation Notes
///
/// Every `release_*` call must pair with a successful acquisition in the
/// same mode. Implementations are not required to detect mismatched pairs.
pub trait RawShared: Send + Sync {
    /// Block until shared access is granted.
    fn acquire_shared(&self);

    /// Attempt shared access without blocking.
    fn try_acquire_shared(&self) -> bool;

    /// Release shared access previously acquired by this thread.
    fn release_shared(&self);

    /// Block until exclusive access is granted.
    fn acquire_exclusive(&self);

    /// Attempt exclusive access without blocking.
    fn try_acquire_exclusive(&self) -> bool;

    /// Release exclusive access previously acquired by this thread.
    fn release_exclusive(&self);
}

/// Uniform shared/exclusive session interface over both lock types.
///
/// `start_*` returns whether a matching `end_*` call is owed: `FairLock`
/// returns `false` when the calling thread already holds access and the call
/// acquired nothing new, while `RecursiveLock` always performs a (possibly
/// purely thread-local) acquisition and always returns `true`.
pub trait RwAccess {
    /// Acquire shared access, blocking if necessary.
    fn start_read(&self) -> bool;

    /// Release shared access.
    fn end_read(&self);

    /// Acquire exclusive access, blocking if necessary.
    fn start_write(&self) -> bool;

    /// Release exclusive access.
    fn end_write(&self);
}
