/*!
 * Queue-Fair Reader-Writer Lock
 *
 * Wraps the raw shared-exclusive primitive with an explicit FIFO wait queue
 * and per-instance reader/writer bookkeeping. Once any request is queued, no
 * later-arriving request can jump ahead of it.
 */

use super::queue::{RequestKind, WaitCell, WaitQueue};
use crate::raw::DefaultRaw;
use crate::traits::{RawShared, RwAccess};
use ahash::RandomState;
use parking_lot::{Mutex, MutexGuard};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tracing::trace;

/// Bookkeeping behind the internal mutex: who holds access, who waits
struct FairState {
    readers: HashSet<ThreadId, RandomState>,
    writer: Option<ThreadId>,
    queue: WaitQueue,
}

impl FairState {
    fn new() -> Self {
        Self {
            readers: HashSet::default(),
            writer: None,
            queue: WaitQueue::new(),
        }
    }
}

/// Fairness-preserving reader-writer lock.
///
/// Acquisition runs in two steps, both under the internal bookkeeping lock:
/// an entrance check that sends every new request to the back of a non-empty
/// wait queue before it may even attempt the raw lock, and a
/// try-acquire-or-enqueue retry loop. Releases wake the queue front: one
/// writer, or a contiguous batch of readers.
///
/// `start_read`/`start_write` guard against simple self-deadlock by
/// returning `false` when the calling thread already holds access (see the
/// method docs for the exact rules); the caller must skip the matching
/// `end_*` call in that case.
///
/// # Examples
///
/// ```
/// use rwsync::FairLock;
///
/// let lock = FairLock::new();
/// assert!(lock.start_write());
/// assert!(!lock.start_write()); // already held by this thread, no-op
/// lock.end_write();
/// ```
pub struct FairLock<R: RawShared = DefaultRaw> {
    raw: R,
    state: Mutex<FairState>,
}

impl FairLock<DefaultRaw> {
    /// Create an unowned lock over the default raw primitive
    pub fn new() -> Self {
        Self::with_raw(DefaultRaw::new())
    }
}

impl Default for FairLock<DefaultRaw> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RawShared> FairLock<R> {
    /// Create an unowned lock over a caller-supplied raw primitive
    pub fn with_raw(raw: R) -> Self {
        Self {
            raw,
            state: Mutex::new(FairState::new()),
        }
    }

    /// Acquire shared access, blocking until granted.
    ///
    /// Returns `false` without acquiring anything if the calling thread
    /// already holds shared or exclusive access on this instance; a `false`
    /// return must not be paired with `end_read`.
    pub fn start_read(&self) -> bool {
        let me = thread::current().id();
        {
            let state = self.state.lock();
            if state.writer == Some(me) || state.readers.contains(&me) {
                return false;
            }
        }
        self.lock_reader(me);
        true
    }

    /// Release shared access and wake the queue front once no readers remain
    pub fn end_read(&self) {
        let mut state = self.state.lock();
        self.raw.release_shared();
        state.readers.remove(&thread::current().id());
        if state.readers.is_empty() && !state.queue.is_empty() {
            let woken = state.queue.wake_front();
            trace!(woken = woken.count(), "last reader left, waking queue front");
        }
    }

    /// Acquire exclusive access, blocking until granted.
    ///
    /// Returns `false` without acquiring anything if the calling thread
    /// already holds exclusive access; a `false` return must not be paired
    /// with `end_write`.
    ///
    /// A thread holding *shared* access is not guarded here: calling
    /// `start_write` from inside a read session blocks on the raw lock and
    /// deadlocks against the caller's own shared hold. Known weakness,
    /// kept as-is.
    pub fn start_write(&self) -> bool {
        let me = thread::current().id();
        {
            let state = self.state.lock();
            if state.writer == Some(me) {
                return false;
            }
        }
        self.lock_writer(me);
        true
    }

    /// Release exclusive access and wake the queue front
    pub fn end_write(&self) {
        let mut state = self.state.lock();
        self.raw.release_exclusive();
        state.writer = None;
        if !state.queue.is_empty() {
            let woken = state.queue.wake_front();
            trace!(woken = woken.count(), "writer left, waking queue front");
        }
    }

    /// Whether the calling thread currently holds shared access
    pub fn have_read(&self) -> bool {
        self.state.lock().readers.contains(&thread::current().id())
    }

    /// Whether the calling thread currently holds exclusive access
    pub fn have_write(&self) -> bool {
        self.state.lock().writer == Some(thread::current().id())
    }

    /// Number of threads currently holding shared access (for diagnostics)
    pub fn reader_count(&self) -> usize {
        self.state.lock().readers.len()
    }

    /// Whether any thread currently holds exclusive access (for diagnostics)
    pub fn has_writer(&self) -> bool {
        self.state.lock().writer.is_some()
    }

    /// Number of queued requests (for diagnostics)
    pub fn waiter_count(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Entrance check: a non-empty queue means someone arrived first, so
    /// join the back and block before even attempting the raw lock.
    fn entrance(&self, kind: RequestKind) {
        let mut state = self.state.lock();
        if !state.queue.is_empty() {
            block_in_queue(&mut state, kind);
        }
    }

    fn lock_reader(&self, me: ThreadId) {
        self.entrance(RequestKind::Reader);
        loop {
            let mut state = self.state.lock();
            if self.raw.try_acquire_shared() {
                state.readers.insert(me);
                return;
            }
            trace!("shared acquisition contended, queueing");
            block_in_queue(&mut state, RequestKind::Reader);
            // bookkeeping lock drops here; re-taken on the next attempt
        }
    }

    fn lock_writer(&self, me: ThreadId) {
        self.entrance(RequestKind::Writer);
        loop {
            let mut state = self.state.lock();
            if self.raw.try_acquire_exclusive() {
                state.writer = Some(me);
                return;
            }
            trace!("exclusive acquisition contended, queueing");
            block_in_queue(&mut state, RequestKind::Writer);
        }
    }
}

/// Enqueue under the held bookkeeping lock, then block on the fresh wait
/// cell. Enqueueing and blocking happen without releasing the lock in
/// between, so a wakeup can never slip through the gap.
fn block_in_queue(state: &mut MutexGuard<'_, FairState>, kind: RequestKind) {
    let cell = Arc::new(WaitCell::new());
    state.queue.enqueue(kind, Arc::clone(&cell));
    cell.block(state);
}

impl<R: RawShared> RwAccess for FairLock<R> {
    fn start_read(&self) -> bool {
        FairLock::start_read(self)
    }

    fn end_read(&self) {
        FairLock::end_read(self)
    }

    fn start_write(&self) -> bool {
        FairLock::start_write(self)
    }

    fn end_write(&self) {
        FairLock::end_write(self)
    }
}
