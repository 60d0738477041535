/*!
 * Fair Wait Queue
 *
 * FIFO queue of blocked acquisition requests plus the per-waiter wait cell
 * and the wakeup policy applied on release.
 */

use parking_lot::{Condvar, MutexGuard};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Kind of access a queued request is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RequestKind {
    Reader,
    Writer,
}

/// Result of a wakeup pass over the queue front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WakeResult {
    /// Successfully woke N waiters (N >= 1)
    Woken(usize),
    /// The queue was empty
    NoWaiters,
}

impl WakeResult {
    /// Get number of woken waiters (0 if none)
    #[inline(always)]
    pub(crate) fn count(&self) -> usize {
        match self {
            WakeResult::Woken(n) => *n,
            WakeResult::NoWaiters => 0,
        }
    }
}

/// Per-waiter wait handle.
///
/// The blocked caller holds one `Arc` clone and the queue holds the other,
/// so a queue entry never references a handle whose owner is gone. The
/// woken flag is only stored under the bookkeeping lock, and `block` loops
/// on it, so spurious condvar wakes never count as a grant.
pub(crate) struct WaitCell {
    woken: AtomicBool,
    condvar: Condvar,
}

impl WaitCell {
    pub(crate) fn new() -> Self {
        Self {
            woken: AtomicBool::new(false),
            condvar: Condvar::new(),
        }
    }

    /// Block until woken, releasing the bookkeeping lock while waiting and
    /// reacquiring it before returning.
    pub(crate) fn block<T>(&self, guard: &mut MutexGuard<'_, T>) {
        while !self.woken.load(Ordering::Acquire) {
            self.condvar.wait(guard);
        }
    }

    /// Wake the owning waiter. Called under the bookkeeping lock.
    pub(crate) fn wake(&self) {
        self.woken.store(true, Ordering::Release);
        self.condvar.notify_one();
    }
}

struct Waiter {
    kind: RequestKind,
    cell: Arc<WaitCell>,
}

/// FIFO queue of pending requests, in strict arrival order
pub(crate) struct WaitQueue {
    entries: VecDeque<Waiter>,
}

impl WaitQueue {
    pub(crate) fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    pub(crate) fn enqueue(&mut self, kind: RequestKind, cell: Arc<WaitCell>) {
        self.entries.push_back(Waiter { kind, cell });
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Wake the queue front after a release.
    ///
    /// A writer at the front is woken alone: exclusive access is
    /// single-owner, so waking more would only add contention, and bounding
    /// the next acquirer to one preserves arrival order. A reader at the
    /// front is woken together with every contiguous reader behind it; the
    /// first writer entry stops the batch.
    pub(crate) fn wake_front(&mut self) -> WakeResult {
        match self.entries.front().map(|w| w.kind) {
            None => WakeResult::NoWaiters,
            Some(RequestKind::Writer) => {
                if let Some(waiter) = self.entries.pop_front() {
                    waiter.cell.wake();
                }
                WakeResult::Woken(1)
            }
            Some(RequestKind::Reader) => {
                let mut woken = 0;
                while let Some(RequestKind::Reader) = self.entries.front().map(|w| w.kind) {
                    if let Some(waiter) = self.entries.pop_front() {
                        waiter.cell.wake();
                        woken += 1;
                    }
                }
                WakeResult::Woken(woken)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_wake_front_empty() {
        let mut queue = WaitQueue::new();
        assert_eq!(queue.wake_front(), WakeResult::NoWaiters);
    }

    #[test]
    fn test_writer_front_wakes_exactly_one() {
        let mut queue = WaitQueue::new();
        queue.enqueue(RequestKind::Writer, Arc::new(WaitCell::new()));
        queue.enqueue(RequestKind::Writer, Arc::new(WaitCell::new()));
        queue.enqueue(RequestKind::Reader, Arc::new(WaitCell::new()));

        assert_eq!(queue.wake_front(), WakeResult::Woken(1));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_reader_front_wakes_contiguous_batch() {
        let mut queue = WaitQueue::new();
        queue.enqueue(RequestKind::Reader, Arc::new(WaitCell::new()));
        queue.enqueue(RequestKind::Reader, Arc::new(WaitCell::new()));
        queue.enqueue(RequestKind::Writer, Arc::new(WaitCell::new()));
        queue.enqueue(RequestKind::Reader, Arc::new(WaitCell::new()));

        // Batch stops at the writer entry; the trailing reader stays queued
        assert_eq!(queue.wake_front(), WakeResult::Woken(2));
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.wake_front(), WakeResult::Woken(1));
        assert_eq!(queue.wake_front(), WakeResult::Woken(1));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_wait_cell_blocks_until_woken() {
        let cell = Arc::new(WaitCell::new());
        let gate = Arc::new(Mutex::new(()));

        let cell_clone = cell.clone();
        let gate_clone = gate.clone();
        let handle = thread::spawn(move || {
            let mut guard = gate_clone.lock();
            cell_clone.block(&mut guard);
        });

        thread::sleep(Duration::from_millis(50));
        cell.wake();
        handle.join().unwrap();
    }

    #[test]
    fn test_wait_cell_wake_before_block_is_not_lost() {
        let cell = Arc::new(WaitCell::new());
        let gate = Mutex::new(());

        cell.wake();

        // Flag already set, so block returns immediately
        let mut guard = gate.lock();
        cell.block(&mut guard);
    }
}
