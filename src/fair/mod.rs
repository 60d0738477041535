/*!
 * Fair Reader-Writer Lock
 *
 * FIFO-queued shared/exclusive lock and its wait-queue internals
 */

mod lock;
mod queue;

pub use lock::FairLock;
