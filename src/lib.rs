/*!
 * Reader-Writer Synchronization Primitives
 *
 * Two independent shared/exclusive locks built on a raw shared-exclusive
 * primitive:
 * - `FairLock`: FIFO wait queue around the raw lock, guaranteeing that a
 *   queued request is never overtaken by a later arrival
 * - `RecursiveLock`: per-thread, per-instance depth tracking, letting one
 *   thread nest acquisitions of the same instance without deadlocking itself
 *
 * # Architecture
 *
 * Both locks talk to the raw primitive through the `RawShared` trait, with a
 * parking_lot-backed implementation as the default. The four-operation
 * session interface (`start_read`/`end_read`/`start_write`/`end_write`) is
 * exposed uniformly through `RwAccess`, so workload drivers can run against
 * either lock type.
 */

pub mod fair;
pub mod raw;
pub mod recursive;
pub mod traits;

pub use fair::FairLock;
pub use raw::DefaultRaw;
pub use recursive::RecursiveLock;
pub use traits::{RawShared, RwAccess};
