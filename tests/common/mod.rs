/*!
 * Randomized Workload Driver
 *
 * Spawns a mixed reader/writer population against one lock through the
 * `RwAccess` interface. Writer share is drawn uniformly between 20% and 80%
 * of the thread count; holders sleep through a fixed number of hold cycles
 * and re-enter one level deep with fixed probabilities.
 */

use rand::seq::SliceRandom;
use rand::Rng;
use rwsync::RwAccess;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Cycles a holder sleeps through while holding the lock
pub const HOLD_CYCLES: usize = 5;
/// Duration of one hold cycle
pub const HOLD_STEP: Duration = Duration::from_millis(2);

const READER_REENTRY: f64 = 0.3;
const WRITER_REENTRY: f64 = 0.2;

fn hold() {
    for _ in 0..HOLD_CYCLES {
        thread::sleep(HOLD_STEP);
    }
}

/// One reader pass: acquire, hold, maybe re-enter once, release if owed
pub fn reader<L: RwAccess>(lock: &L, rng: &mut impl Rng, reenter: bool) {
    let release_required = lock.start_read();
    hold();
    if reenter && rng.gen_bool(READER_REENTRY) {
        reader(lock, rng, false);
    }
    if release_required {
        lock.end_read();
    }
}

/// One writer pass: acquire, hold, maybe re-enter once as writer or reader,
/// release if owed
pub fn writer<L: RwAccess>(lock: &L, rng: &mut impl Rng, reenter: bool) {
    let release_required = lock.start_write();
    hold();
    if reenter && rng.gen_bool(WRITER_REENTRY) {
        if rng.gen_bool(0.5) {
            writer(lock, rng, false);
        } else {
            reader(lock, rng, false);
        }
    }
    if release_required {
        lock.end_write();
    }
}

/// Run the full randomized population against one lock and join every worker
pub fn run_randomized<L>(lock: Arc<L>, threads: usize)
where
    L: RwAccess + Send + Sync + 'static,
{
    let mut rng = rand::thread_rng();
    let writers = rng.gen_range(threads * 20 / 100..=threads * 80 / 100);

    let mut roles: Vec<bool> = (0..threads).map(|i| i < writers).collect();
    roles.shuffle(&mut rng);

    let handles: Vec<_> = roles
        .into_iter()
        .map(|is_writer| {
            let lock = Arc::clone(&lock);
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                if is_writer {
                    writer(&*lock, &mut rng, true);
                } else {
                    reader(&*lock, &mut rng, true);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("workload thread panicked");
    }
}
