#![forbid(unsafe_code)]

//! FIFO mutex built from a chain of completion signals.
//!
//! Each acquisition captures the current chain tail and installs a fresh
//! signal behind it, then waits for the captured tail to fire. The chain
//! encodes fairness structurally: there is no waiter queue to manage, only
//! the join point of everything queued so far.

use std::{fmt, mem, sync::Arc};

use parking_lot::Mutex as StateLock;
use tokio_util::sync::CancellationToken;

/// Completion signal that has already fired.
///
/// Serves two roles at rest: the tail of an empty chain (so the next
/// `acquire` proceeds immediately) and the release trigger of a mutex that
/// has no holder (so a stray `release` is a no-op).
fn fired() -> CancellationToken {
    let token = CancellationToken::new();
    token.cancel();
    token
}

struct State {
    /// Fires once the last currently-queued holder releases.
    tail: CancellationToken,
    /// The current holder's trigger. `release` fires this.
    release_current: CancellationToken,
}

/// FIFO async mutex over a single critical section.
///
/// Tasks that call [`acquire`](Mutex::acquire) are granted the lock in the
/// order their futures are first polled, one at a time. The mutex holds no
/// data; it serializes the *execution* of critical sections, and any state
/// they touch must be reached only from inside them.
///
/// Cloning is cheap and clones share the same chain, so one mutex can guard
/// a resource across as many tasks as need it.
///
/// Notes:
/// - `release` does not validate pairing. Releasing twice for one
///   acquisition re-fires the current trigger (a no-op); releasing without
///   holding the lock at all disturbs whoever does hold it. Prefer
///   [`run_exclusive`](Mutex::run_exclusive), which pairs the two on every
///   exit path.
/// - There is no cancellation. An `acquire` future dropped mid-wait leaves
///   its chain link permanently unfired and every later waiter stalls; a
///   critical section that never finishes does the same.
/// - Acquiring again from inside a critical section deadlocks: the second
///   acquisition waits on a chain link only the first can fire.
#[derive(Clone)]
pub struct Mutex {
    state: Arc<StateLock<State>>,
}

impl Mutex {
    /// Create an unlocked mutex.
    pub fn new() -> Self {
        Self {
            state: Arc::new(StateLock::new(State {
                tail: fired(),
                release_current: fired(),
            })),
        }
    }

    /// Wait until the lock is granted.
    ///
    /// The chain position is claimed synchronously, before the first await
    /// point, so concurrent acquisitions on the same task queue keep the
    /// order in which they were first polled. On a fresh mutex this resolves
    /// without suspending.
    pub async fn acquire(&self) {
        let (previous_tail, mine) = {
            let mut state = self.state.lock();
            let mine = CancellationToken::new();
            let previous_tail = mem::replace(&mut state.tail, mine.clone());
            (previous_tail, mine)
        };

        previous_tail.cancelled().await;

        // Granted. The signal installed above is now the one a release
        // must fire to let the next waiter through.
        self.state.lock().release_current = mine;
    }

    /// Release the lock, unblocking the next queued acquisition if any.
    ///
    /// With no waiters queued, the mutex returns to its unlocked steady
    /// state and the next `acquire` proceeds immediately.
    pub fn release(&self) {
        self.state.lock().release_current.cancel();
    }

    /// Run `section` while holding the lock.
    ///
    /// Acquires, awaits the section, releases on every exit path (including
    /// unwind), then hands the section's output back verbatim. An error
    /// value produced by the section is not inspected or wrapped here; it
    /// reaches the caller after the release has run.
    ///
    /// `section` is anything that converts into a future: an `async` block
    /// for work that has yet to run, or `std::future::ready(value)` for an
    /// already-computed result that should still take its turn.
    pub async fn run_exclusive<S>(&self, section: S) -> S::Output
    where
        S: IntoFuture,
    {
        self.acquire().await;
        let _release = ReleaseOnDrop(self);
        section.into_future().await
    }
}

impl Default for Mutex {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Mutex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Mutex")
            .field("idle", &state.tail.is_cancelled())
            .finish()
    }
}

/// Releases on drop, so `run_exclusive` unlocks on panic as well as return.
struct ReleaseOnDrop<'a>(&'a Mutex);

impl Drop for ReleaseOnDrop<'_> {
    fn drop(&mut self) {
        self.0.release();
    }
}
