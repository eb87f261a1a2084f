//! Cancellable timers for the shell's delayed UI effects
//!
//! The shell never owns timer callbacks. It asks a [`Scheduler`] to fire a
//! [`TimerKind`] after a delay, and the host feeds expired kinds back through
//! `PlayerShell::handle_timer`. At most one timer of each kind is pending:
//! scheduling a kind again replaces the previous one.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The shell's independent timers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimerKind {
    /// Hide the transport controls after pointer inactivity
    HideControls,
    /// Clear the big play/pause glyph
    ClearBigIcon,
}

pub trait Scheduler {
    /// Fire `kind` after `delay`, replacing any pending timer of that kind
    fn schedule(&mut self, kind: TimerKind, delay: Duration);

    /// Drop the pending timer of `kind`, if any
    fn cancel(&mut self, kind: TimerKind);

    fn is_pending(&self, kind: TimerKind) -> bool;

    fn reschedule(&mut self, kind: TimerKind, delay: Duration) {
        self.cancel(kind);
        self.schedule(kind, delay);
    }
}

#[derive(Debug, Default)]
struct ManualClock {
    now: Duration,
    deadlines: BTreeMap<TimerKind, Duration>,
}

/// Virtual-clock scheduler.
///
/// Time only moves through [`ManualScheduler::advance`], which returns the
/// timers that expired in deadline order. Clones share one clock.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<ManualClock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed virtual time
    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    /// Absolute deadline of a pending timer
    pub fn deadline(&self, kind: TimerKind) -> Option<Duration> {
        self.clock.borrow().deadlines.get(&kind).copied()
    }

    /// Move the clock forward and collect expired timers
    pub fn advance(&self, by: Duration) -> Vec<TimerKind> {
        let mut clock = self.clock.borrow_mut();
        clock.now += by;
        let now = clock.now;

        let mut expired: Vec<(Duration, TimerKind)> = clock
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(kind, deadline)| (*deadline, *kind))
            .collect();
        expired.sort();

        for (_, kind) in &expired {
            clock.deadlines.remove(kind);
        }
        expired.into_iter().map(|(_, kind)| kind).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, kind: TimerKind, delay: Duration) {
        let mut clock = self.clock.borrow_mut();
        let deadline = clock.now + delay;
        clock.deadlines.insert(kind, deadline);
    }

    fn cancel(&mut self, kind: TimerKind) {
        self.clock.borrow_mut().deadlines.remove(&kind);
    }

    fn is_pending(&self, kind: TimerKind) -> bool {
        self.clock.borrow().deadlines.contains_key(&kind)
    }
}

#[cfg(feature = "tokio")]
pub use self::tokio_timers::{TimerReceiver, TokioScheduler};

#[cfg(feature = "tokio")]
mod tokio_timers {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex, PoisonError};
    use std::time::Duration;

    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;
    use tracing::trace;

    use super::{Scheduler, TimerKind};

    type Generations = Arc<Mutex<HashMap<TimerKind, u64>>>;

    /// Scheduler backed by spawned tokio sleep tasks.
    ///
    /// Expired timers are delivered on the paired [`TimerReceiver`]. Must be
    /// used from within a tokio runtime.
    pub struct TokioScheduler {
        tx: mpsc::UnboundedSender<(TimerKind, u64)>,
        tasks: HashMap<TimerKind, JoinHandle<()>>,
        generations: Generations,
    }

    /// Receiving half of a [`TokioScheduler`]
    pub struct TimerReceiver {
        rx: mpsc::UnboundedReceiver<(TimerKind, u64)>,
        generations: Generations,
    }

    impl TokioScheduler {
        pub fn new() -> (Self, TimerReceiver) {
            let (tx, rx) = mpsc::unbounded_channel();
            let generations = Generations::default();
            let scheduler = Self {
                tx,
                tasks: HashMap::new(),
                generations: generations.clone(),
            };
            (scheduler, TimerReceiver { rx, generations })
        }

        fn bump(&self, kind: TimerKind) -> u64 {
            let mut generations = self
                .generations
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let generation = generations.entry(kind).or_default();
            *generation += 1;
            *generation
        }
    }

    impl Scheduler for TokioScheduler {
        fn schedule(&mut self, kind: TimerKind, delay: Duration) {
            if let Some(task) = self.tasks.remove(&kind) {
                task.abort();
            }
            let generation = self.bump(kind);
            let tx = self.tx.clone();
            let task = tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = tx.send((kind, generation));
            });
            self.tasks.insert(kind, task);
        }

        fn cancel(&mut self, kind: TimerKind) {
            if let Some(task) = self.tasks.remove(&kind) {
                task.abort();
            }
            // A task that already fired may have a message in flight
            self.bump(kind);
        }

        fn is_pending(&self, kind: TimerKind) -> bool {
            self.tasks
                .get(&kind)
                .is_some_and(|task| !task.is_finished())
        }
    }

    impl Drop for TokioScheduler {
        fn drop(&mut self) {
            for (_, task) in self.tasks.drain() {
                task.abort();
            }
        }
    }

    impl TimerReceiver {
        /// Next expired timer, skipping ones cancelled after they fired
        pub async fn recv(&mut self) -> Option<TimerKind> {
            while let Some((kind, generation)) = self.rx.recv().await {
                let current = self
                    .generations
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get(&kind)
                    .copied();
                if current == Some(generation) {
                    return Some(kind);
                }
                trace!(?kind, generation, "Dropping stale timer");
            }
            None
        }
    }
}
