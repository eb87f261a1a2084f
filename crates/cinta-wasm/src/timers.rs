//! `setTimeout`-backed scheduler

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use cinta_core::{Scheduler, TimerKind};
use gloo_timers::callback::Timeout;

struct PendingTimer {
    // Dropping a Timeout clears it
    _timeout: Timeout,
    fired: Rc<Cell<bool>>,
}

/// Scheduler that calls `fire` from the browser event loop
pub struct BrowserScheduler {
    pending: HashMap<TimerKind, PendingTimer>,
    fire: Rc<dyn Fn(TimerKind)>,
}

impl BrowserScheduler {
    pub fn new(fire: impl Fn(TimerKind) + 'static) -> Self {
        Self {
            pending: HashMap::new(),
            fire: Rc::new(fire),
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&mut self, kind: TimerKind, delay: Duration) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let fired = Rc::new(Cell::new(false));
        let timeout = Timeout::new(millis, {
            let fire = Rc::clone(&self.fire);
            let fired = Rc::clone(&fired);
            move || {
                fired.set(true);
                fire(kind);
            }
        });
        self.pending.insert(
            kind,
            PendingTimer {
                _timeout: timeout,
                fired,
            },
        );
    }

    fn cancel(&mut self, kind: TimerKind) {
        self.pending.remove(&kind);
    }

    fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending
            .get(&kind)
            .is_some_and(|timer| !timer.fired.get())
    }
}
