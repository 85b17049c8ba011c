//! Trailing-edge debounce: only the last trigger of a burst runs, once the
//! quiet period has elapsed.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use super::runtime::Runtime;

/// Proof of one trigger; stale as soon as a later trigger or a cancel happens
#[derive(Debug, Clone)]
pub struct DebounceTicket {
    generation: u64,
    current: Rc<Cell<u64>>,
}

impl DebounceTicket {
    pub fn is_current(&self) -> bool {
        self.current.get() == self.generation
    }
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    generation: Rc<Cell<u64>>,
    delay: Rc<Cell<Duration>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            generation: Rc::new(Cell::new(0)),
            delay: Rc::new(Cell::new(delay)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay.get()
    }

    /// Applies to triggers made after the call
    pub fn set_delay(&self, delay: Duration) {
        self.delay.set(delay);
    }

    /// Supersede every pending trigger and return a ticket for this one
    pub fn trigger(&self) -> DebounceTicket {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        DebounceTicket {
            generation,
            current: self.generation.clone(),
        }
    }

    /// Drop whatever is pending
    pub fn cancel(&self) {
        self.generation.set(self.generation.get() + 1);
    }

    /// Run `task` after the quiet period, unless another call supersedes it
    pub fn schedule<F, Fut>(&self, runtime: &dyn Runtime, task: F)
    where
        F: FnOnce() -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let ticket = self.trigger();
        let quiet_period = runtime.sleep(self.delay());
        runtime.spawn(Box::pin(async move {
            quiet_period.await;
            if ticket.is_current() {
                task().await;
            }
        }));
    }
}
