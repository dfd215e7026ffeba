use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Duration,
};

use leptos::leptos_dom::helpers::TimeoutHandle;

/// A single-threaded timer source.
pub trait Scheduler {
    type Handle;

    /// Runs `callback` once after `delay`. `None` if the timer could not be set.
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Option<Self::Handle>;

    fn cancel(&self, handle: Self::Handle);
}

/// Timers backed by `window.setTimeout`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    type Handle = TimeoutHandle;

    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Option<Self::Handle> {
        match leptos::set_timeout_with_handle(callback, delay) {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::warn!("failed to set timeout: {err:?}");
                None
            }
        }
    }

    fn cancel(&self, handle: Self::Handle) {
        handle.clear();
    }
}

/// Delays a callback until `delay` has passed without another call.
///
/// Every call replaces the pending one (last write wins). Dropping the
/// debouncer cancels whatever is still pending.
pub struct Debouncer<S: Scheduler> {
    scheduler: S,
    delay: Duration,
    pending: Rc<RefCell<Option<S::Handle>>>,
    generation: Rc<Cell<u64>>,
}

impl<S: Scheduler> Debouncer<S> {
    pub fn new(scheduler: S, delay: Duration) -> Self {
        Self {
            scheduler,
            delay,
            pending: Rc::new(RefCell::new(None)),
            generation: Rc::new(Cell::new(0)),
        }
    }

    pub fn call(&self, callback: impl FnOnce() + 'static)
    where
        S::Handle: 'static,
    {
        self.cancel();

        let generation = self.generation.get();
        let pending = Rc::clone(&self.pending);
        let current = Rc::clone(&self.generation);

        let handle = self.scheduler.schedule(
            self.delay,
            Box::new(move || {
                // A stale timer that slipped past cancel() must not run.
                if current.get() != generation {
                    return;
                }
                pending.borrow_mut().take();
                current.set(generation + 1);
                callback();
            }),
        );
        *self.pending.borrow_mut() = handle;
    }

    pub fn cancel(&self) {
        self.generation.set(self.generation.get() + 1);
        if let Some(handle) = self.pending.borrow_mut().take() {
            self.scheduler.cancel(handle);
        }
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }
}

impl<S: Scheduler> Drop for Debouncer<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}
