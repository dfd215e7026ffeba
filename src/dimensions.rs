use std::{cell::Cell, rc::Rc, time::Duration};

use crate::debounce::{Debouncer, Scheduler};

/// Quiet period before a burst of resize events triggers a re-measure.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(2000);

/// Measured widths in CSS pixels. Zero means not measured yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub element_width: u32,
    pub viewport_width: u32,
}

impl Dimensions {
    pub fn is_measured(&self) -> bool {
        self.viewport_width > 0
    }
}

/// Reads the container and window widths. A detached container reads as 0.
#[cfg(feature = "browser")]
pub fn measure_dimensions(container: Option<&web_sys::HtmlElement>) -> Dimensions {
    let element_width = container
        .map(|el| el.offset_width().max(0) as u32)
        .unwrap_or(0);
    let viewport_width = web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|w| w.as_f64())
        .map(|w| w.max(0.0) as u32)
        .unwrap_or(0);

    Dimensions {
        element_width,
        viewport_width,
    }
}

/// Owns the measure/commit cycle of one mounted component.
///
/// The resize listener itself lives with the component; this type decides
/// what a resize event is allowed to do. Nothing is committed after
/// [`DimensionTracker::unmount`], and resize events are ignored unless the
/// tracker is responsive.
pub struct DimensionTracker<S: Scheduler> {
    measure: Rc<dyn Fn() -> Dimensions>,
    commit: Rc<dyn Fn(Dimensions)>,
    debouncer: Debouncer<S>,
    responsive: Cell<bool>,
    lifecycle: Rc<Cell<Lifecycle>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Mounted,
    Unmounted,
}

impl<S> DimensionTracker<S>
where
    S: Scheduler,
    S::Handle: 'static,
{
    pub fn new(
        scheduler: S,
        measure: impl Fn() -> Dimensions + 'static,
        commit: impl Fn(Dimensions) + 'static,
    ) -> Self {
        Self {
            measure: Rc::new(measure),
            commit: Rc::new(commit),
            debouncer: Debouncer::new(scheduler, RESIZE_DEBOUNCE),
            responsive: Cell::new(false),
            lifecycle: Rc::new(Cell::new(Lifecycle::Created)),
        }
    }

    /// Initial, unconditional measurement. A tracker that was already
    /// unmounted stays unmounted.
    pub fn mount(&self) {
        if self.lifecycle.get() != Lifecycle::Created {
            return;
        }
        self.lifecycle.set(Lifecycle::Mounted);
        self.measure();
    }

    fn is_mounted(&self) -> bool {
        self.lifecycle.get() == Lifecycle::Mounted
    }

    pub fn measure(&self) {
        if !self.is_mounted() {
            return;
        }
        let dimensions = (self.measure)();
        log::debug!("measured {dimensions:?}");
        (self.commit)(dimensions);
    }

    pub fn set_responsive(&self, responsive: bool) {
        self.responsive.set(responsive);
        if !responsive {
            self.debouncer.cancel();
        }
    }

    #[cfg(test)]
    pub(crate) fn is_responsive(&self) -> bool {
        self.responsive.get()
    }

    pub fn on_resize(&self) {
        if !self.is_mounted() || !self.responsive.get() {
            return;
        }

        let measure = Rc::clone(&self.measure);
        let commit = Rc::clone(&self.commit);
        let lifecycle = Rc::clone(&self.lifecycle);
        self.debouncer.call(move || {
            if lifecycle.get() == Lifecycle::Mounted {
                let dimensions = measure();
                log::debug!("re-measured after resize {dimensions:?}");
                commit(dimensions);
            }
        });
    }

    #[cfg(test)]
    pub(crate) fn has_pending_measure(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn unmount(&self) {
        self.lifecycle.set(Lifecycle::Unmounted);
        self.set_responsive(false);
    }
}

#[cfg(test)]
mod dimensions_tests {
    use super::*;
    use crate::debounce::manual::ManualScheduler;
    use std::cell::RefCell;

    /// Fake window whose width the test controls, plus a log of commits.
    struct Harness {
        scheduler: ManualScheduler,
        width: Rc<Cell<u32>>,
        commits: Rc<RefCell<Vec<Dimensions>>>,
        tracker: DimensionTracker<ManualScheduler>,
    }

    fn harness(initial_width: u32) -> Harness {
        let scheduler = ManualScheduler::default();
        let width = Rc::new(Cell::new(initial_width));
        let commits = Rc::new(RefCell::new(Vec::new()));

        let tracker = DimensionTracker::new(
            scheduler.clone(),
            {
                let width = width.clone();
                move || Dimensions {
                    element_width: width.get() / 2,
                    viewport_width: width.get(),
                }
            },
            {
                let commits = commits.clone();
                move |d| commits.borrow_mut().push(d)
            },
        );

        Harness {
            scheduler,
            width,
            commits,
            tracker,
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn mount_measures_once() {
        let h = harness(800);
        h.tracker.mount();

        assert_eq!(
            *h.commits.borrow(),
            vec![Dimensions {
                element_width: 400,
                viewport_width: 800
            }]
        );
    }

    #[test]
    fn non_responsive_ignores_resizes() {
        let h = harness(800);
        h.tracker.mount();

        for w in [600, 700, 900] {
            h.width.set(w);
            h.tracker.on_resize();
            h.scheduler.advance(ms(5000));
        }

        assert_eq!(h.commits.borrow().len(), 1);
        assert_eq!(h.scheduler.pending_timers(), 0);
    }

    #[test]
    fn burst_produces_single_remeasure() {
        let h = harness(800);
        h.tracker.mount();
        h.tracker.set_responsive(true);

        for w in [700, 650, 600] {
            h.width.set(w);
            h.tracker.on_resize();
            h.scheduler.advance(ms(1000));
        }
        assert_eq!(h.commits.borrow().len(), 1);

        h.scheduler.advance(ms(999));
        assert_eq!(h.commits.borrow().len(), 1);

        h.scheduler.advance(ms(1));
        assert_eq!(h.commits.borrow().len(), 2);
        assert_eq!(h.commits.borrow()[1].viewport_width, 600);

        h.scheduler.advance(ms(10_000));
        assert_eq!(h.commits.borrow().len(), 2);
    }

    #[test]
    fn measures_at_fire_time_not_event_time() {
        let h = harness(800);
        h.tracker.mount();
        h.tracker.set_responsive(true);

        h.tracker.on_resize();
        h.width.set(1024);
        h.scheduler.advance(RESIZE_DEBOUNCE);

        assert_eq!(h.commits.borrow().last().unwrap().viewport_width, 1024);
    }

    #[test]
    fn unmount_cancels_pending() {
        let h = harness(800);
        h.tracker.mount();
        h.tracker.set_responsive(true);

        h.tracker.on_resize();
        assert!(h.tracker.has_pending_measure());

        h.tracker.unmount();
        assert!(!h.tracker.has_pending_measure());
        assert_eq!(h.scheduler.pending_timers(), 0);

        h.tracker.on_resize();
        h.tracker.measure();
        h.scheduler.advance(ms(10_000));
        assert_eq!(h.commits.borrow().len(), 1);
    }

    #[test]
    fn mount_after_unmount_is_ignored() {
        let h = harness(800);
        h.tracker.unmount();
        h.tracker.mount();

        assert!(h.commits.borrow().is_empty());
    }

    #[test]
    fn resize_before_mount_is_ignored() {
        let h = harness(800);
        h.tracker.set_responsive(true);
        h.tracker.on_resize();

        assert!(!h.tracker.has_pending_measure());
    }

    #[test]
    fn disabling_responsive_cancels_pending() {
        let h = harness(800);
        h.tracker.mount();
        h.tracker.set_responsive(true);

        h.tracker.on_resize();
        h.tracker.set_responsive(false);
        assert!(!h.tracker.is_responsive());

        h.scheduler.advance(ms(10_000));
        assert_eq!(h.commits.borrow().len(), 1);
    }

    #[test]
    fn measured_only_with_viewport() {
        assert!(!Dimensions::default().is_measured());
        assert!(!Dimensions {
            element_width: 300,
            viewport_width: 0
        }
        .is_measured());
        assert!(Dimensions {
            element_width: 0,
            viewport_width: 1
        }
        .is_measured());
    }
}
