//! Coalesces scrollbar drags into a single jump.

use crate::dataflow::{Task, TaskHandle};
use crate::error::NavigationError;
use crate::scrollbar::slice_state::{SliceStore, SliceWrite, WriteOutcome};
use crate::viewport::ViewportHost;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingNavigationRequest {
    pub target_index: usize,
    /// Sequence number of the scrub that produced this request.
    pub issued_at: u64,
}

struct PendingNavigation {
    request: PendingNavigationRequest,
    fired: Rc<Cell<bool>>,
    // Dropping aborts both the quiescence timer and an in-flight jump.
    _task: TaskHandle,
}

/// Owns the single debounce timer of one mounted scrollbar.
///
/// Each scrub replaces the previous request. When the window passes without
/// another scrub, the latest target is sent to the viewport engine once; its
/// completion is written through the [`SliceStore`] token check.
pub struct NavigationDebouncer {
    window: Duration,
    viewport_index: usize,
    host: Rc<dyn ViewportHost>,
    store: SliceStore,
    sequence: Cell<u64>,
    pending: RefCell<Option<PendingNavigation>>,
}

impl NavigationDebouncer {
    pub fn new(
        window: Duration,
        viewport_index: usize,
        host: Rc<dyn ViewportHost>,
        store: SliceStore,
    ) -> Self {
        Self {
            window,
            viewport_index,
            host,
            store,
            sequence: Cell::new(0),
            pending: RefCell::new(None),
        }
    }

    pub fn on_user_scrub(&self, target_index: usize) {
        self.cancel();

        let sequence = self.sequence.get() + 1;
        self.sequence.set(sequence);
        let request = PendingNavigationRequest {
            target_index,
            issued_at: sequence,
        };
        let fired = Rc::new(Cell::new(false));

        let task = Task::start_droppable(navigate_after_quiescence(
            self.window,
            request,
            fired.clone(),
            self.viewport_index,
            self.host.clone(),
            self.store.clone(),
        ));

        *self.pending.borrow_mut() = Some(PendingNavigation {
            request,
            fired,
            _task: task,
        });
    }

    /// Drop the waiting timer or in-flight jump. Returns true if there was one.
    pub fn cancel(&self) -> bool {
        let cancelled = self.pending.borrow_mut().take();
        match cancelled {
            Some(pending) => {
                if !pending.fired.get() {
                    log::debug!(
                        "cancelled navigation #{} to slice {} before it fired",
                        pending.request.issued_at,
                        pending.request.target_index
                    );
                }
                true
            }
            None => false,
        }
    }

    /// Request still waiting for its quiescence window.
    pub fn pending_request(&self) -> Option<PendingNavigationRequest> {
        self.pending
            .borrow()
            .as_ref()
            .filter(|pending| !pending.fired.get())
            .map(|pending| pending.request)
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

async fn navigate_after_quiescence(
    window: Duration,
    request: PendingNavigationRequest,
    fired: Rc<Cell<bool>>,
    viewport_index: usize,
    host: Rc<dyn ViewportHost>,
    store: SliceStore,
) {
    tokio::time::sleep(window).await;
    fired.set(true);

    let PendingNavigationRequest {
        target_index,
        issued_at,
    } = request;

    let Some(viewport) = host.viewport(viewport_index) else {
        let error = NavigationError::ViewportGone { viewport_index };
        log::debug!("navigation #{issued_at} dropped: {error}");
        return;
    };

    let token = store.navigation_token(issued_at);
    log::debug!("navigation #{issued_at}: jumping viewport {viewport_index} to slice {target_index}");

    match host.jump_to_slice(&viewport.element(), target_index).await {
        Ok(()) => {
            let outcome = store.apply(SliceWrite::Navigated {
                target_index,
                token,
            });
            if outcome != WriteOutcome::Applied {
                log::trace!("navigation #{issued_at} completion not written: {outcome:?}");
            }
        }
        Err(error) => log::debug!("navigation #{issued_at} failed: {error}"),
    }
}
