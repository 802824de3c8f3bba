//! Test doubles for the viewport engine.

use crate::error::NavigationError;
use crate::viewport::{ElementHandle, ElementId, LiveViewport, ViewportHost};
use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use shared::{ImageId, SliceState, StackNavigationEvent, ViewportEvent, VolumeSliceChangedEvent};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::LocalSet;

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Run `future` on a fresh `LocalSet`, the event loop everything lives on.
pub(crate) async fn run_local<F>(future: F)
where
    F: Future<Output = ()>,
{
    init_logging();
    LocalSet::new().run_until(future).await;
}

/// Let spawned tasks drain their queues; with paused time this advances 1ms.
pub(crate) async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

pub(crate) fn image_ids(ids: &[&str]) -> Vec<ImageId> {
    ids.iter().copied().map(ImageId::from).collect()
}

pub(crate) struct FakeViewport {
    element: ElementHandle,
    current_image_id: RefCell<Option<ImageId>>,
}

impl FakeViewport {
    pub(crate) fn new(element: ElementHandle, current_image_id: Option<&str>) -> Self {
        Self {
            element,
            current_image_id: RefCell::new(current_image_id.map(ImageId::from)),
        }
    }

    pub(crate) fn show_image(&self, image_id: &str) {
        *self.current_image_id.borrow_mut() = Some(image_id.into());
    }
}

impl LiveViewport for FakeViewport {
    fn element(&self) -> ElementHandle {
        self.element.clone()
    }

    fn current_image_id(&self) -> Option<ImageId> {
        self.current_image_id.borrow().clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JumpMode {
    /// Resolve right away.
    Complete,
    /// Resolve with an error right away.
    Fail,
    /// Resolve when the test calls `complete_deferred`.
    Defer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct JumpRecord {
    pub element: ElementId,
    pub target_index: usize,
}

/// In-memory viewport engine recording every jump it is asked for.
pub(crate) struct FakeViewportHost {
    viewports: RefCell<HashMap<usize, Rc<FakeViewport>>>,
    volume_slice_state: Cell<Option<SliceState>>,
    jump_mode: Cell<JumpMode>,
    echo_stack_events: Cell<bool>,
    jumps: RefCell<Vec<JumpRecord>>,
    deferred: RefCell<Vec<oneshot::Sender<Result<(), NavigationError>>>>,
}

impl FakeViewportHost {
    pub(crate) fn new() -> Self {
        Self {
            viewports: RefCell::new(HashMap::new()),
            volume_slice_state: Cell::new(None),
            jump_mode: Cell::new(JumpMode::Complete),
            echo_stack_events: Cell::new(false),
            jumps: RefCell::new(Vec::new()),
            deferred: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn mount(&self, viewport_index: usize, viewport: Rc<FakeViewport>) {
        self.viewports.borrow_mut().insert(viewport_index, viewport);
    }

    pub(crate) fn unmount(&self, viewport_index: usize) {
        self.viewports.borrow_mut().remove(&viewport_index);
    }

    pub(crate) fn set_volume_slice_state(&self, state: Option<SliceState>) {
        self.volume_slice_state.set(state);
    }

    pub(crate) fn set_jump_mode(&self, mode: JumpMode) {
        self.jump_mode.set(mode);
    }

    /// Make jumps emit a stack navigation event like the real engine does.
    pub(crate) fn echo_stack_events(&self) {
        self.echo_stack_events.set(true);
    }

    pub(crate) fn jumps(&self) -> Vec<JumpRecord> {
        self.jumps.borrow().clone()
    }

    pub(crate) fn complete_deferred(&self, result: Result<(), NavigationError>) {
        for sender in self.deferred.borrow_mut().drain(..) {
            let _ = sender.send(result.clone());
        }
    }
}

impl ViewportHost for FakeViewportHost {
    fn viewport(&self, viewport_index: usize) -> Option<Rc<dyn LiveViewport>> {
        self.viewports
            .borrow()
            .get(&viewport_index)
            .map(|viewport| viewport.clone() as Rc<dyn LiveViewport>)
    }

    fn jump_to_slice(
        &self,
        element: &ElementHandle,
        target_index: usize,
    ) -> LocalBoxFuture<'static, Result<(), NavigationError>> {
        self.jumps.borrow_mut().push(JumpRecord {
            element: element.id(),
            target_index,
        });

        if self.echo_stack_events.get() {
            element.dispatch(ViewportEvent::StackNavigation(StackNavigationEvent {
                new_index: target_index,
            }));
        }

        match self.jump_mode.get() {
            JumpMode::Complete => futures::future::ready(Ok(())).boxed_local(),
            JumpMode::Fail => futures::future::ready(Err(NavigationError::JumpFailed {
                target_index,
                reason: "engine rejected the jump".to_string(),
            }))
            .boxed_local(),
            JumpMode::Defer => {
                let (sender, receiver) = oneshot::channel();
                self.deferred.borrow_mut().push(sender);
                async move {
                    receiver.await.unwrap_or(Err(NavigationError::JumpFailed {
                        target_index,
                        reason: "completion dropped".to_string(),
                    }))
                }
                .boxed_local()
            }
        }
    }

    fn volume_slice_state(&self, _viewport: &dyn LiveViewport) -> Option<SliceState> {
        self.volume_slice_state.get()
    }
}

pub(crate) fn volume_event(current_index: usize, total_slices: usize) -> ViewportEvent {
    ViewportEvent::VolumeSliceChanged(VolumeSliceChangedEvent {
        current_index,
        total_slices,
    })
}

pub(crate) fn stack_event(new_index: usize) -> ViewportEvent {
    ViewportEvent::StackNavigation(StackNavigationEvent { new_index })
}
