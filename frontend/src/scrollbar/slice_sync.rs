use crate::error::ResolveError;
use crate::scrollbar::event_bridge::ViewportEventBridge;
use crate::scrollbar::kind_resolver::ViewportKindResolver;
use crate::scrollbar::navigation_debouncer::{NavigationDebouncer, PendingNavigationRequest};
use crate::scrollbar::slice_state::{SliceStore, SliceWrite, WriteOutcome};
use crate::viewport::{ViewportDescriptor, ViewportHost};
use futures_signals::signal::{Mutable, Signal, SignalExt};
use shared::{AddressingKind, ScrollbarConfig, ScrollbarProps, SliceState};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Uninitialized,
    Subscribed(AddressingKind),
    /// Torn down; terminal.
    Unsubscribed,
}

struct SliceSyncState {
    viewport_index: usize,
    height: String,
    host: Rc<dyn ViewportHost>,
    store: SliceStore,
    debouncer: NavigationDebouncer,
    bridge: RefCell<ViewportEventBridge>,
    descriptor: RefCell<Option<ViewportDescriptor>>,
    phase: Mutable<SyncPhase>,
}

/// Keeps one viewport's scrollbar and its displayed slice in step.
///
/// Two paths write the slice position: the debounced scrollbar drag (after
/// the viewport confirms the jump) and the native navigation events of the
/// viewport element. Only one viewport identity is followed at a time;
/// replacing it cancels the pending drag and detaches the old listener before
/// anything new is attached.
///
/// Must be created inside a `tokio::task::LocalSet`. Dropping the last clone
/// releases the listener and the timer, same as [`SliceSync::teardown`].
#[derive(Clone)]
pub struct SliceSync {
    state: Rc<SliceSyncState>,
}

impl SliceSync {
    pub fn new(viewport_index: usize, host: Rc<dyn ViewportHost>, config: &ScrollbarConfig) -> Self {
        let store = SliceStore::new();
        let debouncer = NavigationDebouncer::new(
            config.debounce_window(),
            viewport_index,
            host.clone(),
            store.clone(),
        );
        let bridge = ViewportEventBridge::new(store.clone());

        Self {
            state: Rc::new(SliceSyncState {
                viewport_index,
                height: config.scrollbar.height.clone(),
                host,
                store,
                debouncer,
                bridge: RefCell::new(bridge),
                descriptor: RefCell::new(None),
                phase: Mutable::new(SyncPhase::Uninitialized),
            }),
        }
    }

    /// New viewport data from the layout; `None` while the viewport has none.
    ///
    /// Supplying a descriptor equal to the followed one changes nothing.
    pub fn viewport_data_changed(&self, descriptor: Option<ViewportDescriptor>) {
        let phase = self.phase();
        if phase == SyncPhase::Unsubscribed {
            log::warn!(
                "viewport {} data changed after teardown; ignored",
                self.state.viewport_index
            );
            return;
        }

        let Some(descriptor) = descriptor else {
            if self.state.descriptor.borrow_mut().take().is_some() {
                self.release_viewport();
                self.state.phase.set(SyncPhase::Uninitialized);
            }
            return;
        };

        if matches!(phase, SyncPhase::Subscribed(_))
            && self.state.descriptor.borrow().as_ref() == Some(&descriptor)
        {
            return;
        }

        self.release_viewport();
        *self.state.descriptor.borrow_mut() = Some(descriptor.clone());
        self.subscribe(&descriptor);
    }

    /// Re-derive the slice position of the current descriptor.
    ///
    /// Completes a subscription that was waiting for the live viewport.
    pub fn refresh(&self) {
        let Some(descriptor) = self.state.descriptor.borrow().clone() else {
            return;
        };
        match self.phase() {
            SyncPhase::Uninitialized => self.subscribe(&descriptor),
            SyncPhase::Subscribed(_) => {
                self.seed(&descriptor);
            }
            SyncPhase::Unsubscribed => {}
        }
    }

    /// Scrollbar `onChange`: navigate the viewport to `target_index`.
    pub fn request_navigation(&self, target_index: usize) {
        match self.phase() {
            SyncPhase::Subscribed(_) => self.state.debouncer.on_user_scrub(target_index),
            phase => log::debug!(
                "navigation to {target_index} ignored for viewport {} in {phase:?}",
                self.state.viewport_index
            ),
        }
    }

    pub fn teardown(&self) {
        if self.phase() == SyncPhase::Unsubscribed {
            return;
        }
        self.release_viewport();
        self.state.descriptor.borrow_mut().take();
        self.state.phase.set(SyncPhase::Unsubscribed);
        log::debug!("viewport {} scrollbar torn down", self.state.viewport_index);
    }

    pub fn phase(&self) -> SyncPhase {
        self.state.phase.get()
    }

    pub fn phase_signal(&self) -> impl Signal<Item = SyncPhase> + use<> {
        self.state.phase.signal()
    }

    pub fn slice_state(&self) -> SliceState {
        self.state.store.snapshot()
    }

    pub fn slice_state_signal(&self) -> impl Signal<Item = SliceState> + use<> {
        self.state.store.signal()
    }

    pub fn scrollbar_props(&self) -> ScrollbarProps {
        ScrollbarProps::from_slice_state(self.slice_state(), self.state.height.as_str())
    }

    pub fn scrollbar_props_signal(&self) -> impl Signal<Item = ScrollbarProps> + use<> {
        let height = self.state.height.clone();
        self.state
            .store
            .signal()
            .map(move |state| ScrollbarProps::from_slice_state(state, height.as_str()))
    }

    pub fn pending_navigation(&self) -> Option<PendingNavigationRequest> {
        self.state.debouncer.pending_request()
    }

    /// Write ledger of the slice position.
    pub fn store(&self) -> &SliceStore {
        &self.state.store
    }

    fn subscribe(&self, descriptor: &ViewportDescriptor) {
        let seeded = self.seed(descriptor);
        if self.phase() == SyncPhase::Uninitialized && !seeded {
            log::debug!(
                "viewport {} not mounted yet; waiting before subscribing",
                self.state.viewport_index
            );
            return;
        }

        match self.state.bridge.borrow_mut().attach(descriptor) {
            Ok(subscription) => self.state.phase.set(SyncPhase::Subscribed(subscription.kind())),
            Err(error) => log::warn!("viewport {}: {error}", self.state.viewport_index),
        }
    }

    /// Returns false only when the live viewport is not mounted.
    fn seed(&self, descriptor: &ViewportDescriptor) -> bool {
        let viewport_index = self.state.viewport_index;
        let Some(viewport) = self.state.host.viewport(viewport_index) else {
            log::debug!("{}", ResolveError::ViewportMissing { viewport_index });
            return false;
        };

        let resolver = ViewportKindResolver::new(self.state.host.as_ref());
        match resolver.resolve(descriptor, viewport.as_ref()) {
            Ok(state) => {
                let epoch = self.state.store.epoch();
                if self.state.store.apply(SliceWrite::Seed { state, epoch }) == WriteOutcome::Applied {
                    log::debug!("viewport {viewport_index} resolved to slice {state}");
                }
            }
            Err(error) => log::debug!("viewport {viewport_index} keeps its slice: {error}"),
        }
        true
    }

    fn release_viewport(&self) {
        self.state.debouncer.cancel();
        self.state.bridge.borrow_mut().detach();
        self.state.store.begin_epoch();
    }
}
