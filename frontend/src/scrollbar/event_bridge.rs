//! Reflects navigation that happened inside the viewport onto the scrollbar.
//!
//! The bridge only ever writes what the viewport reports. It has no access to
//! the navigation primitives, so an event can never turn into another jump.

use crate::dataflow::{Actor, relay};
use crate::error::BridgeError;
use crate::scrollbar::slice_state::{SliceStore, SliceWrite, ViewportEpoch, WriteSource};
use crate::viewport::{ElementHandle, ListenerId, ViewportAddressing, ViewportDescriptor};
use futures::StreamExt;
use shared::{AddressingKind, SliceState, ViewportEvent};

/// Listener behaviour selected by the viewport's addressing kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BridgeMode {
    StackLike { total_slices: usize },
    VolumetricLike,
}

impl BridgeMode {
    fn for_descriptor(descriptor: &ViewportDescriptor) -> Self {
        match &descriptor.addressing {
            ViewportAddressing::Stack { image_ids } => BridgeMode::StackLike {
                total_slices: image_ids.len(),
            },
            ViewportAddressing::Volumetric => BridgeMode::VolumetricLike,
        }
    }

    fn kind(self) -> AddressingKind {
        match self {
            BridgeMode::StackLike { .. } => AddressingKind::Stack,
            BridgeMode::VolumetricLike => AddressingKind::Volumetric,
        }
    }

    fn reflect(self, event: ViewportEvent, epoch: ViewportEpoch) -> Option<SliceWrite> {
        match (self, event) {
            (BridgeMode::StackLike { total_slices }, ViewportEvent::StackNavigation(event)) => {
                Some(SliceWrite::Observed {
                    source: WriteSource::StackEvent,
                    state: SliceState {
                        current_index: event.new_index,
                        total_slices,
                    },
                    epoch,
                })
            }
            (BridgeMode::VolumetricLike, ViewportEvent::VolumeSliceChanged(event)) => {
                Some(SliceWrite::Observed {
                    source: WriteSource::VolumeEvent,
                    state: SliceState {
                        current_index: event.current_index,
                        total_slices: event.total_slices,
                    },
                    epoch,
                })
            }
            _ => None,
        }
    }
}

/// Active listener on a viewport element. Dropping it unsubscribes.
pub struct Subscription {
    kind: AddressingKind,
    element: ElementHandle,
    listener: ListenerId,
    _event_loop: Actor<()>,
}

impl Subscription {
    pub fn kind(&self) -> AddressingKind {
        self.kind
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let removed = self
            .element
            .remove_event_listener(self.kind.event_kind(), self.listener);
        if !removed {
            log::warn!(
                "{} listener on {} was already gone",
                self.kind,
                self.element.id()
            );
        }
    }
}

pub struct ViewportEventBridge {
    store: SliceStore,
    subscription: Option<Subscription>,
}

impl ViewportEventBridge {
    pub fn new(store: SliceStore) -> Self {
        Self {
            store,
            subscription: None,
        }
    }

    /// Listen for the native navigation event matching the descriptor's kind.
    ///
    /// Writes are stamped with the store's current epoch, so anything the
    /// listener still sees after the viewport identity changes is dropped.
    pub fn attach(&mut self, descriptor: &ViewportDescriptor) -> Result<&Subscription, BridgeError> {
        let mode = BridgeMode::for_descriptor(descriptor);
        if let Some(subscription) = &self.subscription {
            return Err(BridgeError::AlreadyAttached {
                element: subscription.element.id(),
                kind: subscription.kind,
            });
        }

        let element = descriptor.element.clone();
        let epoch = self.store.epoch();
        let (element_navigated_relay, mut navigated_stream) = relay::<ViewportEvent>();
        let listener = element.add_event_listener(mode.kind().event_kind(), element_navigated_relay);

        let store = self.store.clone();
        let event_loop = Actor::new((), move |_state| async move {
            while let Some(event) = navigated_stream.next().await {
                match mode.reflect(event, epoch) {
                    Some(write) => {
                        store.apply(write);
                    }
                    None => log::warn!("{:?} listener ignored {event:?}", mode.kind()),
                }
            }
        });

        log::debug!("attached {} listener to {}", mode.kind(), element.id());
        Ok(&*self.subscription.insert(Subscription {
            kind: mode.kind(),
            element,
            listener,
            _event_loop: event_loop,
        }))
    }

    /// Remove the listener registered by the last `attach`. Returns false if none.
    pub fn detach(&mut self) -> bool {
        match self.subscription.take() {
            Some(subscription) => {
                log::debug!(
                    "detaching {} listener from {}",
                    subscription.kind,
                    subscription.element.id()
                );
                true
            }
            None => false,
        }
    }
}
