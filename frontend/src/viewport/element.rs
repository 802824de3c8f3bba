//! Viewport element acting as the target of native navigation events.

use crate::dataflow::Relay;
use indexmap::IndexMap;
use shared::{ViewportEvent, ViewportEventKind};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// How many listeners were ever added and removed for one event kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStats {
    pub attached: usize,
    pub detached: usize,
}

struct Listener {
    kind: ViewportEventKind,
    relay: Relay<ViewportEvent>,
}

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    listeners: IndexMap<ListenerId, Listener>,
    stats: BTreeMap<ViewportEventKind, ListenerStats>,
}

/// Handle to the DOM-like element a viewport renders into.
///
/// Clones share the same listener table. Two handles are equal only when they
/// are clones of one element; a remounted element reusing an id is distinct.
#[derive(Clone)]
pub struct ElementHandle {
    id: ElementId,
    table: Rc<RefCell<ListenerTable>>,
}

impl ElementHandle {
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            table: Rc::new(RefCell::new(ListenerTable::default())),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn add_event_listener(
        &self,
        kind: ViewportEventKind,
        relay: Relay<ViewportEvent>,
    ) -> ListenerId {
        let mut table = self.table.borrow_mut();
        table.next_id += 1;
        let id = ListenerId(table.next_id);
        table.listeners.insert(id, Listener { kind, relay });
        table.stats.entry(kind).or_default().attached += 1;
        id
    }

    /// Returns false when no listener of `kind` is registered under `id`.
    pub fn remove_event_listener(&self, kind: ViewportEventKind, id: ListenerId) -> bool {
        let mut table = self.table.borrow_mut();
        match table.listeners.get(&id) {
            Some(listener) if listener.kind == kind => {}
            _ => return false,
        }
        table.listeners.shift_remove(&id);
        table.stats.entry(kind).or_default().detached += 1;
        true
    }

    /// Deliver `event` to every listener of its kind, in registration order.
    pub fn dispatch(&self, event: ViewportEvent) -> usize {
        let kind = event.kind();
        let relays: Vec<Relay<ViewportEvent>> = self
            .table
            .borrow()
            .listeners
            .values()
            .filter(|listener| listener.kind == kind)
            .map(|listener| listener.relay.clone())
            .collect();

        for relay in &relays {
            relay.send(event);
        }
        relays.len()
    }

    pub fn listener_count(&self, kind: ViewportEventKind) -> usize {
        self.table
            .borrow()
            .listeners
            .values()
            .filter(|listener| listener.kind == kind)
            .count()
    }

    pub fn listener_stats(&self, kind: ViewportEventKind) -> ListenerStats {
        self.table
            .borrow()
            .stats
            .get(&kind)
            .copied()
            .unwrap_or_default()
    }
}

impl PartialEq for ElementHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Rc::ptr_eq(&self.table, &other.table)
    }
}

impl Eq for ElementHandle {}

impl fmt::Debug for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementHandle")
            .field("id", &self.id)
            .field("listeners", &self.table.borrow().listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataflow::relay;
    use futures::StreamExt;
    use shared::{StackNavigationEvent, VolumeSliceChangedEvent};

    fn stack_event(new_index: usize) -> ViewportEvent {
        ViewportEvent::StackNavigation(StackNavigationEvent { new_index })
    }

    #[tokio::test]
    async fn test_dispatch_reaches_only_matching_kind() {
        let element = ElementHandle::new(ElementId(1));
        let (stack_relay, mut stack_stream) = relay();
        let (volume_relay, _volume_stream) = relay();
        element.add_event_listener(ViewportEventKind::StackNavigation, stack_relay);
        element.add_event_listener(ViewportEventKind::VolumeSliceChanged, volume_relay);

        assert_eq!(element.dispatch(stack_event(4)), 1);
        assert_eq!(stack_stream.next().await, Some(stack_event(4)));

        let volume = ViewportEvent::VolumeSliceChanged(VolumeSliceChangedEvent {
            current_index: 1,
            total_slices: 2,
        });
        assert_eq!(element.dispatch(volume), 1);
    }

    #[test]
    fn test_remove_requires_matching_kind() {
        let element = ElementHandle::new(ElementId(7));
        let (stack_relay, _stream) = relay();
        let id = element.add_event_listener(ViewportEventKind::StackNavigation, stack_relay);

        assert!(!element.remove_event_listener(ViewportEventKind::VolumeSliceChanged, id));
        assert_eq!(element.listener_count(ViewportEventKind::StackNavigation), 1);

        assert!(element.remove_event_listener(ViewportEventKind::StackNavigation, id));
        assert!(!element.remove_event_listener(ViewportEventKind::StackNavigation, id));
        assert_eq!(element.listener_count(ViewportEventKind::StackNavigation), 0);
        assert_eq!(
            element.listener_stats(ViewportEventKind::StackNavigation),
            ListenerStats {
                attached: 1,
                detached: 1
            }
        );
    }

    #[test]
    fn test_dispatch_without_listeners_is_dropped() {
        let element = ElementHandle::new(ElementId(3));
        assert_eq!(element.dispatch(stack_event(0)), 0);
    }

    #[test]
    fn test_clones_share_listeners() {
        let element = ElementHandle::new(ElementId(5));
        let clone = element.clone();
        let (stack_relay, _stream) = relay();
        element.add_event_listener(ViewportEventKind::StackNavigation, stack_relay);

        assert_eq!(clone, element);
        assert_eq!(clone.listener_count(ViewportEventKind::StackNavigation), 1);
    }

    #[test]
    fn test_remounted_element_with_same_id_is_distinct() {
        let element = ElementHandle::new(ElementId(5));
        let remounted = ElementHandle::new(ElementId(5));

        assert_eq!(remounted.id(), element.id());
        assert_ne!(remounted, element);
    }
}
