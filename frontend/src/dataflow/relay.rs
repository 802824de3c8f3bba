//! Event streaming Relay
//!
//! Relay carries typed events from their source (a viewport element, the
//! scrollbar widget) to the Actor that reacts to them, over an unbounded
//! channel.

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use std::sync::{Arc, OnceLock};

/// Type-safe event streaming relay for Actor+Relay architecture.
///
/// # Event-Source Naming Convention
///
/// Relay fields follow the `{source}_{event}_relay` pattern:
/// - `element_navigated_relay` - Viewport element reported a navigation
/// - `scrollbar_dragged_relay` - User dragged the scrollbar thumb
///
/// # Examples
///
/// ```rust
/// use futures::StreamExt;
/// use slice_scrollbar::dataflow::relay;
///
/// # futures::executor::block_on(async {
/// let (element_navigated_relay, mut stream) = relay::<usize>();
/// element_navigated_relay.send(3);
/// assert_eq!(stream.next().await, Some(3));
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    sender: UnboundedSender<T>,
    #[cfg(debug_assertions)]
    emit_location: Arc<OnceLock<&'static std::panic::Location<'static>>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The receiver has been dropped
    ChannelClosed,
    /// Relay sent from more than one code location (debug builds only)
    #[cfg(debug_assertions)]
    MultipleEmitters {
        previous: &'static std::panic::Location<'static>,
        current: &'static std::panic::Location<'static>,
    },
}

impl<T> Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> (Self, UnboundedReceiver<T>) {
        let (sender, receiver) = unbounded();
        (
            Relay {
                sender,
                #[cfg(debug_assertions)]
                emit_location: Arc::new(OnceLock::new()),
            },
            receiver,
        )
    }

    /// In debug builds every relay has exactly one emitting call site.
    #[cfg(debug_assertions)]
    #[track_caller]
    fn check_single_source(&self) -> Result<(), RelayError> {
        let caller = std::panic::Location::caller();
        let previous = *self.emit_location.get_or_init(|| caller);
        if previous == caller {
            Ok(())
        } else {
            Err(RelayError::MultipleEmitters {
                previous,
                current: caller,
            })
        }
    }

    /// Send an event; it is silently dropped once the receiver is gone.
    ///
    /// Panics in debug builds when called from a second code location.
    #[track_caller]
    pub fn send(&self, value: T) {
        #[cfg(debug_assertions)]
        if let Err(e) = self.check_single_source() {
            panic!("{:?}", e);
        }

        let _ = self.sender.unbounded_send(value);
    }

    #[track_caller]
    pub fn try_send(&self, value: T) -> Result<(), RelayError> {
        #[cfg(debug_assertions)]
        self.check_single_source()?;

        self.sender
            .unbounded_send(value)
            .map_err(|_| RelayError::ChannelClosed)
    }

    /// True once the receiving side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl<T> Default for Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Disconnected relay: events are silently discarded.
    fn default() -> Self {
        let (relay, _receiver) = Self::new();
        relay
    }
}

/// Creates a new Relay with its receiving stream.
pub fn relay<T>() -> (Relay<T>, UnboundedReceiver<T>)
where
    T: Clone + Send + Sync + 'static,
{
    Relay::new()
}
