//! Single-value Actor implementation for reactive state management
//!
//! Actor owns a `Mutable<T>` together with the task that processes the
//! events allowed to change it.

use crate::dataflow::task::{Task, TaskHandle};
use futures_signals::signal::{Mutable, Signal};
use std::future::Future;
use std::rc::Rc;

/// Single-value reactive state container for Actor+Relay architecture.
///
/// # Core Principles
///
/// - **Single Point of Mutation**: Only the Actor's owner modifies its state
/// - **Sequential Processing**: Events are processed one at a time in order
/// - **Reactive Signals**: Readers bind to state changes through signals
///
/// The processor task is aborted when the last clone of the Actor is dropped.
#[derive(Clone, Debug)]
pub struct Actor<T>
where
    T: Clone + 'static,
{
    pub(crate) state: Mutable<T>,
    task_handle: Rc<TaskHandle>,
    #[cfg(debug_assertions)]
    #[allow(dead_code)]
    creation_location: &'static std::panic::Location<'static>,
}

impl<T> Actor<T>
where
    T: Clone + 'static,
{
    /// Create a new Actor with initial state and event processing loop.
    ///
    /// Must be called inside a `tokio::task::LocalSet`.
    #[track_caller]
    pub fn new<F, Fut>(initial_state: T, processor: F) -> Self
    where
        F: FnOnce(Mutable<T>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let state = Mutable::new(initial_state);
        let task_handle = Rc::new(Task::start_droppable(processor(state.clone())));

        Self {
            state,
            task_handle,
            #[cfg(debug_assertions)]
            creation_location: std::panic::Location::caller(),
        }
    }

    pub fn signal(&self) -> impl Signal<Item = T> + use<T> {
        self.state.signal_cloned()
    }

    pub fn signal_ref<U, F>(&self, f: F) -> impl Signal<Item = U> + use<T, U, F>
    where
        F: FnMut(&T) -> U + 'static,
    {
        self.state.signal_ref(f)
    }

    /// True once the processor loop has returned or was aborted.
    pub fn is_stopped(&self) -> bool {
        self.task_handle.is_finished()
    }
}
