//! Droppable tasks on the cooperative event loop.
//!
//! Every task runs on the current `tokio::task::LocalSet`, so futures may hold
//! `Rc`/`RefCell` state. Calling [`Task::start_droppable`] outside a
//! `LocalSet` panics, the same way `spawn_local` does.

use std::future::Future;
use tokio::task::AbortHandle;

pub struct Task;

impl Task {
    /// Spawn `future` and tie its lifetime to the returned handle.
    pub fn start_droppable<F>(future: F) -> TaskHandle
    where
        F: Future<Output = ()> + 'static,
    {
        let join_handle = tokio::task::spawn_local(future);
        TaskHandle {
            abort_handle: join_handle.abort_handle(),
        }
    }
}

/// Aborts its task when dropped.
#[derive(Debug)]
pub struct TaskHandle {
    abort_handle: AbortHandle,
}

impl TaskHandle {
    pub fn is_finished(&self) -> bool {
        self.abort_handle.is_finished()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.abort_handle.abort();
    }
}
