//! Keeps a viewport's slice scrollbar and the slice it displays in step.
//!
//! Dragging the scrollbar navigates the viewport after a short quiescence
//! window; navigation inside the viewport (wheel, keyboard, tools) moves the
//! scrollbar. See [`SliceSync`] for the lifecycle.
//!
//! Everything runs on a single-threaded `tokio::task::LocalSet`.

pub mod dataflow;
pub mod error;
pub mod scrollbar;
pub mod viewport;

mod naming_validation;

#[cfg(test)]
mod testing;

pub use error::{BridgeError, NavigationError, ResolveError};
pub use scrollbar::{SliceSync, SyncPhase};
pub use viewport::{ElementHandle, ElementId, LiveViewport, ViewportDescriptor, ViewportHost};
