//! Slice scrollbar synchronization
//!
//! - [`slice_state`] - authoritative position and its single write path
//! - [`kind_resolver`] - initial position of a supplied viewport
//! - [`navigation_debouncer`] - scrollbar drags to viewport jumps
//! - [`event_bridge`] - viewport navigation events to scrollbar position
//! - [`slice_sync`] - per-viewport lifecycle wiring the modules above

pub mod event_bridge;
pub mod kind_resolver;
pub mod navigation_debouncer;
pub mod slice_state;
pub mod slice_sync;

pub use event_bridge::{Subscription, ViewportEventBridge};
pub use kind_resolver::ViewportKindResolver;
pub use navigation_debouncer::{NavigationDebouncer, PendingNavigationRequest};
pub use slice_state::{
    AppliedWrite, NavigationToken, SliceStore, ViewportEpoch, WriteOutcome, WriteSource,
};
pub use slice_sync::{SliceSync, SyncPhase};
