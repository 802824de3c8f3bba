//! Boundary to the viewport rendering engine.
//!
//! The engine itself lives outside this crate. It is reached through
//! [`ViewportHost`] and [`LiveViewport`], and it reports navigation by
//! dispatching [`shared::ViewportEvent`]s on the viewport's [`ElementHandle`].

pub mod element;

pub use element::{ElementHandle, ElementId, ListenerId, ListenerStats};

use crate::error::NavigationError;
use futures::future::LocalBoxFuture;
use shared::{ImageId, SliceState};
use std::rc::Rc;

/// A viewport currently mounted in the engine.
pub trait LiveViewport {
    fn element(&self) -> ElementHandle;

    /// Image displayed right now; `None` while nothing is loaded.
    fn current_image_id(&self) -> Option<ImageId>;
}

/// Navigation primitives offered by the viewport engine.
pub trait ViewportHost {
    fn viewport(&self, viewport_index: usize) -> Option<Rc<dyn LiveViewport>>;

    /// Ask the engine to show `target_index`.
    ///
    /// Resolves once the engine finished the jump. The future may also never
    /// resolve; callers must not rely on completion.
    fn jump_to_slice(
        &self,
        element: &ElementHandle,
        target_index: usize,
    ) -> LocalBoxFuture<'static, Result<(), NavigationError>>;

    /// Slice position of a volumetric viewport, if one can be derived.
    fn volume_slice_state(&self, viewport: &dyn LiveViewport) -> Option<SliceState>;
}

/// How a viewport addresses its images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewportAddressing {
    Stack { image_ids: Vec<ImageId> },
    Volumetric,
}

/// Viewport data supplied by the layout. Replaced, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportDescriptor {
    pub element: ElementHandle,
    pub addressing: ViewportAddressing,
}

impl ViewportDescriptor {
    pub fn stack(element: ElementHandle, image_ids: Vec<ImageId>) -> Self {
        Self {
            element,
            addressing: ViewportAddressing::Stack { image_ids },
        }
    }

    pub fn volumetric(element: ElementHandle) -> Self {
        Self {
            element,
            addressing: ViewportAddressing::Volumetric,
        }
    }
}
