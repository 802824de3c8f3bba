use crate::viewport::ElementId;
use shared::{AddressingKind, ImageId};

/// Why a viewport's slice position could not be derived.
///
/// Never surfaced to the user; the scrollbar keeps its previous state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("viewport {viewport_index} is not mounted")]
    ViewportMissing { viewport_index: usize },
    #[error("viewport has no current image")]
    CurrentImageUnknown,
    #[error("image '{image_id}' is not part of the stack")]
    ImageNotInStack { image_id: ImageId },
    #[error("volume slice data cannot be derived")]
    VolumeSliceUnavailable,
}

impl ResolveError {
    /// Volumetric metadata miss, as opposed to a lookup miss.
    pub fn is_derivation_miss(&self) -> bool {
        matches!(self, ResolveError::VolumeSliceUnavailable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("viewport {viewport_index} disappeared before navigating")]
    ViewportGone { viewport_index: usize },
    #[error("jump to slice {target_index} failed: {reason}")]
    JumpFailed { target_index: usize, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("{kind} listener already attached to {element}")]
    AlreadyAttached {
        element: ElementId,
        kind: AddressingKind,
    },
}
