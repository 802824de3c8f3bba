//! Initial slice position of a freshly supplied viewport.

use crate::error::ResolveError;
use crate::viewport::{LiveViewport, ViewportAddressing, ViewportDescriptor, ViewportHost};
use shared::SliceState;

/// Derives the slice position from a viewport descriptor and its live viewport.
///
/// Has no side effects and never navigates. An `Err` means "no update": the
/// caller keeps whatever position it showed before.
pub struct ViewportKindResolver<'a> {
    host: &'a dyn ViewportHost,
}

impl<'a> ViewportKindResolver<'a> {
    pub fn new(host: &'a dyn ViewportHost) -> Self {
        Self { host }
    }

    pub fn resolve(
        &self,
        descriptor: &ViewportDescriptor,
        viewport: &dyn LiveViewport,
    ) -> Result<SliceState, ResolveError> {
        match &descriptor.addressing {
            ViewportAddressing::Stack { image_ids } => {
                let image_id = viewport
                    .current_image_id()
                    .ok_or(ResolveError::CurrentImageUnknown)?;
                let index = image_ids
                    .iter()
                    .position(|id| *id == image_id)
                    .ok_or(ResolveError::ImageNotInStack { image_id })?;
                Ok(SliceState::new(index, image_ids.len()))
            }
            ViewportAddressing::Volumetric => self
                .host
                .volume_slice_state(viewport)
                .map(SliceState::clamped)
                .ok_or(ResolveError::VolumeSliceUnavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeViewport, FakeViewportHost, image_ids};
    use crate::viewport::{ElementHandle, ElementId};

    fn element() -> ElementHandle {
        ElementHandle::new(ElementId(1))
    }

    #[test]
    fn test_stack_position_of_current_image() {
        let host = FakeViewportHost::new();
        let viewport = FakeViewport::new(element(), Some("c"));
        let descriptor = ViewportDescriptor::stack(element(), image_ids(&["a", "b", "c", "d"]));

        let state = ViewportKindResolver::new(&host)
            .resolve(&descriptor, &viewport)
            .unwrap();

        assert_eq!(
            state,
            SliceState {
                current_index: 2,
                total_slices: 4
            }
        );
    }

    #[test]
    fn test_stack_image_missing_from_sequence() {
        let host = FakeViewportHost::new();
        let viewport = FakeViewport::new(element(), Some("z"));
        let descriptor = ViewportDescriptor::stack(element(), image_ids(&["a", "b"]));

        let error = ViewportKindResolver::new(&host)
            .resolve(&descriptor, &viewport)
            .unwrap_err();

        assert_eq!(
            error,
            ResolveError::ImageNotInStack {
                image_id: "z".into()
            }
        );
        assert!(!error.is_derivation_miss());
    }

    #[test]
    fn test_stack_without_current_image() {
        let host = FakeViewportHost::new();
        let viewport = FakeViewport::new(element(), None);
        let descriptor = ViewportDescriptor::stack(element(), image_ids(&["a"]));

        assert_eq!(
            ViewportKindResolver::new(&host).resolve(&descriptor, &viewport),
            Err(ResolveError::CurrentImageUnknown)
        );
    }

    #[test]
    fn test_volumetric_delegates_to_host() {
        let host = FakeViewportHost::new();
        host.set_volume_slice_state(Some(SliceState::new(30, 120)));
        let viewport = FakeViewport::new(element(), None);
        let descriptor = ViewportDescriptor::volumetric(element());

        assert_eq!(
            ViewportKindResolver::new(&host).resolve(&descriptor, &viewport),
            Ok(SliceState::new(30, 120))
        );
    }

    #[test]
    fn test_volumetric_without_slice_data() {
        let host = FakeViewportHost::new();
        let viewport = FakeViewport::new(element(), Some("a"));
        let descriptor = ViewportDescriptor::volumetric(element());

        let error = ViewportKindResolver::new(&host)
            .resolve(&descriptor, &viewport)
            .unwrap_err();

        assert!(error.is_derivation_miss());
    }
}
