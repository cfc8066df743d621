#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pixel-accurate hit testing through an off-screen identity buffer.
//!
//! Every frame each live target is painted as an opaque rectangle in its
//! identity colour. A click samples one pixel and looks the colour up among
//! the live targets, so overlapping targets resolve to the one painted last.

mod pixel_buffer;

use raven_hunt_core::{CollisionSurface, TargetId, Viewport};
use raven_hunt_world::query::TargetView;

pub use pixel_buffer::PixelBuffer;

/// Identity buffer rebuilt from the live target set once per frame.
#[derive(Debug)]
pub struct CollisionIndex<S = PixelBuffer> {
    surface: S,
}

impl CollisionIndex<PixelBuffer> {
    /// Creates an index backed by a CPU pixel buffer sized to the viewport.
    #[must_use]
    pub fn for_viewport(viewport: Viewport) -> Self {
        Self::new(PixelBuffer::for_viewport(viewport))
    }

    /// Matches the backing buffer to a new viewport.
    pub fn resize(&mut self, viewport: Viewport) {
        self.surface.resize(viewport.width(), viewport.height());
    }
}

impl<S: CollisionSurface> CollisionIndex<S> {
    /// Wraps the provided collision surface.
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    /// Surface the identity colours are painted onto.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Clears the surface and paints every target's bounding box in draw order.
    pub fn repaint(&mut self, targets: &TargetView) {
        self.surface.clear();
        for target in targets.iter() {
            self.surface
                .fill_rect(target.bounds, target.identity.to_rgba());
        }
    }

    /// Resolves a click to the first live target whose identity matches the
    /// sampled pixel.
    #[must_use]
    pub fn resolve(&self, x: i32, y: i32, targets: &TargetView) -> Option<TargetId> {
        let sample = self.surface.read_pixel(x, y)?;
        let hit = targets.find_by_sample(sample).map(|target| target.id);
        log::trace!("click at ({x}, {y}) sampled {sample:?}, resolved to {hit:?}");
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raven_hunt_core::{Canvas, Rect, Rgba};

    #[test]
    fn repaint_clears_previous_frame() {
        let mut index = CollisionIndex::new(PixelBuffer::new(4, 4));
        index
            .surface
            .fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Rgba::WHITE);

        index.repaint(&TargetView::default());

        assert!(index.surface().pixels().iter().all(|byte| *byte == 0));
        assert_eq!(index.resolve(1, 1, &TargetView::default()), None);
    }

    #[test]
    fn resize_follows_the_viewport() {
        let mut index = CollisionIndex::for_viewport(Viewport::new(4, 4));

        index.resize(Viewport::new(16, 9));

        assert_eq!(index.surface().width(), 16);
        assert_eq!(index.surface().height(), 9);
    }
}
