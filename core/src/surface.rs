//! Drawing contracts implemented by visible and off-screen surfaces.
//!
//! The simulation only ever talks to these traits. The visible surface is
//! usually a draw-list recorder replayed by a windowing backend, while the
//! collision surface is a CPU pixel buffer that can be sampled.

use crate::{Point, Rect, Rgba, SpriteKey};

/// Primitive operations shared by every surface.
pub trait Canvas {
    /// Width of the surface in pixels.
    fn width(&self) -> u32;

    /// Height of the surface in pixels.
    fn height(&self) -> u32;

    /// Resets the provided region to fully transparent.
    fn clear_region(&mut self, region: Rect);

    /// Fills an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// Fills a circle.
    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba);

    /// Resets the whole surface to fully transparent.
    fn clear(&mut self) {
        let region = Rect::new(0.0, 0.0, self.width() as f32, self.height() as f32);
        self.clear_region(region);
    }
}

/// Surface shown to the player.
pub trait RenderSurface: Canvas {
    /// Copies `source` from the sprite sheet into `destination`, scaling as needed.
    fn blit_sprite(&mut self, sprite: SpriteKey, source: Rect, destination: Rect);

    /// Draws a single line of text anchored at `position` (the baseline).
    fn draw_text(&mut self, text: &str, position: Point, style: TextStyle);
}

/// Off-screen surface that can be sampled pixel by pixel.
pub trait CollisionSurface: Canvas {
    /// Reads the RGBA sample at the provided pixel, if it lies on the surface.
    fn read_pixel(&self, x: i32, y: i32) -> Option<[u8; 4]>;
}

/// Horizontal anchoring applied to drawn text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum TextAlign {
    /// The anchor marks the left end of the text.
    #[default]
    Left,
    /// The anchor marks the horizontal centre of the text.
    Center,
}

/// Font size, fill and alignment applied to drawn text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size: f32,
    /// Fill colour.
    pub color: Rgba,
    /// Horizontal alignment relative to the anchor.
    pub align: TextAlign,
}

impl TextStyle {
    /// Creates a left-aligned style.
    #[must_use]
    pub const fn new(size: f32, color: Rgba) -> Self {
        Self {
            size,
            color,
            align: TextAlign::Left,
        }
    }

    /// Overrides the alignment.
    #[must_use]
    pub const fn with_align(self, align: TextAlign) -> Self {
        Self { align, ..self }
    }
}
