use std::ops::Range;

use raven_hunt_core::{Canvas, CollisionSurface, Point, Rect, Rgba, Viewport};

const CHANNELS: usize = 4;

/// CPU-side RGBA surface, four bytes per pixel in row-major order.
///
/// A pixel is covered by a shape when its centre lies inside the shape; no
/// anti-aliasing is applied, so opaque fills reproduce their colour exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a fully transparent buffer of the provided size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; byte_len(width, height)],
        }
    }

    /// Creates a buffer matching the viewport.
    #[must_use]
    pub fn for_viewport(viewport: Viewport) -> Self {
        Self::new(viewport.width(), viewport.height())
    }

    /// Reallocates the buffer when the size changes. Contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; byte_len(width, height)];
        }
    }

    /// Raw RGBA bytes.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width as usize + x) * CHANNELS
    }

    fn blend(&mut self, x: usize, y: usize, color: [u8; 4]) {
        let offset = self.offset(x, y);
        let pixel = &mut self.pixels[offset..offset + CHANNELS];
        if color[3] == u8::MAX {
            pixel.copy_from_slice(&color);
            return;
        }
        if color[3] == 0 {
            return;
        }

        // Straight-alpha source-over.
        let src_alpha = f32::from(color[3]) / 255.0;
        let dst_alpha = f32::from(pixel[3]) / 255.0;
        let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
        for channel in 0..3 {
            let src = f32::from(color[channel]) * src_alpha;
            let dst = f32::from(pixel[channel]) * dst_alpha * (1.0 - src_alpha);
            pixel[channel] = ((src + dst) / out_alpha).round().clamp(0.0, 255.0) as u8;
        }
        pixel[3] = (out_alpha * 255.0).round() as u8;
    }

    fn columns(&self, start: f32, end: f32) -> Range<usize> {
        covered(start, end, self.width)
    }

    fn rows(&self, start: f32, end: f32) -> Range<usize> {
        covered(start, end, self.height)
    }
}

impl Canvas for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear_region(&mut self, region: Rect) {
        let columns = self.columns(region.x, region.right());
        for y in self.rows(region.y, region.bottom()) {
            let start = self.offset(columns.start, y);
            let end = self.offset(columns.end, y);
            self.pixels[start..end].fill(0);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let bytes = color.to_bytes();
        let columns = self.columns(rect.x, rect.right());
        for y in self.rows(rect.y, rect.bottom()) {
            for x in columns.clone() {
                self.blend(x, y, bytes);
            }
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba) {
        if radius.is_nan() || radius <= 0.0 {
            return;
        }
        let bytes = color.to_bytes();
        let radius_sq = radius * radius;
        let columns = self.columns(center.x - radius, center.x + radius);
        for y in self.rows(center.y - radius, center.y + radius) {
            let dy = y as f32 + 0.5 - center.y;
            for x in columns.clone() {
                let dx = x as f32 + 0.5 - center.x;
                if dx * dx + dy * dy <= radius_sq {
                    self.blend(x, y, bytes);
                }
            }
        }
    }
}

impl CollisionSurface for PixelBuffer {
    fn read_pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        if x >= self.width as usize || y >= self.height as usize {
            return None;
        }
        let offset = self.offset(x, y);
        let mut sample = [0; CHANNELS];
        sample.copy_from_slice(&self.pixels[offset..offset + CHANNELS]);
        Some(sample)
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}

/// Pixel indices along one axis whose centres fall in `[start, end)`.
fn covered(start: f32, end: f32, limit: u32) -> Range<usize> {
    let limit = limit as f32;
    let first = (start - 0.5).ceil().clamp(0.0, limit) as usize;
    let last = (end - 0.5).ceil().clamp(0.0, limit) as usize;
    first..last.max(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);

    #[test]
    fn fill_covers_pixels_whose_centres_are_inside() {
        let mut buffer = PixelBuffer::new(8, 8);

        buffer.fill_rect(Rect::new(1.4, 2.6, 2.2, 1.0), RED);

        // Centres 1.5, 2.5 and 3.5 fall inside [1.4, 3.6).
        for x in 0..8 {
            let expected = (1..=3).contains(&x);
            assert_eq!(
                buffer.read_pixel(x, 3) == Some([255, 0, 0, 255]),
                expected,
                "column {x}"
            );
        }
        assert_eq!(buffer.read_pixel(2, 2), Some([0, 0, 0, 0]));
        assert_eq!(buffer.read_pixel(2, 4), Some([0, 0, 0, 0]));
    }

    #[test]
    fn fills_are_clipped_to_the_surface() {
        let mut buffer = PixelBuffer::new(4, 4);

        buffer.fill_rect(Rect::new(-10.0, -10.0, 100.0, 12.0), RED);

        assert_eq!(buffer.read_pixel(3, 1), Some([255, 0, 0, 255]));
        assert_eq!(buffer.read_pixel(3, 2), Some([0, 0, 0, 0]));
        assert_eq!(buffer.read_pixel(4, 0), None);
        assert_eq!(buffer.read_pixel(-1, 0), None);
    }

    #[test]
    fn clear_resets_to_transparent() {
        let mut buffer = PixelBuffer::new(4, 4);
        buffer.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), RED);

        buffer.clear_region(Rect::new(0.0, 0.0, 2.0, 4.0));
        assert_eq!(buffer.read_pixel(1, 1), Some([0, 0, 0, 0]));
        assert_eq!(buffer.read_pixel(2, 1), Some([255, 0, 0, 255]));

        buffer.clear();
        assert!(buffer.pixels().iter().all(|byte| *byte == 0));
    }

    #[test]
    fn translucent_fills_blend_over_existing_pixels() {
        let mut buffer = PixelBuffer::new(1, 1);
        buffer.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Rgba::WHITE);

        buffer.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Rgba::BLACK.with_alpha(0.5));

        assert_eq!(buffer.read_pixel(0, 0), Some([127, 127, 127, 255]));
    }

    #[test]
    fn circles_cover_centres_within_radius() {
        let mut buffer = PixelBuffer::new(10, 10);

        buffer.fill_circle(Point::new(5.0, 5.0), 2.0, RED);

        assert_eq!(buffer.read_pixel(4, 4), Some([255, 0, 0, 255]));
        assert_eq!(buffer.read_pixel(6, 5), Some([255, 0, 0, 255]));
        assert_eq!(buffer.read_pixel(3, 3), Some([0, 0, 0, 0]));
        assert_eq!(buffer.read_pixel(7, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn degenerate_circles_paint_nothing() {
        let mut buffer = PixelBuffer::new(4, 4);

        for radius in [0.0, -1.0, f32::NAN] {
            buffer.fill_circle(Point::new(2.0, 2.0), radius, RED);
        }

        assert!(buffer.pixels().iter().all(|byte| *byte == 0));
    }

    #[test]
    fn resize_reallocates_only_on_change() {
        let mut buffer = PixelBuffer::new(2, 2);
        buffer.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), RED);

        buffer.resize(2, 2);
        assert_eq!(buffer.read_pixel(0, 0), Some([255, 0, 0, 255]));

        buffer.resize(3, 1);
        assert_eq!(buffer.pixels().len(), 12);
        assert_eq!(buffer.read_pixel(0, 0), Some([0, 0, 0, 0]));
    }
}
