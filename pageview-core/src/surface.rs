//! Drawing target for the paint driver

use image::{Rgba, RgbaImage};

use crate::geometry::Rect;

/// What the paint driver needs from a graphics layer
pub trait Surface {
    fn bounds(&self) -> Rect;

    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>);

    /// Copy `src` (in bitmap coordinates) so its top-left lands on `(x, y)`
    fn draw_bitmap(&mut self, bitmap: &RgbaImage, src: Rect, x: i32, y: i32);

    /// Shift the pixels inside `area` by `(dx, dy)` and return the strips of
    /// `area` that no longer hold valid content. Pixels outside `area` are
    /// left alone.
    fn scroll_rect(&mut self, area: Rect, dx: i32, dy: i32) -> Vec<Rect>;

    /// `scroll_rect` over the whole surface
    fn scroll(&mut self, dx: i32, dy: i32) -> Vec<Rect> {
        let bounds = self.bounds();
        self.scroll_rect(bounds, dx, dy)
    }

    /// One pixel outline of `rect`, limited to `clip`
    fn stroke_rect(&mut self, rect: Rect, clip: Rect, color: Rgba<u8>) {
        let edges = [
            Rect::new(rect.x, rect.y, rect.width, 1),
            Rect::new(rect.x, rect.bottom() - 1, rect.width, 1),
            Rect::new(rect.x, rect.y, 1, rect.height),
            Rect::new(rect.right() - 1, rect.y, 1, rect.height),
        ];
        for edge in edges {
            if let Some(edge) = edge.intersection(&clip) {
                self.fill_rect(edge, color);
            }
        }
    }
}

/// In-memory RGBA frame, what the viewer hands to the window each frame
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    image: RgbaImage,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Reallocate for a new size; the old contents are dropped
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.image.dimensions() != (width, height) {
            self.image = RgbaImage::new(width, height);
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Copy of the raw RGBA bytes
    pub fn to_rgba(&self) -> Vec<u8> {
        self.image.as_raw().clone()
    }
}

impl Surface for FrameBuffer {
    fn bounds(&self) -> Rect {
        Rect::from_size(self.image.width(), self.image.height())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        let Some(rect) = rect.intersection(&self.bounds()) else {
            return;
        };
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.image.put_pixel(x as u32, y as u32, color);
            }
        }
    }

    fn draw_bitmap(&mut self, bitmap: &RgbaImage, src: Rect, x: i32, y: i32) {
        let Some(src) = src.intersection(&Rect::from_size(bitmap.width(), bitmap.height())) else {
            return;
        };
        let dest = Rect::new(x, y, src.width, src.height);
        let Some(visible) = dest.intersection(&self.bounds()) else {
            return;
        };
        let (offset_x, offset_y) = (src.x - x, src.y - y);
        for dy in visible.y..visible.bottom() {
            for dx in visible.x..visible.right() {
                let pixel = *bitmap.get_pixel((dx + offset_x) as u32, (dy + offset_y) as u32);
                self.image.put_pixel(dx as u32, dy as u32, pixel);
            }
        }
    }

    fn scroll_rect(&mut self, area: Rect, dx: i32, dy: i32) -> Vec<Rect> {
        let Some(area) = area.intersection(&self.bounds()) else {
            return Vec::new();
        };
        if dx == 0 && dy == 0 {
            return Vec::new();
        }
        if dx.abs() >= area.width || dy.abs() >= area.height {
            return vec![area];
        }

        let stride = self.image.width() as usize * 4;
        let (dest_col, src_col, cols) = if dx >= 0 {
            (area.x + dx, area.x, area.width - dx)
        } else {
            (area.x, area.x - dx, area.width + dx)
        };
        let row_bytes = cols as usize * 4;
        let buffer: &mut [u8] = &mut self.image;
        let mut copy_row = |dest_row: i32| {
            let src_row = (dest_row - dy) as usize;
            let src = src_row * stride + src_col as usize * 4;
            let dest = dest_row as usize * stride + dest_col as usize * 4;
            buffer.copy_within(src..src + row_bytes, dest);
        };
        // Walk rows so a source row is read before it is overwritten
        if dy > 0 {
            (area.y + dy..area.bottom()).rev().for_each(&mut copy_row);
        } else {
            (area.y..area.bottom() + dy).for_each(&mut copy_row);
        }

        let mut exposed = Vec::with_capacity(2);
        if dy > 0 {
            exposed.push(Rect::new(area.x, area.y, area.width, dy));
        } else if dy < 0 {
            exposed.push(Rect::new(area.x, area.bottom() + dy, area.width, -dy));
        }
        if dx > 0 {
            exposed.push(Rect::new(area.x, area.y, dx, area.height));
        } else if dx < 0 {
            exposed.push(Rect::new(area.right() + dx, area.y, -dx, area.height));
        }
        exposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    #[test]
    fn fill_is_clipped_to_bounds() {
        let mut frame = FrameBuffer::new(4, 4);
        frame.fill_rect(Rect::new(-2, 2, 10, 10), RED);
        assert_eq!(frame.pixel(0, 2), RED);
        assert_eq!(frame.pixel(3, 3), RED);
        assert_eq!(frame.pixel(0, 1), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn draw_bitmap_copies_sub_rectangle() {
        let mut bitmap = RgbaImage::new(4, 4);
        bitmap.put_pixel(2, 3, BLUE);
        let mut frame = FrameBuffer::new(8, 8);

        frame.draw_bitmap(&bitmap, Rect::new(2, 2, 2, 2), 5, 5);

        assert_eq!(frame.pixel(5, 6), BLUE);
        assert_eq!(frame.pixel(2, 3), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn scroll_up_shifts_rows_and_exposes_bottom() {
        let mut frame = FrameBuffer::new(3, 5);
        frame.fill_rect(Rect::new(0, 3, 3, 1), RED);

        let exposed = frame.scroll(0, -2);

        assert_eq!(exposed, vec![Rect::new(0, 3, 3, 2)]);
        assert_eq!(frame.pixel(1, 1), RED);
    }

    #[test]
    fn scroll_down_and_left() {
        let mut frame = FrameBuffer::new(5, 5);
        frame.fill_rect(Rect::new(2, 1, 1, 1), BLUE);

        let exposed = frame.scroll(-1, 2);

        assert_eq!(frame.pixel(1, 3), BLUE);
        assert_eq!(
            exposed,
            vec![Rect::new(0, 0, 5, 2), Rect::new(4, 0, 1, 5)]
        );
    }

    #[test]
    fn scroll_past_extent_exposes_everything() {
        let mut frame = FrameBuffer::new(5, 5);
        assert_eq!(frame.scroll(0, 9), vec![frame.bounds()]);
        assert!(frame.scroll(0, 0).is_empty());
    }

    #[test]
    fn scroll_rect_leaves_outside_pixels() {
        let mut frame = FrameBuffer::new(6, 6);
        // gutter column and row outside the scrolled area
        frame.fill_rect(Rect::new(5, 0, 1, 6), RED);
        frame.fill_rect(Rect::new(0, 5, 6, 1), RED);
        frame.fill_rect(Rect::new(1, 3, 1, 1), BLUE);

        let exposed = frame.scroll_rect(Rect::new(0, 0, 5, 5), 0, -2);

        assert_eq!(exposed, vec![Rect::new(0, 3, 5, 2)]);
        assert_eq!(frame.pixel(1, 1), BLUE);
        // nothing from the bottom row was pulled into the area
        assert_eq!(frame.pixel(2, 3), Rgba([0, 0, 0, 0]));
        assert_eq!(frame.pixel(5, 2), RED);
        assert_eq!(frame.pixel(3, 5), RED);
    }

    #[test]
    fn stroke_draws_outline_inside_clip() {
        let mut frame = FrameBuffer::new(6, 6);
        frame.stroke_rect(Rect::new(1, 1, 4, 4), Rect::new(0, 0, 6, 3), RED);
        assert_eq!(frame.pixel(1, 1), RED);
        assert_eq!(frame.pixel(4, 2), RED);
        assert_eq!(frame.pixel(2, 2), Rgba([0, 0, 0, 0]));
        // bottom edge lies outside the clip
        assert_eq!(frame.pixel(2, 4), Rgba([0, 0, 0, 0]));
    }
}
