//! Page sizes and pixel rectangles
//!
//! Page sizes are kept in source device units (pixels at the raster
//! resolution) as floats; everything on screen is integer pixels.

use crate::error::{Result, ViewportError};

/// Width and height in source device units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Size in whole pixels after applying `scale`, never smaller than 1x1
    pub fn scaled(&self, scale: f32) -> (u32, u32) {
        let width = (self.width * scale).round().max(1.0) as u32;
        let height = (self.height * scale).round().max(1.0) as u32;
        (width, height)
    }
}

/// Integer pixel rectangle; `width`/`height` of zero or less is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        let rect = Rect::new(x, y, right - x, bottom - y);
        (!rect.is_empty()).then_some(rect)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Grow on every side by `amount` (shrink if negative)
    pub fn inflate(&self, amount: i32) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + 2 * amount,
            self.height + 2 * amount,
        )
    }
}

/// Per-document page geometry, fixed for the lifetime of a loaded document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentGeometry {
    page_sizes: Vec<Size>,
    max_page_width: f32,
    total_stacked_height: f32,
}

impl DocumentGeometry {
    /// Build the geometry for `page_sizes` in page order
    ///
    /// Rejects empty documents and pages with a non-positive dimension.
    pub fn new(page_sizes: Vec<Size>) -> Result<Self> {
        if page_sizes.is_empty() {
            return Err(ViewportError::InvalidDocument(
                "document has no pages".to_string(),
            ));
        }
        if let Some(index) = page_sizes
            .iter()
            .position(|size| !(size.width > 0.0 && size.height > 0.0))
        {
            return Err(ViewportError::InvalidDocument(format!(
                "page {index} has an empty size"
            )));
        }

        let max_page_width = page_sizes
            .iter()
            .map(|size| size.width)
            .fold(0.0_f32, f32::max);
        let total_stacked_height = page_sizes.iter().map(|size| size.height).sum();

        Ok(Self {
            page_sizes,
            max_page_width,
            total_stacked_height,
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_sizes.len()
    }

    pub fn page_size(&self, index: usize) -> Option<Size> {
        self.page_sizes.get(index).copied()
    }

    pub fn page_sizes(&self) -> &[Size] {
        &self.page_sizes
    }

    pub fn max_page_width(&self) -> f32 {
        self.max_page_width
    }

    pub fn total_stacked_height(&self) -> f32 {
        self.total_stacked_height
    }

    pub fn average_page_height(&self) -> f32 {
        self.total_stacked_height / self.page_sizes.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn geometry_sums_heights_and_tracks_widest_page() {
        let geometry = DocumentGeometry::new(vec![
            Size::new(600.0, 800.0),
            Size::new(900.0, 400.0),
            Size::new(600.0, 300.0),
        ])
        .unwrap();

        assert_eq!(geometry.page_count(), 3);
        assert_eq!(geometry.max_page_width(), 900.0);
        assert_eq!(geometry.total_stacked_height(), 1500.0);
        assert_eq!(geometry.average_page_height(), 500.0);
    }

    #[test]
    fn empty_document_is_rejected() {
        let err = DocumentGeometry::new(Vec::new()).unwrap_err();
        assert!(matches!(err, ViewportError::InvalidDocument(_)));
    }

    #[test]
    fn zero_height_page_is_rejected() {
        let err = DocumentGeometry::new(vec![Size::new(600.0, 800.0), Size::new(600.0, 0.0)])
            .unwrap_err();
        assert_eq!(
            err,
            ViewportError::InvalidDocument("page 1 has an empty size".to_string())
        );
    }

    #[test]
    fn rect_intersection() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 80, 100, 100);
        assert_eq!(a.intersection(&b), Some(Rect::new(50, 80, 50, 20)));

        let c = Rect::new(100, 0, 10, 10);
        assert_eq!(a.intersection(&c), None);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn scaled_size_never_collapses() {
        assert_eq!(Size::new(600.0, 800.0).scaled(0.5), (300, 400));
        assert_eq!(Size::new(1.0, 1.0).scaled(0.001), (1, 1));
    }
}
