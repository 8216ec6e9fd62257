//! Viewport layout: scale factor, scrollbar visibility and ranges
//!
//! The scale factor is height driven: at zoom 1.0 a page of average height
//! fills the available client height. Because scrollbars take client space
//! and client space drives the scale, visibility is resolved in two passes:
//! first with both scrollbars reserved, then, if the content turns out to be
//! narrow enough, again without the horizontal one. A horizontal scrollbar
//! dropped in the second pass is never re-added even if the larger scale
//! would need it.

use crate::config::ViewportConfig;
use crate::geometry::DocumentGeometry;

/// User zoom multiplier, always within `[Zoom::MIN, Zoom::MAX]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom(f32);

impl Zoom {
    pub const MIN: f32 = 0.1;
    pub const MAX: f32 = 10.0;
    pub const STEP: f32 = 1.1;
    pub const DEFAULT: f32 = 1.0;

    /// `None` when `value` is outside the accepted range
    pub fn new(value: f32) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn zoomed_in(self) -> Option<Self> {
        Self::new(self.0 * Self::STEP)
    }

    pub fn zoomed_out(self) -> Option<Self> {
        Self::new(self.0 / Self::STEP)
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollbarVisibility {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl ScrollbarVisibility {
    pub fn from_flags(horizontal: bool, vertical: bool) -> Self {
        match (horizontal, vertical) {
            (true, true) => Self::Both,
            (true, false) => Self::Horizontal,
            (false, true) => Self::Vertical,
            (false, false) => Self::None,
        }
    }

    pub fn horizontal(self) -> bool {
        matches!(self, Self::Horizontal | Self::Both)
    }

    pub fn vertical(self) -> bool {
        matches!(self, Self::Vertical | Self::Both)
    }
}

/// One scrollbar's range; the value lives in `[0, maximum - page_size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollRange {
    pub maximum: i32,
    pub page_size: i32,
    pub small_step: i32,
    pub value: i32,
    pub visible: bool,
}

impl ScrollRange {
    fn new(content: i32, available: i32, visible: bool) -> Self {
        let page_size = available.max(1);
        Self {
            maximum: content.max(0),
            page_size,
            small_step: (page_size / 10).max(1),
            value: 0,
            visible,
        }
    }

    /// Largest value the thumb can reach
    pub fn max_value(&self) -> i32 {
        if self.visible {
            (self.maximum - self.page_size).max(0)
        } else {
            0
        }
    }

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(0, self.max_value())
    }

    /// Position as a fraction of `maximum`
    pub fn ratio(&self) -> f64 {
        if self.maximum > 0 {
            f64::from(self.value) / f64::from(self.maximum)
        } else {
            0.0
        }
    }

    /// Value for the same fractional position in this range
    pub fn value_for_ratio(&self, ratio: f64) -> i32 {
        self.clamp((ratio * f64::from(self.maximum)).round() as i32)
    }
}

/// Result of a layout pass
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub scale_factor: f32,
    pub visibility: ScrollbarVisibility,
    /// Client area left after the visible scrollbars
    pub available_width: i32,
    pub available_height: i32,
    /// Full scrollable extent including margins and shadows
    pub content_width: i32,
    pub content_height: i32,
    pub horizontal: ScrollRange,
    pub vertical: ScrollRange,
    pub max_cache_size: usize,
}

struct Pass {
    scale: f32,
    content_width: i32,
    content_height: i32,
    degenerate: bool,
}

impl Layout {
    /// Lay out `geometry` in a `client_width` x `client_height` area
    ///
    /// Pure: identical inputs give identical layouts. Scroll values in the
    /// returned ranges are zero; carrying positions over is up to the caller.
    pub fn compute(
        client_width: u32,
        client_height: u32,
        geometry: &DocumentGeometry,
        zoom: Zoom,
        config: &ViewportConfig,
    ) -> Self {
        let client_width = client_width as i32;
        let client_height = client_height as i32;
        let thickness = config.scrollbar_thickness as i32;

        let reserved_width = (client_width - thickness).max(0);
        let reserved_height = (client_height - thickness).max(0);

        let mut pass = Self::pass(reserved_height, geometry, zoom, config);
        let horizontal = pass.content_width > reserved_width;
        let mut basis_height = reserved_height;
        if !horizontal {
            basis_height = client_height.max(0);
            pass = Self::pass(basis_height, geometry, zoom, config);
        }
        let vertical = pass.degenerate || pass.content_height > basis_height;

        let visibility = ScrollbarVisibility::from_flags(horizontal, vertical);
        let available_width = if vertical { reserved_width } else { client_width.max(0) };
        let available_height = if horizontal { reserved_height } else { client_height.max(0) };

        let max_cache_size =
            Self::cache_capacity(available_height, pass.scale, geometry, config);

        Self {
            scale_factor: pass.scale,
            visibility,
            available_width,
            available_height,
            content_width: pass.content_width,
            content_height: pass.content_height,
            horizontal: ScrollRange::new(pass.content_width, available_width, horizontal),
            vertical: ScrollRange::new(pass.content_height, available_height, vertical),
            max_cache_size,
        }
    }

    /// Scale factor for a height-driven fit of the average page
    pub fn scale_for_height(
        available_height: i32,
        geometry: &DocumentGeometry,
        zoom: Zoom,
        config: &ViewportConfig,
    ) -> f32 {
        Self::scale_basis(available_height, config).0 / geometry.average_page_height()
            * zoom.value()
    }

    fn scale_basis(available_height: i32, config: &ViewportConfig) -> (f32, bool) {
        let basis = available_height as f32 - config.frame_allowance();
        if basis <= 0.0 {
            (1.0, true)
        } else {
            (basis, false)
        }
    }

    fn pass(
        available_height: i32,
        geometry: &DocumentGeometry,
        zoom: Zoom,
        config: &ViewportConfig,
    ) -> Pass {
        let degenerate = Self::scale_basis(available_height, config).1;
        let scale = Self::scale_for_height(available_height, geometry, zoom, config);
        let allowance = config.frame_allowance() as i32;

        let content_height = geometry
            .page_sizes()
            .iter()
            .map(|size| size.scaled(scale).1 as i32 + allowance)
            .sum();
        let content_width = geometry
            .page_sizes()
            .iter()
            .map(|size| size.scaled(scale).0 as i32)
            .max()
            .unwrap_or(0)
            + allowance;

        Pass {
            scale,
            content_width,
            content_height,
            degenerate,
        }
    }

    fn cache_capacity(
        available_height: i32,
        scale: f32,
        geometry: &DocumentGeometry,
        config: &ViewportConfig,
    ) -> usize {
        let page_height = geometry.average_page_height() * scale + config.frame_allowance();
        let pages = (available_height.max(0) as f32 * config.cache_screens as f32 / page_height)
            .floor() as usize;
        pages.max(config.min_cache_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use pretty_assertions::assert_eq;

    fn three_pages() -> DocumentGeometry {
        DocumentGeometry::new(vec![Size::new(600.0, 800.0); 3]).unwrap()
    }

    fn layout(width: u32, height: u32, zoom: f32) -> Layout {
        Layout::compute(
            width,
            height,
            &three_pages(),
            Zoom::new(zoom).unwrap(),
            &ViewportConfig::default(),
        )
    }

    #[test]
    fn zoom_rejects_out_of_range() {
        assert!(Zoom::new(11.0).is_none());
        assert!(Zoom::new(0.05).is_none());
        assert!(Zoom::new(f32::NAN).is_none());
        assert_eq!(Zoom::new(10.0).map(Zoom::value), Some(10.0));
        assert_eq!(Zoom::new(0.1).map(Zoom::value), Some(0.1));
    }

    #[test]
    fn zoom_steps_stop_at_bounds() {
        let zoom = Zoom::new(9.5).unwrap();
        assert!(zoom.zoomed_in().is_none());
        let zoom = Zoom::new(0.105).unwrap();
        assert!(zoom.zoomed_out().is_none());
        let zoom = Zoom::default().zoomed_in().unwrap();
        assert!((zoom.value() - 1.1).abs() < 1e-6);
    }

    #[test]
    fn narrow_document_gets_vertical_scrollbar_only() {
        let layout = layout(800, 600, 1.0);
        assert_eq!(layout.visibility, ScrollbarVisibility::Vertical);
        // Second pass dropped the horizontal reservation: basis is 600 - 20
        assert!((layout.scale_factor - 0.725).abs() < 1e-6);
        assert_eq!(layout.content_height, 1800);
        assert_eq!(layout.available_width, 784);
        assert_eq!(layout.available_height, 600);
        assert_eq!(layout.vertical.max_value(), 1200);
        assert_eq!(layout.horizontal.max_value(), 0);
        assert_eq!(layout.vertical.small_step, 60);
    }

    #[test]
    fn halving_width_adds_horizontal_scrollbar() {
        let wide = layout(800, 600, 1.0);
        let narrow = layout(400, 600, 1.0);
        assert!(!wide.visibility.horizontal());
        assert!(narrow.visibility.horizontal());
        assert_eq!(narrow.visibility, ScrollbarVisibility::Both);
    }

    #[test]
    fn horizontal_scrollbar_costs_scale_height() {
        let before = layout(800, 600, 1.8);
        let after = layout(800, 600, 1.82);
        assert!(!before.visibility.horizontal());
        assert!(after.visibility.horizontal());
        assert!(after.scale_factor < before.scale_factor);
    }

    #[test]
    fn single_page_fits_exactly_at_zoom_one() {
        let geometry = DocumentGeometry::new(vec![Size::new(600.0, 800.0)]).unwrap();
        let layout = Layout::compute(
            800,
            600,
            &geometry,
            Zoom::default(),
            &ViewportConfig::default(),
        );
        assert_eq!(layout.visibility, ScrollbarVisibility::None);
        assert_eq!(layout.content_height, 600);
    }

    #[test]
    fn scale_for_height_fits_average_page() {
        let config = ViewportConfig::default();
        let scale = Layout::scale_for_height(600, &three_pages(), Zoom::default(), &config);
        assert!((scale - 0.725).abs() < 1e-6);
        let doubled = Layout::scale_for_height(600, &three_pages(), Zoom::new(2.0).unwrap(), &config);
        assert!((doubled - 1.45).abs() < 1e-6);
        // no room left after the frame allowance
        let tiny = Layout::scale_for_height(10, &three_pages(), Zoom::default(), &config);
        assert!((tiny - 1.0 / 800.0).abs() < 1e-9);
    }

    #[test]
    fn compute_is_idempotent() {
        assert_eq!(layout(640, 480, 2.3), layout(640, 480, 2.3));
    }

    #[test]
    fn tiny_viewport_forces_vertical_scrollbar() {
        let layout = layout(100, 10, 1.0);
        assert!(layout.scale_factor > 0.0);
        assert!(layout.scale_factor.is_finite());
        assert!(layout.visibility.vertical());
    }

    #[test]
    fn cache_capacity_covers_three_screens() {
        assert_eq!(layout(800, 600, 1.0).max_cache_size, 3);
        // Zoomed out, more pages fit per screen
        assert!(layout(800, 600, 0.25).max_cache_size > 3);
        // Zoomed in, capacity never drops below the minimum
        assert_eq!(layout(800, 600, 10.0).max_cache_size, 2);
    }

    #[test]
    fn ranges_clamp_and_map_ratios() {
        let range = ScrollRange::new(1000, 200, true);
        assert_eq!(range.max_value(), 800);
        assert_eq!(range.clamp(-5), 0);
        assert_eq!(range.clamp(900), 800);
        assert_eq!(range.value_for_ratio(0.5), 500);

        let hidden = ScrollRange::new(100, 200, false);
        assert_eq!(hidden.clamp(50), 0);
    }
}
