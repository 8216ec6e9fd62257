//! Virtualized page painting
//!
//! Page positions are derived from the layout and the current scroll values
//! on every paint. Pages whose frame misses the clip rectangle are skipped
//! before the cache is consulted, so the cost of a frame depends on the
//! viewport, not on the document length.

use std::ops::Range;

use image::Rgba;

use crate::cache::PageImageCache;
use crate::config::ViewportConfig;
use crate::error::{Result, ViewportError};
use crate::geometry::{DocumentGeometry, Rect};
use crate::layout::Layout;
use crate::source::VectorPage;
use crate::surface::Surface;

/// Where one page lands on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlacement {
    pub index: usize,
    /// Page plus margin and shadow
    pub frame: Rect,
    /// The page bitmap itself
    pub page: Rect,
}

/// What a paint call drew
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaintReport {
    pub painted: Vec<usize>,
    /// Pages left blank because they failed to rasterize
    pub failed: Vec<usize>,
}

pub struct Painter<'a> {
    layout: &'a Layout,
    geometry: &'a DocumentGeometry,
    config: &'a ViewportConfig,
    horizontal_offset: i32,
    vertical_offset: i32,
}

impl<'a> Painter<'a> {
    pub fn new(
        layout: &'a Layout,
        geometry: &'a DocumentGeometry,
        config: &'a ViewportConfig,
        horizontal_offset: i32,
        vertical_offset: i32,
    ) -> Self {
        Self {
            layout,
            geometry,
            config,
            horizontal_offset,
            vertical_offset,
        }
    }

    /// Left edge of the page column
    fn column_x(&self) -> i32 {
        if self.layout.visibility.horizontal() {
            -self.horizontal_offset
        } else {
            (self.layout.available_width - self.layout.content_width) / 2
        }
    }

    /// Every page's placement, top to bottom
    pub fn placements(&self) -> impl Iterator<Item = PagePlacement> + '_ {
        let allowance = self.config.frame_allowance() as i32;
        let margin = self.config.page_margin as i32;
        let column_x = self.column_x();
        let column_width = self.layout.content_width - allowance;
        let scale = self.layout.scale_factor;

        let mut y = -self.vertical_offset;
        self.geometry
            .page_sizes()
            .iter()
            .enumerate()
            .map(move |(index, size)| {
                let (width, height) = size.scaled(scale);
                let (width, height) = (width as i32, height as i32);
                let frame = Rect::new(column_x, y, column_width + allowance, height + allowance);
                let page = Rect::new(
                    column_x + margin + (column_width - width) / 2,
                    y + margin,
                    width,
                    height,
                );
                y += frame.height;
                PagePlacement { index, frame, page }
            })
    }

    /// Indices of pages whose frame intersects `clip`
    pub fn visible_pages(&self, clip: Rect) -> Range<usize> {
        let mut visible = self
            .placements()
            .take_while(|placement| placement.frame.y < clip.bottom())
            .filter(|placement| placement.frame.intersects(&clip))
            .map(|placement| placement.index);
        match visible.next() {
            Some(first) => {
                let last = visible.last().unwrap_or(first);
                first..last + 1
            }
            None => 0..0,
        }
    }

    /// Page whose frame covers screen row `y`
    pub fn page_at(&self, y: i32) -> Option<usize> {
        self.placements()
            .find(|placement| placement.frame.y <= y && y < placement.frame.bottom())
            .map(|placement| placement.index)
    }

    /// Repaint exactly `clip`
    ///
    /// A page that fails to rasterize is left blank and reported; running
    /// out of bitmap memory aborts the paint.
    pub fn paint(
        &self,
        surface: &mut dyn Surface,
        clip: Rect,
        cache: &mut PageImageCache,
        pages: &[Box<dyn VectorPage>],
    ) -> Result<PaintReport> {
        let mut report = PaintReport::default();
        let Some(clip) = clip.intersection(&surface.bounds()) else {
            return Ok(report);
        };

        let shadow = self.config.shadow_size as i32;
        surface.fill_rect(clip, Rgba(self.config.background));

        for placement in self.placements() {
            if placement.frame.y >= clip.bottom() {
                break;
            }
            if !placement.frame.intersects(&clip) {
                continue;
            }
            let PagePlacement { index, page, .. } = placement;
            let source = pages.get(index).ok_or(ViewportError::PageOutOfRange {
                page: index,
                count: pages.len(),
            })?;
            tracing::trace!(page = index, ?page, "painting page");

            if shadow > 0 {
                if let Some(area) = page.translate(shadow, shadow).intersection(&clip) {
                    surface.fill_rect(area, Rgba(self.config.shadow_color));
                }
            }
            if let Some(area) = page.intersection(&clip) {
                surface.fill_rect(area, Rgba(self.config.page_color));
                match cache.get(index, page.width as u32, page.height as u32, source.as_ref()) {
                    Ok(bitmap) => {
                        surface.draw_bitmap(bitmap, area.translate(-page.x, -page.y), area.x, area.y);
                        report.painted.push(index);
                    }
                    Err(ViewportError::Rasterization { reason, .. }) => {
                        tracing::warn!(page = index, %reason, "page left blank");
                        report.failed.push(index);
                    }
                    Err(e) => return Err(e),
                }
            }
            surface.stroke_rect(page.inflate(1), clip, Rgba(self.config.border_color));
        }

        Ok(report)
    }
}
