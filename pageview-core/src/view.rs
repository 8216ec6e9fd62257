//! The page viewport control
//!
//! `PageView` is the single owner of everything the viewport mutates: the
//! loaded vector pages, the layout, scroll positions and the page image
//! cache. Hosts feed it resize and input events and hand it a surface to
//! paint on.

use crate::cache::{CacheStats, PageImageCache};
use crate::config::ViewportConfig;
use crate::error::{Result, ViewportError};
use crate::geometry::{DocumentGeometry, Rect};
use crate::input::{command_for, Axis, Command, InputEvent};
use crate::layout::{Layout, ScrollRange, ScrollbarVisibility, Zoom};
use crate::paint::{PaintReport, Painter};
use crate::resolution::{default_resolution, RasterResolution};
use crate::scroll::{ScrollEffect, ScrollState};
use crate::source::{PageDocument, VectorPage};
use crate::surface::Surface;

struct LoadedDocument {
    geometry: DocumentGeometry,
    pages: Vec<Box<dyn VectorPage>>,
}

pub struct PageView {
    // Field order is drop order: cached bitmaps go before the pages they
    // were rendered from.
    cache: PageImageCache,
    document: Option<LoadedDocument>,
    layout: Option<Layout>,
    scroll: ScrollState,
    zoom: Zoom,
    client_width: u32,
    client_height: u32,
    config: ViewportConfig,
}

impl PageView {
    pub fn new(client_width: u32, client_height: u32) -> Self {
        Self::with_config(client_width, client_height, ViewportConfig::default())
    }

    pub fn with_config(client_width: u32, client_height: u32, config: ViewportConfig) -> Self {
        Self {
            cache: PageImageCache::new(config.min_cache_pages, config.max_bitmap_pixels),
            document: None,
            layout: None,
            scroll: ScrollState::default(),
            zoom: Zoom::default(),
            client_width,
            client_height,
            config,
        }
    }

    /// Load `document` at the host's default raster resolution
    pub fn load(&mut self, document: &dyn PageDocument) -> Result<()> {
        self.load_with_resolution(document, default_resolution())
    }

    /// Replace the displayed document
    ///
    /// Everything is validated before the current document is touched, so
    /// on error the previous pages stay loaded.
    pub fn load_with_resolution(
        &mut self,
        document: &dyn PageDocument,
        resolution: &RasterResolution,
    ) -> Result<()> {
        let count = document.page_count();
        if count == 0 {
            return Err(ViewportError::InvalidDocument(
                "document has no pages".to_string(),
            ));
        }
        let pages = document
            .render_to_page_images(resolution)
            .map_err(|e| ViewportError::InvalidDocument(e.to_string()))?;
        if pages.len() != count {
            return Err(ViewportError::InvalidDocument(format!(
                "document reports {count} pages but produced {} page images",
                pages.len()
            )));
        }
        let geometry = DocumentGeometry::new(pages.iter().map(|page| page.size()).collect())?;

        self.unload();
        tracing::debug!(
            pages = count,
            max_width = geometry.max_page_width(),
            total_height = geometry.total_stacked_height(),
            "document loaded"
        );
        self.document = Some(LoadedDocument { geometry, pages });
        self.scroll.rewind();
        self.relayout();
        Ok(())
    }

    /// Drop the current document, bitmaps first
    pub fn unload(&mut self) {
        self.cache.clear();
        self.document = None;
        self.layout = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn page_count(&self) -> usize {
        self.document
            .as_ref()
            .map_or(0, |document| document.geometry.page_count())
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn client_size(&self) -> (u32, u32) {
        (self.client_width, self.client_height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.client_width, self.client_height) {
            return;
        }
        self.client_width = width;
        self.client_height = height;
        self.relayout();
    }

    pub fn zoom(&self) -> f32 {
        self.zoom.value()
    }

    /// Set the zoom multiplier; values outside `[0.1, 10]` are ignored
    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        match Zoom::new(zoom) {
            Some(zoom) => self.apply_zoom(zoom),
            None => {
                tracing::debug!(zoom, "zoom out of range ignored");
                false
            }
        }
    }

    pub fn zoom_in(&mut self) -> bool {
        match self.zoom.zoomed_in() {
            Some(zoom) => self.apply_zoom(zoom),
            None => false,
        }
    }

    pub fn zoom_out(&mut self) -> bool {
        match self.zoom.zoomed_out() {
            Some(zoom) => self.apply_zoom(zoom),
            None => false,
        }
    }

    pub fn reset_zoom(&mut self) -> bool {
        self.apply_zoom(Zoom::default())
    }

    fn apply_zoom(&mut self, zoom: Zoom) -> bool {
        if zoom == self.zoom {
            return false;
        }
        self.zoom = zoom;
        self.relayout();
        true
    }

    /// Recompute layout, then discard every bitmap made for the old one
    fn relayout(&mut self) {
        let Some(document) = &self.document else {
            return;
        };
        let layout = Layout::compute(
            self.client_width,
            self.client_height,
            &document.geometry,
            self.zoom,
            &self.config,
        );
        tracing::debug!(
            previous_hit_rate = self.cache.stats().hit_rate(),
            scale = layout.scale_factor,
            visibility = ?layout.visibility,
            content_width = layout.content_width,
            content_height = layout.content_height,
            cache = layout.max_cache_size,
            "relayout"
        );
        self.cache.clear();
        self.cache.set_capacity(layout.max_cache_size);
        self.scroll.apply_layout(&layout);
        self.layout = Some(layout);
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn scale_factor(&self) -> Option<f32> {
        self.layout.as_ref().map(|layout| layout.scale_factor)
    }

    pub fn scrollbar_visibility(&self) -> ScrollbarVisibility {
        self.layout
            .as_ref()
            .map_or(ScrollbarVisibility::None, |layout| layout.visibility)
    }

    pub fn horizontal(&self) -> &ScrollRange {
        self.scroll.horizontal()
    }

    pub fn vertical(&self) -> &ScrollRange {
        self.scroll.vertical()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Apply a keyboard or wheel event
    pub fn handle_input(&mut self, event: &InputEvent) -> ScrollEffect {
        match command_for(event, self.scroll.horizontal(), self.scroll.vertical()) {
            Some(command) => self.execute(command),
            None => ScrollEffect::None,
        }
    }

    pub fn execute(&mut self, command: Command) -> ScrollEffect {
        let changed = match command {
            Command::ScrollBy { axis, delta } => return self.scroll.scroll_by(axis, delta),
            Command::ScrollTo { axis, value } => return self.scroll.scroll_to(axis, value),
            Command::ZoomIn => self.zoom_in(),
            Command::ZoomOut => self.zoom_out(),
            Command::ResetZoom => self.reset_zoom(),
        };
        if changed {
            ScrollEffect::Repaint
        } else {
            ScrollEffect::None
        }
    }

    pub fn scroll_to(&mut self, axis: Axis, value: i32) -> ScrollEffect {
        self.scroll.scroll_to(axis, value)
    }

    /// Bring the top of page `index` to the top of the viewport
    pub fn scroll_to_page(&mut self, index: usize) -> Result<ScrollEffect> {
        let top = {
            let painter = self.painter().ok_or(ViewportError::PageOutOfRange {
                page: index,
                count: 0,
            })?;
            let placement = painter.placements().nth(index).ok_or(
                ViewportError::PageOutOfRange {
                    page: index,
                    count: self.page_count(),
                },
            )?;
            placement.frame.y + self.scroll.vertical().value
        };
        Ok(self.scroll.scroll_to(Axis::Vertical, top))
    }

    /// Page shown at the top edge of the viewport
    pub fn current_page(&self) -> Option<usize> {
        let painter = self.painter()?;
        painter
            .page_at(0)
            .or_else(|| painter.visible_pages(self.viewport_rect()).next())
    }

    /// Pages that would be painted for a full repaint
    pub fn visible_pages(&self) -> std::ops::Range<usize> {
        self.painter()
            .map_or(0..0, |painter| painter.visible_pages(self.viewport_rect()))
    }

    fn viewport_rect(&self) -> Rect {
        self.layout.as_ref().map_or(Rect::default(), |layout| {
            Rect::new(0, 0, layout.available_width, layout.available_height)
        })
    }

    fn painter(&self) -> Option<Painter<'_>> {
        let layout = self.layout.as_ref()?;
        let document = self.document.as_ref()?;
        Some(Painter::new(
            layout,
            &document.geometry,
            &self.config,
            self.scroll.horizontal().value,
            self.scroll.vertical().value,
        ))
    }

    /// Repaint `clip` of `surface`
    pub fn paint(&mut self, surface: &mut dyn Surface, clip: Rect) -> Result<PaintReport> {
        let (Some(layout), Some(document)) = (self.layout.as_ref(), self.document.as_ref()) else {
            if let Some(clip) = clip.intersection(&surface.bounds()) {
                surface.fill_rect(clip, image::Rgba(self.config.background));
            }
            return Ok(PaintReport::default());
        };
        let painter = Painter::new(
            layout,
            &document.geometry,
            &self.config,
            self.scroll.horizontal().value,
            self.scroll.vertical().value,
        );
        painter.paint(surface, clip, &mut self.cache, &document.pages)
    }

    /// Realize a scroll effect on a surface holding the previous frame
    pub fn present(&mut self, surface: &mut dyn Surface, effect: ScrollEffect) -> Result<()> {
        match effect {
            ScrollEffect::None => {}
            ScrollEffect::Repaint => {
                let bounds = surface.bounds();
                self.paint(surface, bounds)?;
            }
            ScrollEffect::Blit { dx, dy } => {
                // Scrollbar gutters are outside the page area and must not move
                let Some(area) = self.viewport_rect().intersection(&surface.bounds()) else {
                    return Ok(());
                };
                for strip in surface.scroll_rect(area, dx, dy) {
                    self.paint(surface, strip)?;
                }
            }
        }
        Ok(())
    }
}
