use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use iced::widget::image::Handle;
use image::Rgba;
use pageview_core::{
    FrameBuffer, InputEvent, PageView, Rect, ScrollEffect, Surface, ViewportConfig, Zoom,
};

use crate::renderer::PdfRenderer;

const TRACK_COLOR: Rgba<u8> = Rgba([0x30, 0x30, 0x30, 0xff]);
const THUMB_COLOR: Rgba<u8> = Rgba([0xa0, 0xa0, 0xa0, 0xff]);

/// An open PDF shown through a page viewport, with the last rendered frame
pub struct PdfViewer {
    path: PathBuf,
    view: PageView,
    frame: FrameBuffer,
    handle: Handle,
}

impl std::fmt::Debug for PdfViewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfViewer")
            .field("path", &self.path)
            .field("page_count", &self.view.page_count())
            .field("zoom", &self.view.zoom())
            .finish()
    }
}

impl PdfViewer {
    /// Open a PDF file into a `width` x `height` viewport
    pub fn open(
        path: &Path,
        config: ViewportConfig,
        zoom: f32,
        (width, height): (u32, u32),
    ) -> Result<Self> {
        let renderer = PdfRenderer::new()?;
        let document = renderer.load_document(path)?;

        let mut view = PageView::with_config(width, height, config);
        view.load(&document)
            .with_context(|| format!("Failed to display {}", path.display()))?;
        if Zoom::new(zoom).is_none() {
            tracing::warn!(zoom, "initial zoom out of range, using 100%");
        }
        view.set_zoom(zoom);

        let frame = FrameBuffer::new(width, height);
        let handle = Handle::from_rgba(width, height, frame.to_rgba());
        let mut viewer = Self {
            path: path.to_path_buf(),
            view,
            frame,
            handle,
        };
        viewer.present(ScrollEffect::Repaint);
        Ok(viewer)
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled")
            .to_string()
    }

    pub fn page_count(&self) -> usize {
        self.view.page_count()
    }

    pub fn current_page(&self) -> usize {
        self.view.current_page().unwrap_or(0)
    }

    pub fn zoom(&self) -> f32 {
        self.view.zoom()
    }

    /// Last rendered frame, ready for an image widget
    pub fn frame(&self) -> Handle {
        self.handle.clone()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.view.client_size() == (width, height) {
            return;
        }
        self.view.resize(width, height);
        self.frame.resize(width, height);
        self.present(ScrollEffect::Repaint);
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        self.handle_inputs([event]);
    }

    /// Apply several events and bring the frame up to date once
    pub fn handle_inputs(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        let effect = events.into_iter().fold(ScrollEffect::None, |effect, event| {
            effect.merge(self.view.handle_input(&event))
        });
        self.present(effect);
    }

    pub fn zoom_in(&mut self) {
        if self.view.zoom_in() {
            self.present(ScrollEffect::Repaint);
        }
    }

    pub fn zoom_out(&mut self) {
        if self.view.zoom_out() {
            self.present(ScrollEffect::Repaint);
        }
    }

    pub fn reset_zoom(&mut self) {
        if self.view.reset_zoom() {
            self.present(ScrollEffect::Repaint);
        }
    }

    pub fn go_to_page(&mut self, page: usize) {
        match self.view.scroll_to_page(page) {
            Ok(effect) => self.present(effect),
            Err(e) => tracing::warn!("Cannot go to page {}: {}", page + 1, e),
        }
    }

    fn present(&mut self, effect: ScrollEffect) {
        if effect == ScrollEffect::None {
            return;
        }
        if let Err(e) = self.view.present(&mut self.frame, effect) {
            tracing::error!("Failed to paint {}: {}", self.file_name(), e);
        }
        self.draw_scrollbars();
        self.handle = Handle::from_rgba(self.frame.width(), self.frame.height(), self.frame.to_rgba());
    }

    fn draw_scrollbars(&mut self) {
        let Some(layout) = self.view.layout() else {
            return;
        };
        let thickness = self.view.config().scrollbar_thickness as i32;
        let (horizontal, vertical) = (*self.view.horizontal(), *self.view.vertical());

        if vertical.visible {
            let track = Rect::new(layout.available_width, 0, thickness, layout.available_height);
            self.frame.fill_rect(track, TRACK_COLOR);
            let (start, length) = thumb(vertical.value, vertical.page_size, vertical.maximum, track.height);
            self.frame
                .fill_rect(Rect::new(track.x + 2, start, thickness - 4, length), THUMB_COLOR);
        }
        if horizontal.visible {
            let track = Rect::new(0, layout.available_height, layout.available_width, thickness);
            self.frame.fill_rect(track, TRACK_COLOR);
            let (start, length) = thumb(horizontal.value, horizontal.page_size, horizontal.maximum, track.width);
            self.frame
                .fill_rect(Rect::new(start, track.y + 2, length, thickness - 4), THUMB_COLOR);
        }
    }
}

/// Thumb offset and length along a track
fn thumb(value: i32, page_size: i32, maximum: i32, track: i32) -> (i32, i32) {
    if maximum <= 0 {
        return (0, track);
    }
    let scale = track as f64 / maximum as f64;
    let length = ((page_size as f64 * scale).round() as i32).clamp(8.min(track), track);
    let start = ((value as f64 * scale).round() as i32).min(track - length);
    (start, length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn thumb_tracks_value() {
        assert_eq!(thumb(0, 600, 1800, 600), (0, 200));
        assert_eq!(thumb(1200, 600, 1800, 600), (400, 200));
        assert_eq!(thumb(0, 10, 0, 300), (0, 300));
    }

    #[test]
    fn thumb_has_minimum_length() {
        assert_eq!(thumb(0, 1, 100_000, 500).1, 8);
    }
}
