use std::path::Path;
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use lazy_static::lazy_static;
use pageview_core::{PageDocument, RasterResolution, Size, SourceError, VectorPage};
use pdfium_render::prelude::*;

const POINTS_PER_INCH: f32 = 72.0;

lazy_static! {
    // Loaded documents borrow the bindings for the rest of the process
    static ref PDFIUM: std::result::Result<Pdfium, String> =
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map(Pdfium::new)
            .map_err(|e| e.to_string());
}

/// PDF renderer using pdfium-render
pub struct PdfRenderer {
    pdfium: &'static Pdfium,
}

impl PdfRenderer {
    /// Bind pdfium on first use; later calls share the same binding
    pub fn new() -> Result<Self> {
        let bound: &'static std::result::Result<Pdfium, String> = &PDFIUM;
        match bound {
            Ok(pdfium) => Ok(Self { pdfium }),
            Err(e) => Err(anyhow!(
                "Failed to bind to PDFium library: {e}. Please install PDFium or download the library from https://github.com/bblanchon/pdfium-binaries"
            )),
        }
    }

    pub fn load_document(&self, path: &Path) -> Result<PdfiumDocument> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .context("Failed to load PDF document")?;
        Ok(PdfiumDocument {
            inner: Rc::new(document),
        })
    }
}

/// An open PDF exposed to the viewport as one vector page per PDF page
pub struct PdfiumDocument {
    inner: Rc<PdfDocument<'static>>,
}

impl std::fmt::Debug for PdfiumDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfiumDocument")
            .field("page_count", &self.page_count())
            .finish()
    }
}

impl PageDocument for PdfiumDocument {
    fn page_count(&self) -> usize {
        self.inner.pages().len() as usize
    }

    fn render_to_page_images(
        &self,
        resolution: &RasterResolution,
    ) -> Result<Vec<Box<dyn VectorPage>>, SourceError> {
        let pages = self.inner.pages();
        let mut images: Vec<Box<dyn VectorPage>> = Vec::with_capacity(pages.len() as usize);
        for index in 0..pages.len() {
            let page = pages.get(index).map_err(render_error)?;
            let size = device_size(page.width().value, page.height().value, resolution);
            images.push(Box::new(PdfiumPage {
                document: Rc::clone(&self.inner),
                index,
                size,
            }));
        }
        Ok(images)
    }
}

/// Page size in device pixels, shrunk to the printable area if larger
fn device_size(width_pt: f32, height_pt: f32, resolution: &RasterResolution) -> Size {
    let width = width_pt / POINTS_PER_INCH * resolution.dpi_x as f32;
    let height = height_pt / POINTS_PER_INCH * resolution.dpi_y as f32;
    let fit = (resolution.max_width as f32 / width)
        .min(resolution.max_height as f32 / height)
        .min(1.0);
    Size::new(width * fit, height * fit)
}

fn render_error(error: PdfiumError) -> SourceError {
    SourceError::Render(error.to_string())
}

struct PdfiumPage {
    document: Rc<PdfDocument<'static>>,
    index: u16,
    size: Size,
}

impl VectorPage for PdfiumPage {
    fn size(&self) -> Size {
        self.size
    }

    fn rasterize(&self, target: &mut RgbaImage) -> Result<(), SourceError> {
        let (width, height) = target.dimensions();
        let page = self
            .document
            .pages()
            .get(self.index)
            .map_err(|_| SourceError::MissingPage(self.index as usize))?;

        let render_config = PdfRenderConfig::new()
            .set_target_width(width as i32)
            .set_target_height(height as i32)
            .set_reverse_byte_order(true);
        let bitmap = page.render_with_config(&render_config).map_err(render_error)?;

        let rendered = RgbaImage::from_raw(
            bitmap.width() as u32,
            bitmap.height() as u32,
            bitmap.as_raw_bytes().to_vec(),
        )
        .ok_or_else(|| SourceError::Render("bitmap buffer is too small".to_string()))?;

        // pdfium may round an edge differently from the requested size
        *target = if rendered.dimensions() == (width, height) {
            rendered
        } else {
            imageops::resize(&rendered, width, height, FilterType::Triangle)
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn a4_page_matches_fallback_area() {
        let size = device_size(595.0, 842.0, &RasterResolution::FALLBACK);
        assert_eq!(size.scaled(1.0), (4958, 7016));
    }

    #[test]
    fn renderers_share_one_binding() {
        // Nothing to compare on machines without a pdfium library
        let (Ok(first), Ok(second)) = (PdfRenderer::new(), PdfRenderer::new()) else {
            return;
        };
        assert!(std::ptr::eq(first.pdfium, second.pdfium));
    }

    #[test]
    fn oversized_page_is_fitted() {
        let size = device_size(2000.0, 842.0, &RasterResolution::FALLBACK);
        assert!(size.width <= 4961.0);
        assert!((size.width / size.height - 2000.0 / 842.0).abs() < 1e-3);
    }
}
