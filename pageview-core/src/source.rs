//! Interfaces the viewport needs from a page-description source

use image::RgbaImage;

use crate::error::SourceError;
use crate::geometry::Size;
use crate::resolution::RasterResolution;

/// An opened document that can be turned into one vector image per page
pub trait PageDocument {
    fn page_count(&self) -> usize;

    /// Convert every page to a vector image at `resolution`, in page order
    fn render_to_page_images(
        &self,
        resolution: &RasterResolution,
    ) -> Result<Vec<Box<dyn VectorPage>>, SourceError>;
}

/// A single page in rescalable form
pub trait VectorPage {
    /// Intrinsic size in device pixels at the resolution it was made for
    fn size(&self) -> Size;

    /// Draw the page scaled to fill `target` exactly
    fn rasterize(&self, target: &mut RgbaImage) -> Result<(), SourceError>;
}
