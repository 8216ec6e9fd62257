#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use image::RgbaImage;
use pageview_core::{PageDocument, RasterResolution, Size, SourceError, VectorPage};

/// Document of flat-coloured pages that counts rasterizations
#[derive(Clone, Default)]
pub struct FakeDocument {
    pub sizes: Vec<Size>,
    pub broken: Vec<usize>,
    pub renders: Rc<Cell<usize>>,
}

impl FakeDocument {
    pub fn uniform(count: usize, width: f32, height: f32) -> Self {
        Self {
            sizes: vec![Size::new(width, height); count],
            ..Default::default()
        }
    }

    pub fn with_broken_page(mut self, index: usize) -> Self {
        self.broken.push(index);
        self
    }

    pub fn renders(&self) -> usize {
        self.renders.get()
    }
}

struct FakePage {
    index: usize,
    size: Size,
    broken: bool,
    renders: Rc<Cell<usize>>,
}

impl VectorPage for FakePage {
    fn size(&self) -> Size {
        self.size
    }

    fn rasterize(&self, target: &mut RgbaImage) -> Result<(), SourceError> {
        self.renders.set(self.renders.get() + 1);
        if self.broken {
            return Err(SourceError::Render(format!("page {} is corrupt", self.index)));
        }
        let shade = (self.index % 200) as u8;
        for pixel in target.pixels_mut() {
            pixel.0 = [shade, 0, 255 - shade, 255];
        }
        Ok(())
    }
}

impl PageDocument for FakeDocument {
    fn page_count(&self) -> usize {
        self.sizes.len()
    }

    fn render_to_page_images(
        &self,
        _resolution: &RasterResolution,
    ) -> Result<Vec<Box<dyn VectorPage>>, SourceError> {
        Ok(self
            .sizes
            .iter()
            .enumerate()
            .map(|(index, size)| {
                Box::new(FakePage {
                    index,
                    size: *size,
                    broken: self.broken.contains(&index),
                    renders: Rc::clone(&self.renders),
                }) as Box<dyn VectorPage>
            })
            .collect())
    }
}

pub fn page_color(index: usize) -> [u8; 4] {
    let shade = (index % 200) as u8;
    [shade, 0, 255 - shade, 255]
}
