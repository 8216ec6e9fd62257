//! Most-recently-used cache of rasterized pages
//!
//! Capacity is not fixed: the layout engine derives it from the viewport on
//! every relayout, so the cache keeps its own bound instead of relying on
//! `LruCache`'s built-in one.

use image::RgbaImage;
use lru::LruCache;

use crate::error::{Result, ViewportError};
use crate::source::VectorPage;

/// Statistics about cache usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate the cache hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Page index to bitmap store with least-recently-used eviction
pub struct PageImageCache {
    entries: LruCache<usize, RgbaImage>,
    capacity: usize,
    max_bitmap_pixels: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl PageImageCache {
    pub fn new(capacity: usize, max_bitmap_pixels: u64) -> Self {
        Self {
            entries: LruCache::unbounded(),
            capacity: capacity.max(1),
            max_bitmap_pixels,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Bitmap for `page` at exactly `width` x `height`
    ///
    /// A hit promotes the entry and leaves `source` untouched. On a miss the
    /// page is rasterized into a fresh bitmap and inserted as most recently
    /// used; if that fails nothing in the cache changes.
    pub fn get(
        &mut self,
        page: usize,
        width: u32,
        height: u32,
        source: &dyn VectorPage,
    ) -> Result<&RgbaImage> {
        let cached_size = self.entries.peek(&page).map(RgbaImage::dimensions);
        if cached_size == Some((width, height)) {
            self.hits += 1;
            tracing::trace!(page, "page cache hit");
            // Present, so this only promotes
            return Ok(self.entries.get_or_insert(page, || RgbaImage::new(0, 0)));
        }
        if cached_size.is_some() {
            // Sized for another scale; never hand it out
            self.entries.pop(&page);
        }

        self.misses += 1;
        let bitmap = self.rasterize(page, width, height, source)?;

        while self.entries.len() >= self.capacity {
            self.evict_lru();
        }
        tracing::debug!(page, width, height, entries = self.entries.len() + 1, "page cached");
        Ok(self.entries.get_or_insert(page, || bitmap))
    }

    fn rasterize(
        &self,
        page: usize,
        width: u32,
        height: u32,
        source: &dyn VectorPage,
    ) -> Result<RgbaImage> {
        let pixels = u64::from(width) * u64::from(height);
        if pixels == 0 || pixels > self.max_bitmap_pixels {
            return Err(ViewportError::ResourceExhausted { width, height });
        }

        let mut bitmap = RgbaImage::new(width, height);
        source
            .rasterize(&mut bitmap)
            .map_err(|e| ViewportError::Rasterization {
                page,
                reason: e.to_string(),
            })?;
        if bitmap.dimensions() != (width, height) {
            return Err(ViewportError::Rasterization {
                page,
                reason: format!(
                    "source resized the bitmap to {}x{}",
                    bitmap.width(),
                    bitmap.height()
                ),
            });
        }
        Ok(bitmap)
    }

    fn evict_lru(&mut self) {
        if let Some((page, bitmap)) = self.entries.pop_lru() {
            self.evictions += 1;
            tracing::debug!(page, "evicted page bitmap");
            drop(bitmap);
        }
    }

    /// Change the bound, evicting immediately if the cache is now over it
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            self.evict_lru();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every bitmap
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Check for a page without promoting it
    pub fn contains(&self, page: usize) -> bool {
        self.entries.contains(&page)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
        }
    }
}
