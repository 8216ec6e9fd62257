//! Viewport appearance and sizing configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewportError};

/// Layout constants and colours used by the viewport
///
/// Every field has a default, so a config file only needs to name what it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Gap around every page, in screen pixels
    pub page_margin: u32,

    /// Drop shadow offset below and right of every page
    pub shadow_size: u32,

    /// Space a scrollbar takes from the client area
    pub scrollbar_thickness: u32,

    /// Viewport heights worth of pages the image cache keeps
    pub cache_screens: u32,

    /// Lower bound on cache capacity
    pub min_cache_pages: usize,

    /// Largest page bitmap (in pixels) the cache will allocate
    pub max_bitmap_pixels: u64,

    pub background: [u8; 4],
    pub page_color: [u8; 4],
    pub border_color: [u8; 4],
    pub shadow_color: [u8; 4],
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            page_margin: 8,
            shadow_size: 4,
            scrollbar_thickness: 16,
            cache_screens: 3,
            min_cache_pages: 2,
            max_bitmap_pixels: 64 * 1024 * 1024,
            background: [0x80, 0x80, 0x80, 0xff],
            page_color: [0xff, 0xff, 0xff, 0xff],
            border_color: [0x20, 0x20, 0x20, 0xff],
            shadow_color: [0x40, 0x40, 0x40, 0xff],
        }
    }
}

impl ViewportConfig {
    /// Border and margin space each page occupies besides its own extent
    pub fn frame_allowance(&self) -> f32 {
        (2 * self.page_margin + self.shadow_size) as f32
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ViewportError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ViewportError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> Result<()> {
        if self.min_cache_pages < 2 {
            return Err(ViewportError::Config(
                "min_cache_pages must be at least 2".to_string(),
            ));
        }
        if self.max_bitmap_pixels == 0 {
            return Err(ViewportError::Config(
                "max_bitmap_pixels must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ViewportConfig::from_json_str(r#"{ "page_margin": 12 }"#).unwrap();
        assert_eq!(config.page_margin, 12);
        assert_eq!(config.shadow_size, ViewportConfig::default().shadow_size);
        assert_eq!(config.frame_allowance(), 28.0);
    }

    #[test]
    fn min_cache_below_two_is_rejected() {
        for pages in [0, 1] {
            let json = format!(r#"{{ "min_cache_pages": {pages} }}"#);
            let err = ViewportConfig::from_json_str(&json).unwrap_err();
            assert!(matches!(err, ViewportError::Config(_)));
        }
        let config = ViewportConfig::from_json_str(r#"{ "min_cache_pages": 2 }"#).unwrap();
        assert_eq!(config.min_cache_pages, 2);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "scrollbar_thickness": 20, "background": [0, 0, 0, 255] }}"#).unwrap();

        let config = ViewportConfig::load(file.path()).unwrap();
        assert_eq!(config.scrollbar_thickness, 20);
        assert_eq!(config.background, [0, 0, 0, 255]);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ViewportConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ViewportError::Config(_)));
    }
}
