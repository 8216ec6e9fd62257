//! Resolution at which vector pages are converted before on-screen scaling
//!
//! The default comes from the host's print settings, looked up once per
//! process and shared read-only afterwards.

use lazy_static::lazy_static;

/// Environment variable holding the printer resolution (`600` or `600x300`)
pub const DPI_VAR: &str = "PAGEVIEW_DPI";

/// Environment variable holding the paper name (`a4`, `letter`, ...)
pub const PAPER_VAR: &str = "PAGEVIEW_PAPER";

const MM_PER_INCH: f32 = 25.4;

/// Device resolution and printable area in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterResolution {
    pub dpi_x: u32,
    pub dpi_y: u32,
    pub max_width: u32,
    pub max_height: u32,
}

impl RasterResolution {
    /// A4 at 600 dpi, used when the host has nothing better
    pub const FALLBACK: RasterResolution = RasterResolution {
        dpi_x: 600,
        dpi_y: 600,
        max_width: 4961,
        max_height: 7016,
    };

    /// Printable area of `paper` at the given resolution
    pub fn for_paper(paper: Paper, dpi_x: u32, dpi_y: u32) -> Self {
        let (width_mm, height_mm) = paper.millimetres();
        Self {
            dpi_x,
            dpi_y,
            max_width: (width_mm / MM_PER_INCH * dpi_x as f32).round() as u32,
            max_height: (height_mm / MM_PER_INCH * dpi_y as f32).round() as u32,
        }
    }

    /// Resolve from the host environment, falling back per missing value
    pub fn discover() -> Self {
        let dpi = std::env::var(DPI_VAR).ok();
        let paper = std::env::var(PAPER_VAR).ok();
        Self::from_settings(dpi.as_deref(), paper.as_deref())
    }

    pub fn from_settings(dpi: Option<&str>, paper: Option<&str>) -> Self {
        let (dpi_x, dpi_y) = match dpi.and_then(parse_dpi) {
            Some(dpi) => dpi,
            None => {
                if let Some(raw) = dpi {
                    tracing::warn!("ignoring unparsable {DPI_VAR}={raw:?}");
                }
                (Self::FALLBACK.dpi_x, Self::FALLBACK.dpi_y)
            }
        };
        let paper = match paper.map(Paper::from_name) {
            Some(Some(paper)) => paper,
            Some(None) => {
                tracing::warn!("unknown paper size in {PAPER_VAR}, using A4");
                Paper::A4
            }
            None => Paper::A4,
        };
        Self::for_paper(paper, dpi_x, dpi_y)
    }
}

impl Default for RasterResolution {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Paper sizes the host print settings may name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paper {
    A3,
    A4,
    A5,
    Letter,
    Legal,
}

impl Paper {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "a3" => Some(Self::A3),
            "a4" => Some(Self::A4),
            "a5" => Some(Self::A5),
            "letter" => Some(Self::Letter),
            "legal" => Some(Self::Legal),
            _ => None,
        }
    }

    fn millimetres(self) -> (f32, f32) {
        match self {
            Self::A3 => (297.0, 420.0),
            Self::A4 => (210.0, 297.0),
            Self::A5 => (148.0, 210.0),
            Self::Letter => (215.9, 279.4),
            Self::Legal => (215.9, 355.6),
        }
    }
}

fn parse_dpi(raw: &str) -> Option<(u32, u32)> {
    let raw = raw.trim();
    let (x, y) = match raw.split_once(['x', 'X']) {
        Some((x, y)) => (x.trim().parse().ok()?, y.trim().parse().ok()?),
        None => {
            let dpi = raw.parse().ok()?;
            (dpi, dpi)
        }
    };
    (x > 0 && y > 0).then_some((x, y))
}

lazy_static! {
    static ref DEFAULT_RESOLUTION: RasterResolution = {
        let resolution = RasterResolution::discover();
        tracing::debug!(?resolution, "default raster resolution");
        resolution
    };
}

/// Process-wide default raster resolution, resolved on first use
pub fn default_resolution() -> &'static RasterResolution {
    &DEFAULT_RESOLUTION
}
