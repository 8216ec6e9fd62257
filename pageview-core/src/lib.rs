//! Virtualized multi-page viewport
//!
//! Lays out a vertical stack of pages in a scrollable, zoomable client area,
//! paints only the pages that intersect the region being redrawn, and keeps
//! a viewport-sized cache of page bitmaps at the current scale.
//!
//! ```no_run
//! use pageview_core::{FrameBuffer, PageDocument, PageView, Surface};
//!
//! fn show(document: &dyn PageDocument) -> pageview_core::Result<()> {
//!     let mut view = PageView::new(800, 600);
//!     view.load(document)?;
//!
//!     let mut frame = FrameBuffer::new(800, 600);
//!     let bounds = frame.bounds();
//!     view.paint(&mut frame, bounds)?;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod paint;
pub mod resolution;
pub mod scroll;
pub mod source;
pub mod surface;
pub mod view;

pub use cache::{CacheStats, PageImageCache};
pub use config::ViewportConfig;
pub use error::{Result, SourceError, ViewportError};
pub use geometry::{DocumentGeometry, Rect, Size};
pub use input::{Axis, Command, InputEvent, Key, Modifiers};
pub use layout::{Layout, ScrollRange, ScrollbarVisibility, Zoom};
pub use paint::{PaintReport, PagePlacement, Painter};
pub use resolution::{default_resolution, Paper, RasterResolution};
pub use scroll::{ScrollEffect, ScrollState};
pub use source::{PageDocument, VectorPage};
pub use surface::{FrameBuffer, Surface};
pub use view::PageView;
