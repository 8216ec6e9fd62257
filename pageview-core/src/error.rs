use thiserror::Error;

/// Errors surfaced by the viewport engine
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ViewportError {
    /// The document cannot be displayed (no pages, no page images, bad sizes)
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// A single page failed to convert from vector to bitmap form
    #[error("failed to rasterize page {page}: {reason}")]
    Rasterization { page: usize, reason: String },

    /// A page bitmap of the requested size cannot be allocated
    #[error("cannot allocate a {width}x{height} page bitmap")]
    ResourceExhausted { width: u32, height: u32 },

    #[error("page {page} out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors reported by page sources
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SourceError {
    #[error("page {0} is not available")]
    MissingPage(usize),

    #[error("{0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, ViewportError>;
