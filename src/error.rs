use thiserror::Error;

/// Errors raised by the pixel editing core
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Coordinate access outside the grid
    #[error("pixel ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    /// A buffer was requested with a zero dimension or mismatched data length
    #[error("invalid buffer dimensions: {0}")]
    InvalidDimensions(String),

    /// Editor settings rejected before a session was built
    #[error("invalid editor config: {0}")]
    InvalidConfig(String),

    /// The initial texture could not be read as pixel data
    #[error("texture source unavailable: {0}")]
    SourceUnavailable(String),
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;
