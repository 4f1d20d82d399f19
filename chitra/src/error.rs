//! Error types for Chitra

use crate::config::ConfigLoadError;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Chitra error types
///
/// Every geometry and buffer check runs before the kernel allocates
/// anything, so an `Err` never leaves partial state behind.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Area of interest cannot produce a grid (resolution <= 0, NaN extents, ...)
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Bin geometry is unusable or reaches past the end of a scan
    #[error("Invalid bin range: {0}")]
    InvalidBinRange(String),

    /// Scan or position buffers do not match the declared counts
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The OS refused to start a worker thread
    #[error("Failed to spawn worker thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    /// A worker thread panicked while accumulating
    #[error("Worker {0} panicked during accumulation")]
    WorkerPanicked(usize),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigLoadError),
}
