//! Error types for sepiars

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading, toning or writing an image
#[derive(Debug, Error)]
pub enum SepiaError {
    /// Source image missing, corrupt, unsupported or empty
    #[error("cannot decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Pixel buffer length disagrees with the declared dimensions
    #[error("dimension mismatch: expected {expected} samples, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Output image could not be encoded or written
    #[error("cannot write {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Filesystem error outside of the codec
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Non-positive or non-numeric iteration count
    #[error("invalid iteration count: {0}")]
    IterationCount(String),

    /// Unreadable or invalid configuration
    #[error("invalid config: {0}")]
    Config(String),
}

/// Result type for sepia operations
pub type Result<T> = std::result::Result<T, SepiaError>;
