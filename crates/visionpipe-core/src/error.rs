//! Error type shared by every stage.

use crate::image::BitDepth;

/// Errors reported synchronously by a stage. A failed call produces no output.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("unsupported element type: {0} (expected 8-bit unsigned)")]
    UnsupportedDepth(BitDepth),
    #[error("buffer holds {actual} bytes but its shape requires {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("failed to parse stage parameters: {0}")]
    Params(#[from] serde_json::Error),
}

impl StageError {
    /// Whether the caller handed the stage something it cannot process
    /// (empty or malformed image, wrong element type, bad parameter value).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::UnsupportedDepth(_) | Self::BufferSize { .. }
        )
    }
}

pub type Result<T, E = StageError> = std::result::Result<T, E>;
