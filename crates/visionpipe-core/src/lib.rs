//! visionpipe core — image-transform stages for the vision pipeline.
//!
//! This crate contains the frame buffer type, the stage trait every pipeline
//! stage implements, and the gamma contrast stage with its memoized lookup
//! tables. No pipeline orchestration or I/O.

pub mod contrast;
pub mod error;
pub mod image;
pub mod stage;

// Re-exports for convenience.
pub use contrast::{ContrastParams, ContrastStage, GammaLut, LutCache, LutKey};
pub use error::{Result, StageError};
pub use image::{BitDepth, Frame};
pub use stage::{ImageStage, StageOutput};
