//! Gamma contrast stage — power-law curve applied through memoized 8-bit LUTs.

pub mod cache;
pub mod lut;
pub mod params;
pub mod stage;

pub use cache::LutCache;
pub use lut::{GammaLut, LUT_SIZE, LutKey};
pub use params::{ContrastParams, DEFAULT_CONTRAST_MULTIPLIER};
pub use stage::ContrastStage;
