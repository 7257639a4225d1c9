//! The contrast stage: resolve the LUT for the current exponent, map the frame through it.

use std::sync::Arc;

use crate::contrast::cache::LutCache;
use crate::contrast::lut::GammaLut;
use crate::contrast::params::ContrastParams;
use crate::error::{Result, StageError};
use crate::image::{BitDepth, Frame};
use crate::stage::ImageStage;

/// Applies `out = (in / 255)^g × 255` to every channel value of an 8-bit frame.
///
/// The stage owns its LUT cache; share one instance (e.g. behind an `Arc`)
/// to share the cache between pipelines.
#[derive(Debug, Default)]
pub struct ContrastStage {
    cache: LutCache,
}

impl ContrastStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &LutCache {
        &self.cache
    }

    /// The table `apply` would use for `params`, building it if needed.
    pub fn lut_for(&self, params: &ContrastParams) -> Result<Arc<GammaLut>> {
        self.cache.get_or_build(params.contrast_multiplier)
    }

    /// Map every channel value of `input` through the gamma table into a new frame.
    pub fn apply(&self, params: &ContrastParams, input: &Frame) -> Result<Frame> {
        check_input(input)?;
        let lut = self.lut_for(params)?;

        let mut output = input.zeros_like();
        lut.map_into(input.as_bytes(), output.as_bytes_mut());
        Ok(output)
    }
}

impl ImageStage for ContrastStage {
    type Params = ContrastParams;

    fn name(&self) -> &'static str {
        "contrast"
    }

    fn apply(&self, params: &ContrastParams, input: &Frame) -> Result<Frame> {
        ContrastStage::apply(self, params, input)
    }
}

fn check_input(input: &Frame) -> Result<()> {
    if input.is_empty() {
        return Err(StageError::InvalidArgument(format!(
            "input frame is empty ({}x{}x{})",
            input.rows(),
            input.cols(),
            input.channels()
        )));
    }
    if input.depth() != BitDepth::U8 {
        return Err(StageError::UnsupportedDepth(input.depth()));
    }
    Ok(())
}
