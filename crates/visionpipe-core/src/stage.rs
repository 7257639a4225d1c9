//! The capability every pipeline stage provides: frame in, frame out.

use std::time::{Duration, Instant};

use crate::error::Result;
use crate::image::Frame;

/// A single image-transform stage.
///
/// Stages receive their parameters on every call instead of holding them,
/// so one stage instance can serve several pipelines at once. Any state a
/// stage keeps between calls (caches, tables) lives behind `&self`.
pub trait ImageStage: Send + Sync {
    /// Per-call configuration supplied by the pipeline.
    type Params;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Transform `input` into a newly allocated frame. `input` is never modified.
    fn apply(&self, params: &Self::Params, input: &Frame) -> Result<Frame>;

    /// [`apply`](Self::apply), timed.
    fn run(&self, params: &Self::Params, input: &Frame) -> Result<StageOutput> {
        let start = Instant::now();
        let frame = self.apply(params, input)?;
        let elapsed = start.elapsed();
        tracing::trace!("{} stage finished in {:?}", self.name(), elapsed);
        Ok(StageOutput { frame, elapsed })
    }
}

/// Result of a timed stage run.
#[derive(Debug, Clone)]
pub struct StageOutput {
    /// The transformed frame, owned by the caller.
    pub frame: Frame,
    /// Wall-clock time spent in [`ImageStage::apply`].
    pub elapsed: Duration,
}
