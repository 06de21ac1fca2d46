mod replay;
pub mod types;

pub use replay::JsonlReplay;
pub use types::{DetectorFrame, Landmark, LandmarkSet, Point};

use anyhow::Result;

/// Trait for landmark detector outputs
///
/// Implementations deliver frames in capture order, one at a time.
pub trait FrameSource {
    /// Fetch the next frame, or `None` once the source is exhausted
    fn next_frame(&mut self) -> Result<Option<DetectorFrame>>;

    /// Number of frames delivered so far
    fn frames_read(&self) -> u64;
}
