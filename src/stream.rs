use crate::foundation::core::Frame;
use crate::foundation::error::ChromaResult;

/// Playback state reported by a live input stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Playback {
    Playing,
    Paused,
    Ended,
}

/// A live source of raw input frames (camera, file playback, test fixture).
///
/// Contract: `dimensions` is stable for the lifetime of a session and every
/// frame returned by `next_frame` has those dimensions; the scheduler still
/// re-validates per cycle and skips the cycle on divergence. `next_frame`
/// returns the *current* frame on demand (polling cadence) and is expected to
/// be non-blocking or bounded-latency.
pub trait FrameSource {
    fn dimensions(&self) -> (u32, u32);

    fn next_frame(&mut self) -> ChromaResult<Frame>;

    fn playback(&self) -> Playback;
}
