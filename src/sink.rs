use std::time::Duration;

use crate::foundation::core::{CycleIndex, Frame};
use crate::foundation::error::ChromaResult;

/// Configuration handed to a [`FrameSink`] when a session enters `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    /// Target polling cadence of the session, not a frame-rate guarantee.
    pub cycle_interval: Duration,
}

/// Sink contract for consuming composited frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing
/// [`CycleIndex`] order (indices of skipped cycles never arrive). Pushes are
/// fire-and-forget from the scheduler's perspective: a push error is logged
/// and the cycle skipped, it does not end the session.
pub trait FrameSink {
    fn begin(&mut self, cfg: SinkConfig) -> ChromaResult<()>;
    fn push_frame(&mut self, idx: CycleIndex, frame: &Frame) -> ChromaResult<()>;
    fn end(&mut self) -> ChromaResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    ended: bool,
    /// Frames in cycle order.
    pub frames: Vec<(CycleIndex, Frame)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ChromaResult<()> {
        self.cfg = Some(cfg);
        self.ended = false;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: CycleIndex, frame: &Frame) -> ChromaResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ChromaResult<()> {
        self.ended = true;
        Ok(())
    }
}
