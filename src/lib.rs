//! Chromakey is a real-time chroma-key compositing engine.
//!
//! It pulls frames from a live [`FrameSource`], classifies each pixel as
//! foreground or "key" (near-white by default), replaces key pixels with the
//! matching pixel of a static background image, and pushes the composited
//! frame to a [`FrameSink`] at a fixed polling cadence (default 50 ms, about
//! 20 cycles/second).
//!
//! # Pipeline overview
//!
//! 1. **Load**: [`BackgroundStore`] decodes the background image once and
//!    resamples it to the source dimensions (the only IO suspension point).
//! 2. **Cycle**: [`Scheduler`] pulls one raw frame, [`Compositor`] runs the
//!    per-pixel [`is_key`] pass in place, and the result goes to the sink.
//! 3. **Control**: [`SessionControl`] carries the stop signal (checked at the
//!    top of every cycle) and the explicit resume re-arm for paused sessions.
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Straight RGBA8 end-to-end**: alpha is never modified by compositing.
//! - **One cycle at a time**: the next cycle arms only after the current one
//!   finishes, so sinks always observe cycle-start order.
//! - **Hardened steady state**: per-cycle failures are logged and skipped;
//!   only startup failures abort a session.
#![forbid(unsafe_code)]

mod background;
mod composite;
mod config;
mod control;
mod foundation;
mod key;
mod scheduler;
mod sink;
mod stream;

pub use background::{BackgroundFrame, BackgroundStore};
pub use composite::{CompositeOpts, Compositor};
pub use config::ChromaConfig;
pub use control::SessionControl;
pub use foundation::core::{CycleIndex, Frame, PIXEL_STRIDE};
pub use foundation::error::{ChromaError, ChromaResult};
pub use key::{KeyThreshold, is_key};
pub use scheduler::{Scheduler, SchedulerState, SessionStats};
pub use sink::{FrameSink, InMemorySink, SinkConfig};
pub use stream::{FrameSource, Playback};
