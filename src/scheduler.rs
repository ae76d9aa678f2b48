use std::time::Duration;

use crate::{
    background::{BackgroundFrame, BackgroundStore},
    composite::{CompositeOpts, Compositor},
    config::ChromaConfig,
    control::SessionControl,
    foundation::core::CycleIndex,
    foundation::error::{ChromaError, ChromaResult},
    sink::{FrameSink, SinkConfig},
    stream::{FrameSource, Playback},
};

/// How often a paused session re-checks stop and stream-end while waiting for
/// an explicit resume.
const PAUSE_POLL: Duration = Duration::from_millis(10);

/// Lifecycle of one compositing session.
///
/// `Idle` and `Loading` cover session construction and the one-shot
/// background load; the cycle loop itself only moves between `Running`,
/// `Paused` and `Stopped`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Loading,
    Running,
    Paused,
    Stopped,
}

/// Aggregated per-session cycle counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Cycles attempted while `Running`.
    pub cycles_total: u64,
    /// Cycles that composited and reached the sink.
    pub cycles_composited: u64,
    /// Cycles dropped by the hardened per-cycle error policy.
    pub cycles_skipped: u64,
}

/// Drives capture -> composite -> present at a fixed polling cadence.
///
/// State machine: `Idle -> Loading -> Running <-> Paused -> Stopped`, with
/// `Loading -> Stopped` on background load failure. One cycle runs to
/// completion before the next is armed, so the actual cadence is
/// "work + interval" and frames reach the sink in cycle-start order.
///
/// Startup errors (stream unavailable, background load, dimension mismatch
/// between source and background) abort the session and are returned to the
/// caller. Steady-state per-cycle errors are logged and the cycle is skipped;
/// the session keeps running.
pub struct Scheduler {
    config: ChromaConfig,
    composite_opts: CompositeOpts,
}

impl Scheduler {
    pub fn new(config: ChromaConfig, composite_opts: CompositeOpts) -> Self {
        Self {
            config,
            composite_opts,
        }
    }

    pub fn config(&self) -> &ChromaConfig {
        &self.config
    }

    /// Run a full session: load the configured background at the source's
    /// dimensions, then cycle until the source ends or `control` is stopped.
    pub fn run(
        &self,
        source: &mut dyn FrameSource,
        sink: &mut dyn FrameSink,
        control: &SessionControl,
    ) -> ChromaResult<SessionStats> {
        let (width, height) = source.dimensions();
        tracing::info!(width, height, "session loading");
        let store = match BackgroundStore::load(&self.config.background_source, width, height) {
            Ok(store) => store,
            Err(e) => {
                tracing::error!(error = %e, "background load failed, session stopped");
                return Err(e);
            }
        };
        self.run_with_background(source, sink, store.frame(), control)
    }

    /// Run a session against an already-loaded background frame.
    ///
    /// The background must match the source dimensions exactly; that is a
    /// startup contract, not a per-cycle recoverable.
    pub fn run_with_background(
        &self,
        source: &mut dyn FrameSource,
        sink: &mut dyn FrameSink,
        background: BackgroundFrame,
        control: &SessionControl,
    ) -> ChromaResult<SessionStats> {
        let (width, height) = source.dimensions();
        if background.dimensions() != (width, height) {
            return Err(ChromaError::dimension(format!(
                "background is {}x{}, source is {width}x{height}",
                background.width(),
                background.height()
            )));
        }

        let compositor = Compositor::new(self.config.key_threshold, self.composite_opts)?;
        let interval = self.config.cycle_interval();

        sink.begin(SinkConfig {
            width,
            height,
            cycle_interval: interval,
        })?;

        tracing::info!(
            width,
            height,
            interval_ms = interval.as_millis() as u64,
            "session running"
        );
        let mut state = SchedulerState::Running;
        let mut stats = SessionStats::default();
        let mut cycle = 0u64;

        loop {
            if control.is_stopped() {
                state = SchedulerState::Stopped;
            }
            match state {
                SchedulerState::Running => match source.playback() {
                    Playback::Ended => {
                        tracing::info!("source ended");
                        state = SchedulerState::Stopped;
                    }
                    Playback::Paused => {
                        tracing::info!("source paused, waiting for resume");
                        // Drop any stale resume request from before the pause.
                        control.take_resume();
                        state = SchedulerState::Paused;
                    }
                    Playback::Playing => {
                        let idx = CycleIndex(cycle);
                        cycle += 1;
                        stats.cycles_total += 1;
                        match run_cycle(source, sink, &compositor, &background, idx) {
                            Ok(()) => stats.cycles_composited += 1,
                            Err(e) => {
                                stats.cycles_skipped += 1;
                                tracing::warn!(cycle = idx.0, error = %e, "cycle skipped");
                            }
                        }
                        control.sleep(interval);
                    }
                },
                SchedulerState::Paused => {
                    if source.playback() == Playback::Ended {
                        tracing::info!("source ended while paused");
                        state = SchedulerState::Stopped;
                    } else if control.take_resume() {
                        tracing::info!("session resumed");
                        state = SchedulerState::Running;
                    } else {
                        control.wait(PAUSE_POLL);
                    }
                }
                SchedulerState::Stopped => break,
                SchedulerState::Idle | SchedulerState::Loading => {
                    unreachable!("cycle loop starts in Running")
                }
            }
        }

        if let Err(e) = sink.end() {
            tracing::warn!(error = %e, "sink end failed");
        }
        tracing::info!(
            cycles_total = stats.cycles_total,
            cycles_composited = stats.cycles_composited,
            cycles_skipped = stats.cycles_skipped,
            "session stopped"
        );
        Ok(stats)
    }
}

fn run_cycle(
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    compositor: &Compositor,
    background: &BackgroundFrame,
    idx: CycleIndex,
) -> ChromaResult<()> {
    let mut frame = source.next_frame()?;
    // Mismatch (device reconfiguration mid-session) is detected before any
    // pixel is written, so a bad frame never reaches the sink half-composited.
    compositor.composite_in_place(&mut frame, background)?;
    sink.push_frame(idx, &frame)
        .map_err(|e| ChromaError::sink(e.to_string()))?;
    tracing::trace!(cycle = idx.0, "cycle composited");
    Ok(())
}
