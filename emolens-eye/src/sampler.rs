//! Fixed-period sampling loop: tick, detect, summarize, render

use crate::config::EyeConfig;
use crate::engine::{Detector, Frame, StreamSource};
use crate::error::VisionError;
use crate::sinks::{ChartSink, OverlayRenderer, OverlaySink};
use emolens_core::{summarize, Detection};
use futures_util::future::BoxFuture;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

type DetectionCall<'a> = BoxFuture<'a, Result<Vec<Detection>, VisionError>>;

/// Lifecycle of a [`FrameSampler`]. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    Idle,
    Running,
    Stopped,
}

/// Counters maintained while the sampler runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SamplerStats {
    /// Detection calls issued
    pub ticks_started: u64,
    /// Detection calls whose results reached the sinks
    pub frames_rendered: u64,
    /// Ticks dropped because a detection call was still outstanding
    pub ticks_skipped: u64,
    /// Detection calls that failed or timed out
    pub failures: u64,
    /// Entities in the most recently rendered frame
    pub last_entity_count: usize,
}

struct Shared {
    state: SamplerState,
    stats: SamplerStats,
}

/// Read-only view of a running sampler, cheap to clone
#[derive(Clone)]
pub struct SamplerHandle {
    shared: Arc<RwLock<Shared>>,
}

impl SamplerHandle {
    fn new() -> Self {
        Self {
            shared: Arc::new(RwLock::new(Shared {
                state: SamplerState::Idle,
                stats: SamplerStats::default(),
            })),
        }
    }

    pub fn state(&self) -> SamplerState {
        self.shared.read().state
    }

    pub fn stats(&self) -> SamplerStats {
        self.shared.read().stats
    }

    /// Faces in the last rendered frame
    pub fn entity_count(&self) -> usize {
        self.shared.read().stats.last_entity_count
    }

    fn set_state(&self, state: SamplerState) {
        self.shared.write().state = state;
    }

    fn update(&self, f: impl FnOnce(&mut SamplerStats)) {
        f(&mut self.shared.write().stats);
    }
}

/// Sinks handed back when the sampler stops
#[derive(Debug)]
pub struct SamplerReport<O, C> {
    pub overlay: O,
    pub chart: C,
    pub stats: SamplerStats,
}

/// Drives one detect-summarize-render cycle per tick.
///
/// At most one detection call is outstanding at a time; ticks that fire
/// while it runs are skipped, not queued. Both sinks are updated from the
/// same summary before the next tick is looked at.
pub struct FrameSampler<O, C> {
    interval: Duration,
    detect_timeout: Option<Duration>,
    stream: Arc<dyn StreamSource>,
    detector: Arc<dyn Detector>,
    renderer: OverlayRenderer,
    overlay: O,
    chart: C,
    handle: SamplerHandle,
}

impl<O: OverlaySink, C: ChartSink> FrameSampler<O, C> {
    pub fn new(
        config: &EyeConfig,
        stream: Arc<dyn StreamSource>,
        detector: Arc<dyn Detector>,
        overlay: O,
        mut chart: C,
    ) -> Result<Self, VisionError> {
        config.validate()?;
        let palette = config.palette()?;
        chart.set_palette(&palette);

        Ok(Self {
            interval: config.interval(),
            detect_timeout: config.detect_timeout(),
            stream,
            detector,
            renderer: OverlayRenderer::new(palette, config.overlay.label_offset),
            overlay,
            chart,
            handle: SamplerHandle::new(),
        })
    }

    pub fn handle(&self) -> SamplerHandle {
        self.handle.clone()
    }

    /// Wait for the stream, then sample until it is paused or ended.
    ///
    /// A detection call still running when the stop is observed is awaited
    /// and rendered; no new call is issued after that point. Returns an error
    /// only if the stream never became ready.
    pub async fn run(mut self) -> Result<SamplerReport<O, C>, VisionError> {
        if let Err(e) = self.stream.ready().await {
            error!("Stream acquisition failed: {}", e);
            self.handle.set_state(SamplerState::Stopped);
            return Err(e);
        }

        let (width, height) = self.stream.dimensions();
        self.overlay.resize(width, height);
        self.handle.set_state(SamplerState::Running);
        info!(
            "Sampler running every {:?} on a {}x{} stream",
            self.interval, width, height
        );

        let detector = Arc::clone(&self.detector);
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut in_flight: Option<DetectionCall<'_>> = None;
        let mut cycle: u64 = 0;

        loop {
            tokio::select! {
                biased;

                outcome = wait_for(&mut in_flight), if in_flight.is_some() => {
                    in_flight = None;
                    self.complete(cycle, outcome);
                }
                _ = ticker.tick() => {
                    let status = self.stream.status();
                    if status.is_halted() {
                        info!("Stream {:?}, stopping sampler", status);
                        break;
                    }

                    if in_flight.is_some() {
                        self.handle.update(|s| s.ticks_skipped += 1);
                        debug!("Cycle {} still detecting, skipping tick", cycle);
                        continue;
                    }

                    cycle += 1;
                    self.handle.update(|s| s.ticks_started += 1);
                    let frame = self.stream.frame();
                    in_flight = Some(detect(detector.as_ref(), frame, self.detect_timeout));
                }
            }
        }

        if let Some(pending) = in_flight.take() {
            debug!("Waiting for in-flight cycle {}", cycle);
            let outcome = pending.await;
            self.complete(cycle, outcome);
        }

        self.handle.set_state(SamplerState::Stopped);
        let stats = self.handle.stats();
        info!(
            "Sampler stopped: {} rendered, {} skipped, {} failed",
            stats.frames_rendered, stats.ticks_skipped, stats.failures
        );

        Ok(SamplerReport {
            overlay: self.overlay,
            chart: self.chart,
            stats,
        })
    }

    fn complete(&mut self, cycle: u64, outcome: Result<Vec<Detection>, VisionError>) {
        match outcome {
            Ok(detections) => {
                let summary = summarize(detections);
                self.renderer.render(&summary, &mut self.overlay);
                self.chart.set_distribution(&summary.distribution);

                let count = summary.entity_count();
                self.handle.update(|s| {
                    s.frames_rendered += 1;
                    s.last_entity_count = count;
                });
                debug!("Cycle {}: {} faces, {}", cycle, count, summary.distribution);
            }
            Err(e) => {
                self.handle.update(|s| s.failures += 1);
                warn!("Cycle {} failed, skipping frame: {}", cycle, e);
            }
        }
    }
}

fn detect<'a>(detector: &'a dyn Detector, frame: Frame, limit: Option<Duration>) -> DetectionCall<'a> {
    Box::pin(async move {
        let call = detector.detect(frame);
        match limit {
            Some(limit) => time::timeout(limit, call)
                .await
                .map_err(|_| VisionError::Timeout(limit))?,
            None => call.await,
        }
    })
}

/// Resolves with the outstanding call's result; never resolves on an empty slot
async fn wait_for(slot: &mut Option<DetectionCall<'_>>) -> Result<Vec<Detection>, VisionError> {
    match slot.as_mut() {
        Some(call) => call.await,
        None => std::future::pending().await,
    }
}
