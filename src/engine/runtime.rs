//! Fixed-rate estimation loop.
//!
//! One thread owns the localizer and all of its mutable state. The two
//! asynchronous input feeds land on a single merged event channel; a
//! wall-clock ticker drives the estimation cycle at the configured
//! timestep regardless of input arrival. Per tick the loop uses the
//! latest buffered motion sample and every complete detection batch
//! received since the last tick, then publishes. Missing input skips
//! that part of the cycle, it is never an error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Receiver, Sender};

use crate::core::types::{DetectionBatch, LandmarkTable, OdometrySample};
use crate::engine::sink::PoseSink;
use crate::estimator::{EkfLocalizer, EstimatorConfig};

/// Depth of the merged input queue. Producers outrunning the loop by
/// more than this block until the next drain.
const EVENT_QUEUE_DEPTH: usize = 64;

/// One event from either input feed.
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// A motion feed sample. Only the latest one per tick is integrated.
    Motion(OdometrySample),
    /// A complete marker-detection batch, buffered atomically.
    Markers(DetectionBatch),
}

/// The estimation loop: localizer plus its input and output wiring.
pub struct EstimatorRuntime<S: PoseSink> {
    localizer: EkfLocalizer,
    events: Receiver<InputEvent>,
    sink: S,
    period: Duration,
    shutdown: Arc<AtomicBool>,
}

impl<S: PoseSink> EstimatorRuntime<S> {
    /// Create a runtime around an existing localizer. The cycle period
    /// comes from the localizer's configured timestep.
    pub fn new(
        localizer: EkfLocalizer,
        events: Receiver<InputEvent>,
        sink: S,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        let period = Duration::from_secs_f32(localizer.config().timestep);
        Self {
            localizer,
            events,
            sink,
            period,
            shutdown,
        }
    }

    /// Run until shutdown is signaled or every sender is dropped.
    pub fn run(&mut self) {
        let ticker = tick(self.period);
        let mut latest_motion: Option<OdometrySample> = None;

        tracing::info!(period_ms = self.period.as_millis() as u64, "estimator loop started");

        loop {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::info!("estimator loop shutting down");
                break;
            }

            select! {
                recv(self.events) -> event => match event {
                    // Keep only the newest sample; deltas telescope, so
                    // skipped intermediates cost nothing.
                    Ok(InputEvent::Motion(sample)) => latest_motion = Some(sample),
                    Ok(InputEvent::Markers(batch)) => self.localizer.ingest_detections(&batch),
                    Err(_) => {
                        tracing::info!("input channel closed, estimator loop exiting");
                        break;
                    }
                },
                recv(ticker) -> _ => {
                    if let Some(estimate) = self.localizer.step(latest_motion.take().as_ref()) {
                        self.sink.publish(&estimate);
                    }
                }
            }
        }
    }
}

/// Handle to a spawned estimator thread.
pub struct RuntimeHandle {
    thread: JoinHandle<()>,
    shutdown: Arc<AtomicBool>,
}

impl RuntimeHandle {
    /// Signal the loop to stop after its current iteration.
    pub fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Wait for the estimator thread to finish.
    pub fn join(self) -> thread::Result<()> {
        self.thread.join()
    }
}

/// Spawn the estimation loop on its own thread.
///
/// Returns the thread handle and the sender both input feeds share.
/// Dropping every sender also stops the loop.
pub fn spawn_runtime<S: PoseSink + 'static>(
    config: EstimatorConfig,
    table: LandmarkTable,
    sink: S,
) -> (RuntimeHandle, Sender<InputEvent>) {
    let (tx, rx) = bounded(EVENT_QUEUE_DEPTH);
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);

    let thread = thread::Builder::new()
        .name("estimator".into())
        .spawn(move || {
            let localizer = EkfLocalizer::new(config, table);
            let mut runtime = EstimatorRuntime::new(localizer, rx, sink, flag);
            runtime.run();
        })
        .expect("failed to spawn estimator thread");

    (RuntimeHandle { thread, shutdown }, tx)
}
