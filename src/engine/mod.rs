//! Orchestration layer: the estimation loop and its output seam.

pub mod runtime;
pub mod sink;

pub use self::runtime::{spawn_runtime, EstimatorRuntime, InputEvent, RuntimeHandle};
pub use self::sink::{ChannelSink, PoseSink, TracingSink};
