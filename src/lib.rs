//! TarakaEKF - Marker-based EKF localization for indoor mobile robots
//!
//! Estimates a robot's planar pose (x, y, heading) in real time by fusing
//! noisy odometry with sightings of fixed visual markers at known world
//! coordinates. The markers play the role of guide stars: odometry drifts,
//! the marker corrections pull the estimate back.
//!
//! # Architecture
//!
//! The crate is organized into 4 logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    engine/                          │  ← Orchestration
//! │           (estimation loop, pose sink)              │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                  estimator/                         │  ← Core filter
//! │   (prediction, observation, correction, matching)   │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   sensors/                          │  ← Sensor processing
//! │               (motion integration)                  │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │             (types, math, matrices)                 │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Estimation cycle
//!
//! A wall-clock ticker drives the loop at a fixed rate. Each tick
//! integrates the latest odometry sample into an incremental control,
//! propagates covariance through the motion Jacobian, folds in each
//! matched marker detection through a sequential Kalman update, and
//! publishes the corrected pose, covariance, and equivalent rigid
//! transform. Inputs arrive asynchronously on a merged event channel;
//! a tick with no input publishes the previous state unchanged.

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Sensor processing (depends on core)
// ============================================================================
pub mod sensors;

// ============================================================================
// Layer 3: Estimator (depends on core, sensors)
// ============================================================================
pub mod estimator;

// ============================================================================
// Layer 4: Engine (depends on all layers)
// ============================================================================
pub mod engine;

// ============================================================================
// Crate-wide support
// ============================================================================
pub mod config;
pub mod error;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use crate::core::math;
pub use crate::core::matrix::Matrix3;
pub use crate::core::types::{Point2D, Pose2D, Transform2D};
pub use crate::core::types::{reduce_full_covariance, MotionStep, OdometrySample, Twist2D};
pub use crate::core::types::{
    DetectionBatch, Landmark, LandmarkId, LandmarkTable, MarkerDetection, Point3,
};

// Sensors
pub use crate::sensors::motion_integrator::{MotionIntegrator, MotionUpdate};

// Estimator
pub use crate::estimator::association::{associate, CorrectionInput};
pub use crate::estimator::correction::apply_correction;
pub use crate::estimator::observation::{
    measurement_jacobian, predict_measurement, residual, Measurement,
};
pub use crate::estimator::prediction::{motion_jacobian, propagate_covariance};
pub use crate::estimator::{EkfLocalizer, EstimatorConfig, MeasurementNoise, PoseEstimate};

// Engine
pub use crate::engine::runtime::{spawn_runtime, EstimatorRuntime, InputEvent, RuntimeHandle};
pub use crate::engine::sink::{ChannelSink, PoseSink, TracingSink};

// Configuration and errors
pub use crate::config::TarakaConfig;
pub use crate::error::{Result, TarakaError};
