//! Marker-based EKF localization.
//!
//! The localizer owns the only persistent state, the (pose, covariance)
//! pair, plus the per-cycle inputs feeding it: the latest process noise,
//! the pending detection buffer, and the motion integrator's sample
//! reference.
//!
//! # Cycle
//!
//! 1. **Integrate**: difference the newest odometry sample against the
//!    previous one, adopt its process noise.
//! 2. **Predict**: advance the pose by the odometric delta and propagate
//!    covariance through the motion Jacobian.
//! 3. **Correct**: for each buffered detection with a table entry, in
//!    ascending id order, fold the range/bearing innovation into the
//!    state. Each correction feeds the next.
//!
//! Until the first motion sample arrives the localizer is uninitialized
//! and produces no estimates. Bad inputs never corrupt the state: a
//! malformed sample is rejected whole, a degenerate landmark is skipped
//! for the cycle.

pub mod association;
pub mod correction;
pub mod observation;
pub mod prediction;

use std::collections::BTreeMap;

use crate::core::matrix::Matrix3;
use crate::core::types::{
    DetectionBatch, LandmarkId, LandmarkTable, MarkerDetection, MotionStep, OdometrySample,
    Pose2D, Transform2D,
};
use crate::sensors::motion_integrator::{MotionIntegrator, MotionUpdate};

use self::association::associate;
use self::correction::apply_correction;
use self::observation::{measurement_jacobian, predict_measurement, residual};
use self::prediction::{motion_jacobian, propagate_covariance};

/// Per-axis measurement noise variances.
///
/// The measurement vector is (range, bearing, slack); the slack axis
/// pads the unused third row of the measurement Jacobian and must stay
/// positive so the innovation covariance remains invertible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementNoise {
    /// Range variance (m²)
    pub range_var: f32,
    /// Bearing variance (rad²)
    pub bearing_var: f32,
    /// Slack-axis variance, strictly positive
    pub slack_var: f32,
}

impl Default for MeasurementNoise {
    fn default() -> Self {
        Self {
            range_var: 0.1,
            bearing_var: 0.1,
            slack_var: 0.1,
        }
    }
}

impl MeasurementNoise {
    /// The diagonal Q matrix.
    pub fn matrix(&self) -> Matrix3 {
        Matrix3::diagonal(self.range_var, self.bearing_var, self.slack_var)
    }
}

/// Configuration for the EKF localizer.
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// Fixed estimation timestep in seconds.
    /// The motion Jacobian linearizes over this interval.
    pub timestep: f32,

    /// Maximum number of markers tracked per cycle.
    /// Detections beyond this many distinct ids are dropped.
    pub max_landmarks: usize,

    /// Measurement noise for marker observations
    pub measurement_noise: MeasurementNoise,

    /// Initial variance on each pose axis when the state is seeded
    pub initial_variance: f32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            timestep: 0.01,
            max_landmarks: 8,
            measurement_noise: MeasurementNoise::default(),
            initial_variance: 0.0,
        }
    }
}

/// One published estimate: the corrected pose, its covariance, and the
/// equivalent rigid transform for consumers that need one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseEstimate {
    pub pose: Pose2D,
    pub covariance: Matrix3,
    pub transform: Transform2D,
}

/// EKF localizer fusing odometry with fixed-marker sightings.
#[derive(Debug)]
pub struct EkfLocalizer {
    config: EstimatorConfig,
    table: LandmarkTable,
    /// Q, built once from config
    measurement_noise: Matrix3,
    integrator: MotionIntegrator,
    pose: Pose2D,
    covariance: Matrix3,
    /// R from the most recent sample, 1:1 with the cycle that uses it
    process_noise: Matrix3,
    /// Detections buffered since the last cycle, last-wins per id
    pending: BTreeMap<LandmarkId, MarkerDetection>,
    initialized: bool,
}

impl EkfLocalizer {
    /// Create a localizer with the given configuration and marker table.
    pub fn new(config: EstimatorConfig, table: LandmarkTable) -> Self {
        let measurement_noise = config.measurement_noise.matrix();
        Self {
            config,
            table,
            measurement_noise,
            integrator: MotionIntegrator::new(),
            pose: Pose2D::identity(),
            covariance: Matrix3::zero(),
            process_noise: Matrix3::zero(),
            pending: BTreeMap::new(),
            initialized: false,
        }
    }

    /// Current pose estimate.
    pub fn pose(&self) -> Pose2D {
        self.pose
    }

    /// Current state covariance.
    pub fn covariance(&self) -> Matrix3 {
        self.covariance
    }

    /// Configuration the localizer was built with.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// True once the first motion sample has seeded the state.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Buffer a detection batch for the next cycle.
    ///
    /// The latest detection for an id overwrites any earlier one
    /// buffered this cycle; ids beyond the configured capacity and
    /// non-finite positions are dropped.
    pub fn ingest_detections(&mut self, batch: &DetectionBatch) {
        for detection in batch {
            if !detection.position.is_finite() {
                tracing::warn!(id = detection.id, "dropping non-finite marker detection");
                continue;
            }
            if self.pending.len() >= self.config.max_landmarks
                && !self.pending.contains_key(&detection.id)
            {
                tracing::trace!(id = detection.id, "detection buffer full, dropping marker");
                continue;
            }
            self.pending.insert(detection.id, *detection);
        }
    }

    /// Run one estimation cycle.
    ///
    /// Integrates `motion` if a new sample arrived this cycle, predicts,
    /// then applies one correction per associated detection. Returns
    /// `None` until the first motion sample has seeded the state; after
    /// that every cycle yields an estimate, with or without corrections.
    pub fn step(&mut self, motion: Option<&OdometrySample>) -> Option<PoseEstimate> {
        if let Some(sample) = motion {
            match self.integrator.integrate(sample) {
                MotionUpdate::Rejected => {}
                MotionUpdate::Seeded(pose) => {
                    let v = self.config.initial_variance;
                    self.pose = pose;
                    self.covariance = Matrix3::diagonal(v, v, v);
                    self.process_noise = sample.covariance;
                    self.initialized = true;
                    tracing::debug!(x = pose.x, y = pose.y, theta = pose.theta, "state seeded");
                }
                MotionUpdate::Step(step) => {
                    self.process_noise = step.noise;
                    self.predict(&step);
                }
            }
        }

        if !self.initialized {
            return None;
        }

        self.correct();

        Some(PoseEstimate {
            pose: self.pose,
            covariance: self.covariance,
            transform: Transform2D::from_pose(&self.pose),
        })
    }

    /// Prediction: the pose advances by the measured odometric delta, so
    /// earlier corrections persist; the Jacobian only shapes uncertainty
    /// growth.
    fn predict(&mut self, step: &MotionStep) {
        self.pose = Pose2D::new(
            self.pose.x + step.dx,
            self.pose.y + step.dy,
            self.pose.theta + step.dtheta,
        );
        let jr = motion_jacobian(&step.twist, self.pose.theta, self.config.timestep);
        self.covariance = propagate_covariance(&self.covariance, &jr, &self.process_noise);
    }

    /// Sequential correction over this cycle's associated detections,
    /// ascending id. The buffer is consumed whether or not an id matched.
    fn correct(&mut self) {
        let pending = std::mem::take(&mut self.pending);

        for input in associate(&pending, &self.table) {
            // The detected position supplies the Jacobian and one
            // predicted measurement, the table entry the other.
            let h = match measurement_jacobian(&input.detected, &self.pose) {
                Some(h) => h,
                None => {
                    tracing::debug!(id = input.id, "marker coincides with robot, skipping");
                    continue;
                }
            };
            let from_detection = predict_measurement(&input.detected, &self.pose);
            let from_table = predict_measurement(&input.world, &self.pose);
            let innovation = residual(&from_table, &from_detection);

            match apply_correction(
                &self.pose,
                &self.covariance,
                &h,
                &self.measurement_noise,
                innovation,
            ) {
                Some((pose, covariance)) => {
                    self.pose = pose;
                    self.covariance = covariance;
                }
                None => {
                    tracing::debug!(
                        id = input.id,
                        "singular innovation covariance, skipping marker"
                    );
                }
            }
        }
    }
}
