//! Motion integrator: raw pose samples to incremental controls.
//!
//! The motion feed delivers absolute world-frame pose samples. The
//! integrator differences consecutive samples into the displacement and
//! wrapped heading change the filter linearizes over, and carries the
//! sample's twist and process noise through unchanged.

use crate::core::math::angle_diff;
use crate::core::types::{MotionStep, OdometrySample, Pose2D};

/// Outcome of feeding one raw odometry sample to the integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionUpdate {
    /// Sample contained NaN or Inf and was dropped; nothing changed.
    Rejected,
    /// First valid sample; the estimator state should be seeded from it.
    Seeded(Pose2D),
    /// Incremental control relative to the previous sample.
    Step(MotionStep),
}

/// Turns consecutive raw pose samples into per-cycle motion steps.
#[derive(Debug, Default)]
pub struct MotionIntegrator {
    /// Previous raw sample pose, None until the first valid sample.
    last_sample: Option<Pose2D>,
}

impl MotionIntegrator {
    /// Create an uninitialized integrator.
    pub fn new() -> Self {
        Self { last_sample: None }
    }

    /// True once a first valid sample has been stored.
    pub fn is_initialized(&self) -> bool {
        self.last_sample.is_some()
    }

    /// Integrate one raw sample.
    ///
    /// The heading change is wrapped to (-π, π], so samples on either
    /// side of the ±π boundary difference correctly. The new sample
    /// becomes the reference for the next call.
    pub fn integrate(&mut self, sample: &OdometrySample) -> MotionUpdate {
        if !sample.is_finite() {
            tracing::warn!(pose = ?sample.pose, "rejecting non-finite odometry sample");
            return MotionUpdate::Rejected;
        }

        let prev = match self.last_sample {
            Some(prev) => prev,
            None => {
                self.last_sample = Some(sample.pose);
                return MotionUpdate::Seeded(sample.pose);
            }
        };

        let dx = sample.pose.x - prev.x;
        let dy = sample.pose.y - prev.y;
        let step = MotionStep {
            distance: (dx * dx + dy * dy).sqrt(),
            dtheta: angle_diff(prev.theta, sample.pose.theta),
            dx,
            dy,
            twist: sample.twist,
            noise: sample.covariance,
        };

        self.last_sample = Some(sample.pose);
        MotionUpdate::Step(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matrix::Matrix3;
    use crate::core::types::Twist2D;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    fn sample(x: f32, y: f32, theta: f32) -> OdometrySample {
        OdometrySample {
            pose: Pose2D::new(x, y, theta),
            twist: Twist2D::new(0.1, 0.0),
            covariance: Matrix3::diagonal(0.01, 0.01, 0.005),
        }
    }

    #[test]
    fn test_first_sample_seeds() {
        let mut integrator = MotionIntegrator::new();
        assert!(!integrator.is_initialized());

        let update = integrator.integrate(&sample(1.0, 2.0, 0.5));
        assert_eq!(update, MotionUpdate::Seeded(Pose2D::new(1.0, 2.0, 0.5)));
        assert!(integrator.is_initialized());
    }

    #[test]
    fn test_second_sample_produces_step() {
        let mut integrator = MotionIntegrator::new();
        integrator.integrate(&sample(0.0, 0.0, 0.0));

        let update = integrator.integrate(&sample(3.0, 4.0, 0.2));
        match update {
            MotionUpdate::Step(step) => {
                assert_relative_eq!(step.distance, 5.0, epsilon = 1e-6);
                assert_relative_eq!(step.dx, 3.0);
                assert_relative_eq!(step.dy, 4.0);
                assert_relative_eq!(step.dtheta, 0.2, epsilon = 1e-6);
                assert_eq!(step.noise, Matrix3::diagonal(0.01, 0.01, 0.005));
            }
            other => panic!("expected step, got {:?}", other),
        }
    }

    #[test]
    fn test_heading_change_wraps_at_pi() {
        let mut integrator = MotionIntegrator::new();
        integrator.integrate(&sample(0.0, 0.0, PI - 0.05));

        let update = integrator.integrate(&sample(0.0, 0.0, -PI + 0.05));
        match update {
            MotionUpdate::Step(step) => {
                // Short way around: +0.1 rad, not -2π + 0.1
                assert_relative_eq!(step.dtheta, 0.1, epsilon = 1e-5);
            }
            other => panic!("expected step, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_finite_sample() {
        let mut integrator = MotionIntegrator::new();

        let mut bad = sample(0.0, 0.0, 0.0);
        bad.pose.x = f32::NAN;
        assert_eq!(integrator.integrate(&bad), MotionUpdate::Rejected);
        // A rejected sample must not seed
        assert!(!integrator.is_initialized());

        integrator.integrate(&sample(1.0, 0.0, 0.0));
        let mut bad = sample(2.0, 0.0, 0.0);
        bad.covariance.set(0, 0, f32::INFINITY);
        assert_eq!(integrator.integrate(&bad), MotionUpdate::Rejected);

        // The reference is still the last valid sample
        let update = integrator.integrate(&sample(2.0, 0.0, 0.0));
        match update {
            MotionUpdate::Step(step) => assert_relative_eq!(step.dx, 1.0),
            other => panic!("expected step, got {:?}", other),
        }
    }

    #[test]
    fn test_stationary_samples_give_zero_step() {
        let mut integrator = MotionIntegrator::new();
        integrator.integrate(&sample(1.0, 1.0, 0.3));

        match integrator.integrate(&sample(1.0, 1.0, 0.3)) {
            MotionUpdate::Step(step) => {
                assert_eq!(step.distance, 0.0);
                assert_eq!(step.dtheta, 0.0);
            }
            other => panic!("expected step, got {:?}", other),
        }
    }
}
