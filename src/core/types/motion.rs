//! Motion feed types.
//!
//! The motion feed delivers world-frame pose samples with the twist and
//! odometric uncertainty measured alongside them. The integrator turns
//! consecutive samples into one incremental control per cycle.

use serde::{Deserialize, Serialize};

use crate::core::matrix::Matrix3;
use crate::core::types::Pose2D;

/// 2D velocity: linear along the heading, angular about the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Twist2D {
    /// Linear velocity in m/s
    pub linear: f32,
    /// Angular velocity in rad/s
    pub angular: f32,
}

impl Twist2D {
    /// Create a new twist.
    #[inline]
    pub fn new(linear: f32, angular: f32) -> Self {
        Self { linear, angular }
    }

    /// True when both components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.linear.is_finite() && self.angular.is_finite()
    }
}

/// One event from the motion feed.
///
/// Carries a world-frame pose sample, the instantaneous twist, and the
/// 3x3 odometric process-noise covariance over (x, y, theta). The feed
/// reduces its full 6-DOF covariance before delivery; see
/// [`reduce_full_covariance`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OdometrySample {
    /// World-frame pose sample
    pub pose: Pose2D,
    /// Instantaneous velocities at sample time
    pub twist: Twist2D,
    /// Process-noise covariance over (x, y, theta)
    pub covariance: Matrix3,
}

impl OdometrySample {
    /// True when pose, twist, and covariance are all finite.
    pub fn is_finite(&self) -> bool {
        self.pose.is_finite() && self.twist.is_finite() && self.covariance.is_finite()
    }
}

/// Incremental control produced by the motion integrator for one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionStep {
    /// Planar displacement magnitude between consecutive samples (m)
    pub distance: f32,
    /// Heading change wrapped to (-π, π] (rad)
    pub dtheta: f32,
    /// World-frame displacement, x component (m)
    pub dx: f32,
    /// World-frame displacement, y component (m)
    pub dy: f32,
    /// Instantaneous velocities used to linearize the motion model
    pub twist: Twist2D,
    /// Per-step process noise from the sample that produced this step
    pub noise: Matrix3,
}

/// Reduce a row-major 6x6 pose covariance (x, y, z, roll, pitch, yaw) to
/// the 3x3 planar covariance over (x, y, theta).
///
/// Drops the unobserved z, roll, and pitch axes, keeping the x/y/yaw rows
/// and columns.
pub fn reduce_full_covariance(full: &[f32; 36]) -> Matrix3 {
    Matrix3::from_array([
        full[0], full[1], full[5], full[6], full[7], full[11], full[30], full[31], full[35],
    ])
}
