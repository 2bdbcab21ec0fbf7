//! Range/bearing observation model for fixed markers.
//!
//! Two measurements are predicted per landmark per cycle: one from the
//! position the detector reported and one from the table's known world
//! position, both evaluated at the current fused pose. Their difference
//! is the residual that drives the correction, so the filter pulls the
//! pose toward agreement between the two rather than toward a raw range.
//!
//! Coordinate convention follows the sensor frame: a position's z
//! component pairs with the world x axis and its x component with the
//! world y axis.

use crate::core::math::angle_diff;
use crate::core::matrix::Matrix3;
use crate::core::types::{Point3, Pose2D};

/// Squared-range threshold below which a position coincides with the
/// robot and the measurement geometry is degenerate.
const RANGE_EPSILON_SQ: f32 = 1e-12;

/// Predicted (range, bearing) measurement of a marker position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Distance from the robot to the position (m)
    pub range: f32,
    /// Direction to the position relative to the robot heading (rad)
    pub bearing: f32,
}

/// Predict the measurement of `position` as seen from `pose`.
pub fn predict_measurement(position: &Point3, pose: &Pose2D) -> Measurement {
    let fx = position.z - pose.x;
    let fy = position.x - pose.y;
    Measurement {
        range: (fx * fx + fy * fy).sqrt(),
        bearing: fy.atan2(fx) - pose.theta,
    }
}

/// Measurement Jacobian with respect to (x, y, theta), evaluated at the
/// detected position.
///
/// ```text
///     | -fx/r    -fy/r    0 |
/// H = |  fy/q    -fx/q   -1 |        q = fx² + fy²,  r = sqrt(q)
///     |  0        0       0 |
/// ```
///
/// The zero third row pads the unused measurement axis. Returns `None`
/// when the position coincides with the robot, so the caller can skip
/// the landmark instead of dividing by zero.
pub fn measurement_jacobian(position: &Point3, pose: &Pose2D) -> Option<Matrix3> {
    let fx = position.z - pose.x;
    let fy = position.x - pose.y;
    let q = fx * fx + fy * fy;
    if q < RANGE_EPSILON_SQ {
        return None;
    }
    let range = q.sqrt();

    Some(Matrix3::from_array([
        -fx / range,
        -fy / range,
        0.0,
        fy / q,
        -fx / q,
        -1.0,
        0.0,
        0.0,
        0.0,
    ]))
}

/// Residual between the table-predicted and detection-predicted
/// measurements, with the bearing component wrapped to (-π, π].
pub fn residual(from_table: &Measurement, from_detection: &Measurement) -> [f32; 3] {
    [
        from_table.range - from_detection.range,
        angle_diff(from_detection.bearing, from_table.bearing),
        0.0,
    ]
}
