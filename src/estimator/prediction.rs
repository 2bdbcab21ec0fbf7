//! Prediction step: covariance propagation through the motion model.
//!
//! The pose itself advances by the integrator's measured odometric delta;
//! the Jacobian exists purely to shape uncertainty growth over one fixed
//! timestep.

use crate::core::matrix::Matrix3;
use crate::core::types::Twist2D;

/// Angular velocities below this magnitude use the straight-line limit
/// of the motion Jacobian. The v/ω form is a removable singularity at
/// ω = 0, not a real divergence.
const OMEGA_EPSILON: f32 = 1e-4;

/// Jacobian of the motion model with respect to the pose.
///
/// Identity except for the two entries coupling heading to position:
///
/// ```text
/// Jr[0][2] = -(v/ω)·cos θ + (v/ω)·cos(θ + ω·dt)
/// Jr[1][2] = -(v/ω)·sin θ + (v/ω)·sin(θ + ω·dt)
/// ```
///
/// evaluated at the current fused heading. Near ω = 0 the first-order
/// limit is used instead:
///
/// ```text
/// Jr[0][2] -> -v·sin θ·dt
/// Jr[1][2] ->  v·cos θ·dt
/// ```
pub fn motion_jacobian(twist: &Twist2D, heading: f32, dt: f32) -> Matrix3 {
    let v = twist.linear;
    let w = twist.angular;
    let (sin_t, cos_t) = heading.sin_cos();

    let mut jr = Matrix3::identity();
    if w.abs() < OMEGA_EPSILON {
        jr.set(0, 2, -v * sin_t * dt);
        jr.set(1, 2, v * cos_t * dt);
    } else {
        let r = v / w;
        let (sin_next, cos_next) = (heading + w * dt).sin_cos();
        jr.set(0, 2, -r * cos_t + r * cos_next);
        jr.set(1, 2, -r * sin_t + r * sin_next);
    }
    jr
}

/// Propagate the state covariance forward by one control step:
/// `P' = Jr·P·Jrᵀ + R`.
///
/// Always succeeds for finite inputs.
pub fn propagate_covariance(covariance: &Matrix3, jacobian: &Matrix3, noise: &Matrix3) -> Matrix3 {
    jacobian
        .mul(covariance)
        .mul(&jacobian.transpose())
        .add(noise)
}
