//! Correction step: fold one landmark observation into the state.
//!
//! Standard sequential EKF update: innovation covariance, Kalman gain,
//! state and covariance update, one landmark at a time with each
//! correction feeding forward into the next.

use crate::core::matrix::Matrix3;
use crate::core::types::Pose2D;

/// Apply one landmark's correction to (pose, covariance).
///
/// ```text
/// S  = H·P·Hᵀ + Q
/// K  = P·Hᵀ·S⁻¹
/// x' = x + K·residual        (heading renormalized)
/// P' = (I - K·H)·P           (then symmetrized)
/// ```
///
/// Returns `None` when S is numerically singular, in which case the
/// caller skips this landmark and the state is left untouched.
pub fn apply_correction(
    pose: &Pose2D,
    covariance: &Matrix3,
    h: &Matrix3,
    q: &Matrix3,
    residual: [f32; 3],
) -> Option<(Pose2D, Matrix3)> {
    let h_t = h.transpose();
    let s = h.mul(covariance).mul(&h_t).add(q);
    let s_inv = s.inverse()?;

    let gain = covariance.mul(&h_t).mul(&s_inv);
    let delta = gain.mul_vec(residual);

    let updated_pose = Pose2D::new(
        pose.x + delta[0],
        pose.y + delta[1],
        pose.theta + delta[2],
    );
    let updated_covariance = Matrix3::identity()
        .sub(&gain.mul(h))
        .mul(covariance)
        .symmetrized();

    Some((updated_pose, updated_covariance))
}
