//! Mathematical primitives for planar pose estimation.
//!
//! Functions for angle normalization and angular arithmetic.

use std::f32::consts::PI;

/// Normalize angle to (-π, π].
///
/// # Example
/// ```
/// use taraka_ekf::math::normalize_angle;
/// use std::f32::consts::PI;
///
/// assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-6);
/// assert!((normalize_angle(-PI) - PI).abs() < 1e-6);
/// ```
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a <= -PI {
        a += 2.0 * PI;
    }
    a
}

/// Shortest angular difference from angle `a` to angle `b`.
///
/// Returns the signed angle you need to add to `a` to reach `b`,
/// taking the shortest path around the circle. Never raw subtraction,
/// so headings on either side of the ±π boundary stay comparable.
///
/// # Example
/// ```
/// use taraka_ekf::math::angle_diff;
/// use std::f32::consts::PI;
///
/// // From 0 to π/2 is +π/2
/// assert!((angle_diff(0.0, PI / 2.0) - PI / 2.0).abs() < 1e-6);
///
/// // Crossing the ±π boundary takes the short way
/// let diff = angle_diff(PI - 0.1, -PI + 0.1);
/// assert!((diff - 0.2).abs() < 1e-6);
/// ```
#[inline]
pub fn angle_diff(a: f32, b: f32) -> f32 {
    normalize_angle(b - a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_angle_zero() {
        assert_relative_eq!(normalize_angle(0.0), 0.0);
    }

    #[test]
    fn test_normalize_angle_pi_boundary() {
        // Range is half-open: π stays, -π wraps to π
        assert_relative_eq!(normalize_angle(PI), PI);
        assert_relative_eq!(normalize_angle(-PI), PI);
    }

    #[test]
    fn test_normalize_angle_wrap_positive() {
        assert_relative_eq!(normalize_angle(2.0 * PI), 0.0, epsilon = 1e-6);
        assert_relative_eq!(normalize_angle(3.0 * PI), PI, epsilon = 1e-6);
        assert_relative_eq!(normalize_angle(4.0 * PI), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_angle_wrap_negative() {
        assert_relative_eq!(normalize_angle(-2.0 * PI), 0.0, epsilon = 1e-6);
        // Rounding in the remainder can land -3π on either side of the
        // boundary; only the magnitude is pinned down.
        let result = normalize_angle(-3.0 * PI);
        assert_relative_eq!(result.abs(), PI, epsilon = 1e-5);
    }

    #[test]
    fn test_normalize_angle_just_beyond_boundary() {
        let just_over = PI + 0.001;
        let result = normalize_angle(just_over);
        assert!(result < 0.0, "Should wrap to negative: {}", result);
        assert_relative_eq!(result, -PI + 0.001, epsilon = 1e-5);

        let just_under = -PI - 0.001;
        let result = normalize_angle(just_under);
        assert!(result > 0.0, "Should wrap to positive: {}", result);
        assert_relative_eq!(result, PI - 0.001, epsilon = 1e-5);
    }

    #[test]
    fn test_angle_diff_same_sign() {
        assert_relative_eq!(angle_diff(0.0, PI / 2.0), PI / 2.0);
        assert_relative_eq!(angle_diff(PI / 2.0, 0.0), -PI / 2.0);
    }

    #[test]
    fn test_angle_diff_crossing_pi() {
        // From just below π to just above -π (should be small positive)
        assert_relative_eq!(angle_diff(PI - 0.1, -PI + 0.1), 0.2, epsilon = 1e-6);
        // From just above -π to just below π (should be small negative)
        assert_relative_eq!(angle_diff(-PI + 0.1, PI - 0.1), -0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_angle_diff_same_angle() {
        assert_relative_eq!(angle_diff(1.0, 1.0), 0.0, epsilon = 1e-6);
        assert_relative_eq!(angle_diff(PI, PI), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_handles_nan_gracefully() {
        let result = normalize_angle(f32::NAN);
        assert!(result.is_nan());
    }

    #[test]
    fn test_normalize_handles_infinity() {
        let result = normalize_angle(f32::INFINITY);
        assert!(result.is_nan());
    }
}
