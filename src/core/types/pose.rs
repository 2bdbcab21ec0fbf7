//! Pose and point types for planar localization.

use serde::{Deserialize, Serialize};

/// A 2D point in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate in meters
    pub x: f32,
    /// Y coordinate in meters
    pub y: f32,
}

impl Point2D {
    /// Create a new point.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared distance to another point (avoids sqrt).
    #[inline]
    pub fn distance_squared(&self, other: &Point2D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point2D) -> f32 {
        self.distance_squared(other).sqrt()
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// Robot pose in 2D space.
///
/// Represents position (x, y) in meters and heading (theta) in radians.
/// Theta is normalized to (-π, π].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position in meters
    pub x: f32,
    /// Y position in meters
    pub y: f32,
    /// Heading in radians, normalized to (-π, π]
    pub theta: f32,
}

impl Pose2D {
    /// Create a new pose with theta normalized to (-π, π].
    #[inline]
    pub fn new(x: f32, y: f32, theta: f32) -> Self {
        Self {
            x,
            y,
            theta: crate::core::math::normalize_angle(theta),
        }
    }

    /// Identity pose at origin with zero heading.
    #[inline]
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }
    }

    /// Position component as a point.
    #[inline]
    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// True when every component is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.theta.is_finite()
    }
}

impl Default for Pose2D {
    fn default() -> Self {
        Self::identity()
    }
}

/// Rigid 2D transform equivalent to a pose.
///
/// Translation plus the rotation derived from heading, for downstream
/// consumers that need a frame transform rather than a pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Translation in meters
    pub translation: Point2D,
    /// Cosine of the heading
    pub cos_theta: f32,
    /// Sine of the heading
    pub sin_theta: f32,
}

impl Transform2D {
    /// Derive the transform from a pose.
    pub fn from_pose(pose: &Pose2D) -> Self {
        let (sin_theta, cos_theta) = pose.theta.sin_cos();
        Self {
            translation: pose.position(),
            cos_theta,
            sin_theta,
        }
    }

    /// Transform a point from the pose's local frame to the world frame.
    pub fn apply(&self, point: &Point2D) -> Point2D {
        Point2D::new(
            self.translation.x + point.x * self.cos_theta - point.y * self.sin_theta,
            self.translation.y + point.x * self.sin_theta + point.y * self.cos_theta,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_point2d_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert_relative_eq!(a.distance(&b), 5.0);
        assert_relative_eq!(a.distance_squared(&b), 25.0);
    }

    #[test]
    fn test_pose_constructor_normalizes() {
        let p = Pose2D::new(1.0, 2.0, 3.0 * PI);
        assert_relative_eq!(p.theta, PI, epsilon = 1e-6);

        let p = Pose2D::new(0.0, 0.0, -PI);
        assert_relative_eq!(p.theta, PI, epsilon = 1e-6);
    }

    #[test]
    fn test_pose_is_finite() {
        assert!(Pose2D::new(1.0, 2.0, 0.5).is_finite());
        assert!(!Pose2D {
            x: f32::NAN,
            y: 0.0,
            theta: 0.0
        }
        .is_finite());
    }

    #[test]
    fn test_transform_identity() {
        let t = Transform2D::from_pose(&Pose2D::identity());
        let p = Point2D::new(1.0, 2.0);
        let result = t.apply(&p);
        assert_relative_eq!(result.x, 1.0);
        assert_relative_eq!(result.y, 2.0);
    }

    #[test]
    fn test_transform_rotation_and_translation() {
        let t = Transform2D::from_pose(&Pose2D::new(1.0, 0.0, FRAC_PI_2));
        let p = Point2D::new(1.0, 0.0);
        let result = t.apply(&p);
        assert_relative_eq!(result.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(result.y, 1.0, epsilon = 1e-6);
    }
}
