//! Core data types for marker-based localization.
//!
//! - [`Point2D`], [`Pose2D`], [`Transform2D`]: planar geometry
//! - [`Twist2D`], [`OdometrySample`], [`MotionStep`]: motion feed types
//! - [`Landmark`], [`LandmarkTable`], [`MarkerDetection`]: marker types

mod landmark;
mod motion;
mod pose;

pub use self::landmark::{
    DetectionBatch, Landmark, LandmarkId, LandmarkTable, MarkerDetection, Point3,
};
pub use self::motion::{reduce_full_covariance, MotionStep, OdometrySample, Twist2D};
pub use self::pose::{Point2D, Pose2D, Transform2D};
