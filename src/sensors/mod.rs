//! Sensor processing layer: turning raw feed samples into filter inputs.

pub mod motion_integrator;

pub use self::motion_integrator::{MotionIntegrator, MotionUpdate};
