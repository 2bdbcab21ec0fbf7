//! Pose output seam.
//!
//! The estimation loop publishes through a trait so downstream transport
//! stays out of the core: a node wires in whatever carries poses to its
//! consumers, tests collect them over a channel.

use crossbeam_channel::Sender;

use crate::estimator::PoseEstimate;

/// Receives the estimate published once per estimation cycle.
///
/// Publication is fire-and-forget: implementations must not block the
/// estimation loop.
pub trait PoseSink: Send {
    fn publish(&mut self, estimate: &PoseEstimate);
}

/// Sink that logs estimates through `tracing`.
///
/// Every estimate is visible at trace level; a periodic summary goes out
/// at info level so a running node stays observable without flooding.
#[derive(Debug, Default)]
pub struct TracingSink {
    cycles: u64,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PoseSink for TracingSink {
    fn publish(&mut self, estimate: &PoseEstimate) {
        self.cycles += 1;
        tracing::trace!(
            x = estimate.pose.x,
            y = estimate.pose.y,
            theta = estimate.pose.theta,
            "pose estimate"
        );
        if self.cycles % 100 == 0 {
            tracing::info!(
                cycles = self.cycles,
                x = estimate.pose.x,
                y = estimate.pose.y,
                theta = estimate.pose.theta,
                var_x = estimate.covariance.get(0, 0),
                var_y = estimate.covariance.get(1, 1),
                var_theta = estimate.covariance.get(2, 2),
                "pose estimate"
            );
        }
    }
}

/// Sink that forwards estimates over a bounded channel.
///
/// Estimates are dropped when the receiver falls behind, keeping the
/// estimation loop non-blocking.
#[derive(Debug)]
pub struct ChannelSink {
    tx: Sender<PoseEstimate>,
}

impl ChannelSink {
    pub fn new(tx: Sender<PoseEstimate>) -> Self {
        Self { tx }
    }
}

impl PoseSink for ChannelSink {
    fn publish(&mut self, estimate: &PoseEstimate) {
        if self.tx.try_send(*estimate).is_err() {
            tracing::trace!("pose estimate dropped, receiver behind");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matrix::Matrix3;
    use crate::core::types::{Pose2D, Transform2D};

    fn estimate() -> PoseEstimate {
        let pose = Pose2D::new(1.0, 2.0, 0.5);
        PoseEstimate {
            pose,
            covariance: Matrix3::diagonal(0.1, 0.1, 0.05),
            transform: Transform2D::from_pose(&pose),
        }
    }

    #[test]
    fn test_channel_sink_forwards() {
        let (tx, rx) = crossbeam_channel::bounded(4);
        let mut sink = ChannelSink::new(tx);

        sink.publish(&estimate());
        let received = rx.try_recv().unwrap();
        assert_eq!(received.pose, Pose2D::new(1.0, 2.0, 0.5));
    }

    #[test]
    fn test_channel_sink_drops_when_full() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let mut sink = ChannelSink::new(tx);

        sink.publish(&estimate());
        sink.publish(&estimate()); // full, dropped without blocking
        assert_eq!(rx.try_iter().count(), 1);
    }
}
