//! TarakaEKF node - marker-based localization loop with a scripted feed.
//!
//! Wires the estimation loop to a deterministic drive simulator so the
//! filter can be exercised end to end without robot hardware: the
//! simulator plays the role of the motion and marker-detection feeds,
//! the tracing sink plays the role of the pose consumer.

use std::path::Path;
use std::time::Duration;

use tracing::info;

use taraka_ekf::error::{Result, TarakaError};
use taraka_ekf::{
    reduce_full_covariance, spawn_runtime, DetectionBatch, InputEvent, LandmarkTable,
    MarkerDetection, OdometrySample, Point3, Pose2D, TarakaConfig, TracingSink, Twist2D,
};

/// Markers further away than this are not reported by the simulator.
const DETECTION_RANGE: f32 = 5.0;

/// One detection batch is emitted per this many motion samples.
const DETECTION_DECIMATION: u32 = 10;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("taraka_ekf=info".parse().unwrap())
                .add_directive("taraka_ekf_node=info".parse().unwrap()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    let config = if args.len() > 1 && !args[1].starts_with("--") {
        let config_path = Path::new(&args[1]);
        info!("Loading configuration from {:?}", config_path);
        TarakaConfig::load(config_path)?
    } else if Path::new("taraka.toml").exists() {
        info!("Loading configuration from taraka.toml");
        TarakaConfig::load(Path::new("taraka.toml"))?
    } else {
        info!("Using default configuration");
        TarakaConfig::default()
    };

    let seconds: f32 = args
        .iter()
        .position(|a| a == "--seconds")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(5.0);

    let table = config.landmark_table();
    let estimator_config = config.estimator_config();
    let timestep = estimator_config.timestep;

    info!("TarakaEKF v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Estimator: {:.0}Hz, {} landmarks registered, driving for {:.1}s",
        1.0 / timestep,
        table.len(),
        seconds
    );

    let (handle, events) = spawn_runtime(estimator_config, table.clone(), TracingSink::new());

    // Scripted drive: a slow arc through the marker field
    let mut simulator = DriveSimulator::new(Twist2D::new(0.15, 0.3), timestep);
    let steps = (seconds / timestep) as u32;

    for step in 0..steps {
        let sample = simulator.step();
        if events.send(InputEvent::Motion(sample)).is_err() {
            break;
        }

        if step % DETECTION_DECIMATION == 0 {
            let batch = simulator.detect(&table);
            if !batch.is_empty() && events.send(InputEvent::Markers(batch)).is_err() {
                break;
            }
        }

        std::thread::sleep(Duration::from_secs_f32(timestep));
    }

    info!("Scripted drive finished, shutting down");
    handle.signal_shutdown();
    handle
        .join()
        .map_err(|_| TarakaError::Estimator("estimator thread panicked".to_string()))?;

    info!("TarakaEKF finished");
    Ok(())
}

/// Deterministic constant-twist drive producing odometry samples and
/// marker detections from the simulated true pose.
struct DriveSimulator {
    pose: Pose2D,
    twist: Twist2D,
    dt: f32,
}

impl DriveSimulator {
    fn new(twist: Twist2D, dt: f32) -> Self {
        Self {
            pose: Pose2D::identity(),
            twist,
            dt,
        }
    }

    /// Advance one timestep and emit the odometry sample, covariance
    /// reduced from the full 6-DOF form the way a live feed would.
    fn step(&mut self) -> OdometrySample {
        let theta = self.pose.theta + self.twist.angular * self.dt;
        self.pose = Pose2D::new(
            self.pose.x + self.twist.linear * theta.cos() * self.dt,
            self.pose.y + self.twist.linear * theta.sin() * self.dt,
            theta,
        );

        let mut full = [0.0f32; 36];
        full[0] = 1e-4; // x
        full[7] = 1e-4; // y
        full[35] = 1e-5; // yaw

        OdometrySample {
            pose: self.pose,
            twist: self.twist,
            covariance: reduce_full_covariance(&full),
        }
    }

    /// Report every registered marker within detection range, positioned
    /// in the sensor frame as seen from the true pose.
    fn detect(&self, table: &LandmarkTable) -> DetectionBatch {
        let (sin_t, cos_t) = self.pose.theta.sin_cos();

        table
            .iter()
            .filter_map(|(id, world)| {
                let fx = world.z - self.pose.x;
                let fy = world.x - self.pose.y;
                if fx * fx + fy * fy > DETECTION_RANGE * DETECTION_RANGE {
                    return None;
                }
                Some(MarkerDetection {
                    id,
                    position: Point3::new(
                        -fx * sin_t + fy * cos_t,
                        world.y,
                        fx * cos_t + fy * sin_t,
                    ),
                })
            })
            .collect()
    }
}
