//! Configuration loading for the localization node.
//!
//! Everything tunable lives in one TOML file: estimator constants and
//! the marker table. The table is injected at startup and read-only
//! afterwards.

use std::path::Path;

use serde::Deserialize;

use crate::core::types::{Landmark, LandmarkTable, Point3};
use crate::error::{Result, TarakaError};
use crate::estimator::{EstimatorConfig, MeasurementNoise};

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct TarakaConfig {
    #[serde(default)]
    pub estimator: EstimatorSection,

    /// Known marker positions, id to world coordinates
    #[serde(default)]
    pub landmarks: Vec<LandmarkEntry>,
}

/// Estimator constants
#[derive(Clone, Debug, Deserialize)]
pub struct EstimatorSection {
    /// Fixed estimation timestep in seconds (default: 0.01, a 100Hz loop)
    #[serde(default = "default_timestep")]
    pub timestep: f32,

    /// Maximum markers tracked per cycle (default: 8)
    #[serde(default = "default_max_landmarks")]
    pub max_landmarks: usize,

    /// Per-axis measurement variances [range, bearing, slack]
    /// (default: 0.1 each)
    #[serde(default = "default_measurement_variance")]
    pub measurement_variance: [f32; 3],

    /// Initial variance on each pose axis (default: 0.0)
    #[serde(default = "default_initial_variance")]
    pub initial_variance: f32,
}

/// One marker table entry
#[derive(Clone, Debug, Deserialize)]
pub struct LandmarkEntry {
    /// Marker identifier as reported by the detector
    pub id: u32,

    /// World position [x, y, z] in meters
    pub position: [f32; 3],
}

// Default value functions
fn default_timestep() -> f32 {
    0.01
}
fn default_max_landmarks() -> usize {
    8
}
fn default_measurement_variance() -> [f32; 3] {
    [0.1, 0.1, 0.1]
}
fn default_initial_variance() -> f32 {
    0.0
}

impl Default for EstimatorSection {
    fn default() -> Self {
        Self {
            timestep: default_timestep(),
            max_landmarks: default_max_landmarks(),
            measurement_variance: default_measurement_variance(),
            initial_variance: default_initial_variance(),
        }
    }
}

impl Default for TarakaConfig {
    fn default() -> Self {
        Self {
            estimator: EstimatorSection::default(),
            landmarks: Vec::new(),
        }
    }
}

impl TarakaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TarakaError::Config(format!("Failed to read config file: {}", e)))?;
        let config: TarakaConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Estimator configuration for [`crate::estimator::EkfLocalizer`]
    pub fn estimator_config(&self) -> EstimatorConfig {
        let [range_var, bearing_var, slack_var] = self.estimator.measurement_variance;
        EstimatorConfig {
            timestep: self.estimator.timestep,
            max_landmarks: self.estimator.max_landmarks,
            measurement_noise: MeasurementNoise {
                range_var,
                bearing_var,
                slack_var,
            },
            initial_variance: self.estimator.initial_variance,
        }
    }

    /// Build the landmark table from the configured entries
    pub fn landmark_table(&self) -> LandmarkTable {
        LandmarkTable::from_landmarks(self.landmarks.iter().map(|entry| Landmark {
            id: entry.id,
            position: Point3::new(entry.position[0], entry.position[1], entry.position[2]),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TarakaConfig::default();
        assert_eq!(config.estimator.timestep, 0.01);
        assert_eq!(config.estimator.max_landmarks, 8);
        assert!(config.landmark_table().is_empty());
    }

    #[test]
    fn test_parse_with_landmarks() {
        let toml_str = r#"
            [estimator]
            timestep = 0.02
            max_landmarks = 4

            [[landmarks]]
            id = 0
            position = [1.0, 0.1, 2.0]

            [[landmarks]]
            id = 3
            position = [-0.5, 0.2, 1.5]
        "#;

        let config: TarakaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.estimator.timestep, 0.02);
        assert_eq!(config.estimator.max_landmarks, 4);
        // Unspecified fields keep their defaults
        assert_eq!(config.estimator.measurement_variance, [0.1, 0.1, 0.1]);

        let table = config.landmark_table();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(3).unwrap().z, 1.5);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[estimator]\ninitial_variance = 0.05\n\n[[landmarks]]\nid = 1\nposition = [0.0, 0.0, 1.0]\n"
        )
        .unwrap();

        let config = TarakaConfig::load(file.path()).unwrap();
        assert_eq!(config.estimator.initial_variance, 0.05);
        assert_eq!(config.landmark_table().len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let result = TarakaConfig::load(Path::new("/nonexistent/taraka.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[estimator\ntimestep = ").unwrap();

        let result = TarakaConfig::load(file.path());
        assert!(matches!(result, Err(TarakaError::Config(_))));
    }
}
