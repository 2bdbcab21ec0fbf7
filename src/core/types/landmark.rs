//! Landmark and marker detection types.
//!
//! Landmarks are fixed visual markers at known world coordinates, keyed
//! by the identifier the detector reports. The table is loaded once from
//! configuration and never changes at runtime.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifier shared between the landmark table and marker detections.
pub type LandmarkId = u32;

/// A 3D position in meters.
///
/// Marker positions are three-dimensional even though the estimator is
/// planar: the measurement model reads the x and z components, following
/// the sensor convention where z points along the optical axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    /// Create a new position.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// True when every component is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A fixed marker at a known world position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub id: LandmarkId,
    pub position: Point3,
}

/// Static registry of known marker positions, keyed by identifier.
///
/// Iteration order is ascending id, which keeps correction order
/// deterministic across cycles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandmarkTable {
    entries: BTreeMap<LandmarkId, Point3>,
}

impl LandmarkTable {
    /// Build a table from landmark entries. Later duplicates of an id
    /// replace earlier ones.
    pub fn from_landmarks<I: IntoIterator<Item = Landmark>>(landmarks: I) -> Self {
        Self {
            entries: landmarks
                .into_iter()
                .map(|l| (l.id, l.position))
                .collect(),
        }
    }

    /// World position for an identifier, if registered.
    pub fn get(&self, id: LandmarkId) -> Option<&Point3> {
        self.entries.get(&id)
    }

    /// Number of registered landmarks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no landmarks are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (LandmarkId, &Point3)> {
        self.entries.iter().map(|(id, p)| (*id, p))
    }
}

/// One detected marker: identifier plus the position reported by the
/// detector in its sensor frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerDetection {
    pub id: LandmarkId,
    pub position: Point3,
}

/// A batch of detections delivered by one detector event.
pub type DetectionBatch = Vec<MarkerDetection>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lookup() {
        let table = LandmarkTable::from_landmarks([
            Landmark {
                id: 3,
                position: Point3::new(1.0, 0.0, 2.0),
            },
            Landmark {
                id: 1,
                position: Point3::new(0.0, 0.0, 1.0),
            },
        ]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(3).unwrap().z, 2.0);
        assert!(table.get(7).is_none());
    }

    #[test]
    fn test_table_iterates_ascending() {
        let table = LandmarkTable::from_landmarks([
            Landmark {
                id: 5,
                position: Point3::new(0.0, 0.0, 0.0),
            },
            Landmark {
                id: 2,
                position: Point3::new(0.0, 0.0, 0.0),
            },
            Landmark {
                id: 9,
                position: Point3::new(0.0, 0.0, 0.0),
            },
        ]);

        let ids: Vec<LandmarkId> = table.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[test]
    fn test_duplicate_id_last_wins() {
        let table = LandmarkTable::from_landmarks([
            Landmark {
                id: 1,
                position: Point3::new(1.0, 0.0, 0.0),
            },
            Landmark {
                id: 1,
                position: Point3::new(2.0, 0.0, 0.0),
            },
        ]);

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(1).unwrap().x, 2.0);
    }

    #[test]
    fn test_point3_is_finite() {
        assert!(Point3::new(1.0, 2.0, 3.0).is_finite());
        assert!(!Point3::new(f32::INFINITY, 0.0, 0.0).is_finite());
    }
}
