//! Identifier-based association of detections with table entries.
//!
//! Association is trivial here: the detector reports the same identifier
//! the table is keyed by. Identifiers present on only one side are
//! expected every cycle (transient non-detections, markers from another
//! site's table) and are dropped without comment.

use std::collections::BTreeMap;

use crate::core::types::{LandmarkId, LandmarkTable, MarkerDetection, Point3};

/// One matched detection, ready to drive a correction step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionInput {
    pub id: LandmarkId,
    /// Position the detector reported, sensor frame
    pub detected: Point3,
    /// Known world position from the table
    pub world: Point3,
}

/// Match buffered detections against the landmark table.
///
/// Emits one correction input per identifier present in both, in
/// ascending id order so the sequential update is deterministic.
pub fn associate(
    pending: &BTreeMap<LandmarkId, MarkerDetection>,
    table: &LandmarkTable,
) -> Vec<CorrectionInput> {
    pending
        .iter()
        .filter_map(|(id, detection)| {
            table.get(*id).map(|world| CorrectionInput {
                id: *id,
                detected: detection.position,
                world: *world,
            })
        })
        .collect()
}
