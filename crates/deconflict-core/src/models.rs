//! Core data models for the deconfliction engine.

use serde::{Deserialize, Serialize};

use crate::error::DeconflictError;

/// A 3D position in the local planar frame, meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2) + (other.z - self.z).powi(2))
            .sqrt()
    }
}

/// A position with the time the aircraft is planned to occupy it.
///
/// Immutable once created; timestamps are seconds in the mission time frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub stamp_s: f64,
}

impl Waypoint {
    pub fn new(x: f64, y: f64, z: f64, stamp_s: f64) -> Self {
        Self { x, y, z, stamp_s }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y, self.z)
    }

    /// 3D Euclidean distance to another waypoint, ignoring timestamps.
    pub fn distance_to(&self, other: &Waypoint) -> f64 {
        self.position().distance_to(&other.position())
    }
}

/// One aircraft's planned or corrected trajectory segment, ordered by
/// non-decreasing timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaypointList {
    pub waypoints: Vec<Waypoint>,
}

impl WaypointList {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self { waypoints }
    }
}

/// Threat kinds the dispatcher knows how to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatKind {
    /// Predicted separation violation between two aircraft
    LossOfSeparation,
    /// Planned trajectory predicted to cross a forbidden region
    GeofenceConflict,
    /// Aircraft already inside a forbidden region
    GeofenceIntrusion,
}

/// A detected threat handed to the engine by the monitoring layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Threat {
    pub kind: ThreatKind,
    /// Aircraft involved: two for loss of separation, one for geofence threats.
    pub uav_ids: Vec<String>,
    /// Predicted conflict times, index-aligned with `uav_ids`.
    #[serde(default)]
    pub times_s: Vec<f64>,
    #[serde(default)]
    pub geofence_ids: Vec<String>,
}

impl Threat {
    /// Check the cardinality invariants for this threat's kind.
    pub fn validate(&self) -> Result<(), DeconflictError> {
        match self.kind {
            ThreatKind::LossOfSeparation => {
                if self.uav_ids.len() != 2 || self.times_s.len() != 2 {
                    return Err(DeconflictError::invalid_threat(format!(
                        "loss of separation requires 2 aircraft and 2 times, got {} and {}",
                        self.uav_ids.len(),
                        self.times_s.len()
                    )));
                }
            }
            ThreatKind::GeofenceConflict | ThreatKind::GeofenceIntrusion => {
                if self.uav_ids.len() != 1 || self.geofence_ids.len() != 1 {
                    return Err(DeconflictError::invalid_threat(format!(
                        "geofence threat requires 1 aircraft and 1 geofence, got {} and {}",
                        self.uav_ids.len(),
                        self.geofence_ids.len()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Geofence definition served by the geofence store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeofenceDef {
    Circle { x: f64, y: f64, radius: f64 },
    Polygon { xs: Vec<f64>, ys: Vec<f64> },
}

/// Aircraft affected by a resolution and their corrected plans, index-aligned.
#[derive(Debug, Clone, Default)]
pub struct ResolvedPlans {
    pub uav_ids: Vec<String>,
    pub plans: Vec<WaypointList>,
}

/// Outcome of one dispatcher invocation.
///
/// Constructed once per invocation and returned to the caller; a failed
/// resolution never carries partial plans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub success: bool,
    pub message: String,
    pub uav_ids: Vec<String>,
    pub deconflicted_plans: Vec<WaypointList>,
}

impl ResolutionResult {
    /// Successful resolution carrying one corrected plan per affected aircraft.
    pub fn solved(resolved: ResolvedPlans) -> Self {
        Self {
            success: true,
            message: "conflict solved".to_string(),
            uav_ids: resolved.uav_ids,
            deconflicted_plans: resolved.plans,
        }
    }

    /// Failed resolution with a message identifying the failing step.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            uav_ids: Vec::new(),
            deconflicted_plans: Vec::new(),
        }
    }

    /// Acknowledgement for a non-tactical request: success, no changes.
    pub fn no_op() -> Self {
        Self {
            success: true,
            message: "non-tactical request, no changes".to_string(),
            uav_ids: Vec::new(),
            deconflicted_plans: Vec::new(),
        }
    }
}
