//! Mock collaborators shared by the resolver and dispatcher tests.

use std::sync::Mutex;

use crate::collaborators::{
    ConflictChecker, FlightPlanReader, GeofenceReader, PathFinder, TrajectoryReader,
};
use crate::error::DeconflictError;
use crate::geometry::{GridBounds, Polygon};
use crate::models::{GeofenceDef, Position, Threat, Waypoint, WaypointList};

pub(crate) fn wp(x: f64, y: f64, z: f64, stamp_s: f64) -> Waypoint {
    Waypoint::new(x, y, z, stamp_s)
}

fn lookup(
    store: &[(String, WaypointList)],
    ids: &[String],
    what: &str,
) -> Result<Vec<WaypointList>, DeconflictError> {
    ids.iter()
        .map(|id| {
            store
                .iter()
                .find(|(key, _)| key == id)
                .map(|(_, list)| list.clone())
                .ok_or_else(|| DeconflictError::not_found(format!("no {what} for {id}")))
        })
        .collect()
}

/// Serves fixed estimated trajectories keyed by aircraft id.
pub(crate) struct StaticTrajectories(pub Vec<(String, WaypointList)>);

impl TrajectoryReader for StaticTrajectories {
    async fn read_estimated_trajectories(
        &self,
        uav_ids: &[String],
    ) -> Result<Vec<WaypointList>, DeconflictError> {
        lookup(&self.0, uav_ids, "trajectory")
    }
}

/// Serves fixed flight plans keyed by aircraft id.
pub(crate) struct StaticPlans(pub Vec<(String, WaypointList)>);

impl FlightPlanReader for StaticPlans {
    async fn read_flight_plans(
        &self,
        uav_ids: &[String],
    ) -> Result<Vec<WaypointList>, DeconflictError> {
        lookup(&self.0, uav_ids, "flight plan")
    }
}

/// Serves fixed geofence definitions keyed by geofence id.
pub(crate) struct StaticGeofences(pub Vec<(String, GeofenceDef)>);

impl GeofenceReader for StaticGeofences {
    async fn read_geofences(
        &self,
        geofence_ids: &[String],
    ) -> Result<Vec<GeofenceDef>, DeconflictError> {
        geofence_ids
            .iter()
            .map(|id| {
                self.0
                    .iter()
                    .find(|(key, _)| key == id)
                    .map(|(_, def)| def.clone())
                    .ok_or_else(|| DeconflictError::not_found(format!("no geofence {id}")))
            })
            .collect()
    }
}

/// Replays a scripted sequence of check results, then reports conflict-free.
pub(crate) struct ScriptedChecker {
    script: Mutex<Vec<Vec<Threat>>>,
    pub calls: Mutex<Vec<Vec<Waypoint>>>,
}

impl ScriptedChecker {
    pub fn new(script: Vec<Vec<Threat>>) -> Self {
        Self {
            script: Mutex::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Checker that accepts the first proposal.
    pub fn conflict_free() -> Self {
        Self::new(Vec::new())
    }
}

impl ConflictChecker for ScriptedChecker {
    async fn check_conflicts(
        &self,
        proposed: &[Waypoint],
        _threat: &Threat,
    ) -> Result<Vec<Threat>, DeconflictError> {
        self.calls.lock().unwrap().push(proposed.to_vec());
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(script.remove(0))
        }
    }
}

/// Returns a fixed route regardless of the query.
pub(crate) struct FixedRoutePathFinder(pub Vec<Position>);

impl PathFinder for FixedRoutePathFinder {
    async fn find_path(
        &self,
        _path: &[Waypoint],
        _start: Position,
        _goal: Position,
        _obstacle: &Polygon,
        _bounds: GridBounds,
    ) -> Result<Vec<Position>, DeconflictError> {
        Ok(self.0.clone())
    }
}

/// Fails every call, standing in for an unreachable service.
pub(crate) struct Unavailable(pub &'static str);

impl Unavailable {
    fn err(&self) -> DeconflictError {
        DeconflictError::collaborator(self.0, "connection refused")
    }
}

impl TrajectoryReader for Unavailable {
    async fn read_estimated_trajectories(
        &self,
        _uav_ids: &[String],
    ) -> Result<Vec<WaypointList>, DeconflictError> {
        Err(self.err())
    }
}

impl FlightPlanReader for Unavailable {
    async fn read_flight_plans(
        &self,
        _uav_ids: &[String],
    ) -> Result<Vec<WaypointList>, DeconflictError> {
        Err(self.err())
    }
}

impl GeofenceReader for Unavailable {
    async fn read_geofences(
        &self,
        _geofence_ids: &[String],
    ) -> Result<Vec<GeofenceDef>, DeconflictError> {
        Err(self.err())
    }
}

impl ConflictChecker for Unavailable {
    async fn check_conflicts(
        &self,
        _proposed: &[Waypoint],
        _threat: &Threat,
    ) -> Result<Vec<Threat>, DeconflictError> {
        Err(self.err())
    }
}

impl PathFinder for Unavailable {
    async fn find_path(
        &self,
        _path: &[Waypoint],
        _start: Position,
        _goal: Position,
        _obstacle: &Polygon,
        _bounds: GridBounds,
    ) -> Result<Vec<Position>, DeconflictError> {
        Err(self.err())
    }
}
