//! Seams to the out-of-scope UTM services.
//!
//! Each resolution step blocks on one of these calls and validates its
//! result before the next call issues. Implementations are expected to be
//! remote and must bound their own call time; an expired or failed call
//! surfaces as [`DeconflictError::CollaboratorUnavailable`].

use std::future::Future;

use crate::error::DeconflictError;
use crate::geometry::{GridBounds, Polygon};
use crate::models::{GeofenceDef, Position, Threat, Waypoint, WaypointList};

/// Estimated-trajectory store.
pub trait TrajectoryReader {
    /// One track per requested aircraft id, same order.
    fn read_estimated_trajectories(
        &self,
        uav_ids: &[String],
    ) -> impl Future<Output = Result<Vec<WaypointList>, DeconflictError>> + Send;
}

/// Flight-plan store.
pub trait FlightPlanReader {
    /// One plan per requested aircraft id, same order.
    fn read_flight_plans(
        &self,
        uav_ids: &[String],
    ) -> impl Future<Output = Result<Vec<WaypointList>, DeconflictError>> + Send;
}

/// Geofence store.
pub trait GeofenceReader {
    /// One definition per requested geofence id, same order.
    fn read_geofences(
        &self,
        geofence_ids: &[String],
    ) -> impl Future<Output = Result<Vec<GeofenceDef>, DeconflictError>> + Send;
}

/// Monitoring-side validation of a proposed correction.
pub trait ConflictChecker {
    /// Re-checks the proposed waypoints against the rest of the traffic
    /// picture. An empty result means the proposal is conflict-free.
    fn check_conflicts(
        &self,
        proposed: &[Waypoint],
        threat: &Threat,
    ) -> impl Future<Output = Result<Vec<Threat>, DeconflictError>> + Send;
}

/// Discrete path-search service (grid-based shortest path).
pub trait PathFinder {
    /// Returns an ordered route from `start` to `goal` that does not cross
    /// `obstacle`, searched within `bounds`.
    fn find_path(
        &self,
        path: &[Waypoint],
        start: Position,
        goal: Position,
        obstacle: &Polygon,
        bounds: GridBounds,
    ) -> impl Future<Output = Result<Vec<Position>, DeconflictError>> + Send;
}

/// Time re-parametrization of a spatial path.
pub trait TimeInterpolator {
    /// Produces `segment_count + 1` evenly spaced timestamps spanning the
    /// first and last entries of `times`.
    fn interpolate(&self, times: &[f64], segment_count: usize) -> Vec<f64>;
}

/// Uniform linear interpolation fulfilling the [`TimeInterpolator`] contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTimeInterpolator;

impl TimeInterpolator for LinearTimeInterpolator {
    fn interpolate(&self, times: &[f64], segment_count: usize) -> Vec<f64> {
        let (Some(&start), Some(&end)) = (times.first(), times.last()) else {
            return Vec::new();
        };
        if segment_count == 0 {
            return vec![start];
        }
        let span = end - start;
        (0..=segment_count)
            .map(|i| start + span * i as f64 / segment_count as f64)
            .collect()
    }
}
