pub mod collaborators;
pub mod error;
pub mod geometry;
pub mod models;
pub mod route_around;
pub mod rules;
pub mod separation;
pub mod solver;

#[cfg(test)]
pub(crate) mod testing;

pub use collaborators::{
    ConflictChecker, FlightPlanReader, GeofenceReader, LinearTimeInterpolator, PathFinder,
    TimeInterpolator, TrajectoryReader,
};
pub use error::DeconflictError;
pub use geometry::{GridBounds, Polygon, SegmentProjection};
pub use models::{
    GeofenceDef, Position, ResolutionResult, ResolvedPlans, Threat, ThreatKind, Waypoint,
    WaypointList,
};
pub use rules::ResolutionRules;
pub use solver::ConflictSolver;
