//! Threat dispatcher: selects and sequences the resolution strategies.

use crate::collaborators::{
    ConflictChecker, FlightPlanReader, GeofenceReader, PathFinder, TimeInterpolator,
    TrajectoryReader,
};
use crate::models::{ResolutionResult, Threat, ThreatKind};
use crate::rules::ResolutionRules;
use crate::{route_around, separation};

/// Tactical conflict solver.
///
/// Stateless between invocations: replaying a request against unchanged
/// backing data reproduces the same result. Concurrent resolutions share
/// nothing but the collaborators.
pub struct ConflictSolver<TR, FP, GF, CK, PS, TI> {
    trajectories: TR,
    flight_plans: FP,
    geofences: GF,
    checker: CK,
    path_finder: PS,
    interpolator: TI,
    rules: ResolutionRules,
}

impl<TR, FP, GF, CK, PS, TI> ConflictSolver<TR, FP, GF, CK, PS, TI>
where
    TR: TrajectoryReader,
    FP: FlightPlanReader,
    GF: GeofenceReader,
    CK: ConflictChecker,
    PS: PathFinder,
    TI: TimeInterpolator,
{
    pub fn new(
        trajectories: TR,
        flight_plans: FP,
        geofences: GF,
        checker: CK,
        path_finder: PS,
        interpolator: TI,
        rules: ResolutionRules,
    ) -> Self {
        Self {
            trajectories,
            flight_plans,
            geofences,
            checker,
            path_finder,
            interpolator,
            rules,
        }
    }

    pub fn rules(&self) -> &ResolutionRules {
        &self.rules
    }

    /// Resolve a tactical threat into corrected flight plans.
    ///
    /// Non-tactical requests are acknowledged without changes. Any failure
    /// along the dispatched path short-circuits into a failed result with a
    /// message naming the failing step; no partial plans are returned.
    pub async fn resolve(&self, threat: &Threat, tactical: bool) -> ResolutionResult {
        if !tactical {
            return ResolutionResult::no_op();
        }

        if let Err(err) = threat.validate() {
            tracing::warn!(%err, "rejected malformed threat");
            return ResolutionResult::failure(err.to_string());
        }

        tracing::info!(kind = ?threat.kind, uavs = ?threat.uav_ids, "dispatching threat");
        let outcome = match threat.kind {
            ThreatKind::LossOfSeparation => {
                separation::resolve_loss_of_separation(
                    threat,
                    &self.trajectories,
                    &self.flight_plans,
                    &self.checker,
                    &self.rules,
                )
                .await
            }
            ThreatKind::GeofenceConflict | ThreatKind::GeofenceIntrusion => {
                route_around::resolve_route_around(
                    threat,
                    &self.flight_plans,
                    &self.geofences,
                    &self.path_finder,
                    &self.interpolator,
                    &self.rules,
                )
                .await
            }
        };

        match outcome {
            Ok(resolved) => {
                tracing::info!(uavs = ?resolved.uav_ids, "threat resolved");
                ResolutionResult::solved(resolved)
            }
            Err(err) => {
                tracing::error!(%err, "resolution failed");
                ResolutionResult::failure(err.to_string())
            }
        }
    }
}
