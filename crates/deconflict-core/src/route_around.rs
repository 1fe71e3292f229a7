//! Geofence conflict and intrusion resolution.
//!
//! Builds the obstacle polygon, derives the search grid, delegates to the
//! path-search collaborator and re-parametrizes the returned route with
//! timestamps from the filed plan.

use crate::collaborators::{FlightPlanReader, GeofenceReader, PathFinder, TimeInterpolator};
use crate::error::DeconflictError;
use crate::geometry::{self, Polygon};
use crate::models::{
    GeofenceDef, Position, ResolvedPlans, Threat, ThreatKind, Waypoint, WaypointList,
};
use crate::rules::ResolutionRules;

/// Resolve a geofence conflict or intrusion by routing around the region.
pub async fn resolve_route_around(
    threat: &Threat,
    flight_plans: &impl FlightPlanReader,
    geofences: &impl GeofenceReader,
    path_finder: &impl PathFinder,
    interpolator: &impl TimeInterpolator,
    rules: &ResolutionRules,
) -> Result<ResolvedPlans, DeconflictError> {
    threat.validate()?;
    let uav_id = threat.uav_ids[0].clone();
    let geofence_id = threat.geofence_ids[0].clone();

    let plans = flight_plans
        .read_flight_plans(std::slice::from_ref(&uav_id))
        .await?;
    let plan = plans
        .into_iter()
        .next()
        .ok_or_else(|| DeconflictError::not_found(format!("no flight plan for {uav_id}")))?;
    let path = plan.waypoints;
    if path.is_empty() {
        return Err(DeconflictError::not_found(format!(
            "flight plan for {uav_id} is empty"
        )));
    }

    let defs = geofences
        .read_geofences(std::slice::from_ref(&geofence_id))
        .await?;
    let def = defs
        .into_iter()
        .next()
        .ok_or_else(|| DeconflictError::not_found(format!("geofence {geofence_id} not found")))?;
    let polygon = polygon_from_def(def, rules)?;

    let (start, start_time_s) = match threat.kind {
        ThreatKind::GeofenceConflict => {
            let (entry_idx, entry) =
                geometry::find_entry_point(&polygon, &path).ok_or_else(|| {
                    DeconflictError::not_found(format!(
                        "flight path of {uav_id} never enters geofence {geofence_id}"
                    ))
                })?;
            (entry.position(), path[entry_idx].stamp_s)
        }
        ThreatKind::GeofenceIntrusion => {
            // Already inside: escape via the nearest boundary point, pushed
            // out by the safety margin, resolving from now (t = 0).
            let current = path[0].position();
            let start = escape_point(&polygon, current, rules.geofence_safety_margin_m);
            (start, 0.0)
        }
        ThreatKind::LossOfSeparation => {
            return Err(DeconflictError::invalid_threat(
                "route-around cannot resolve a separation threat",
            ));
        }
    };

    // Total on non-empty paths: a never-exiting path resolves to its final
    // position.
    let Some((goal_idx, goal_wp)) = geometry::find_exit_point(&polygon, &path) else {
        return Err(DeconflictError::not_found(format!(
            "flight plan for {uav_id} is empty"
        )));
    };
    let goal = goal_wp.position();

    let bounds = geometry::grid_bounds(&polygon, start, goal, rules.grid_expansion_step_m);
    let route = path_finder
        .find_path(&path, start, goal, &polygon, bounds)
        .await?;
    if route.len() < 2 {
        return Err(DeconflictError::not_found(format!(
            "path search returned no usable route around {geofence_id}"
        )));
    }

    let end_time_s = path[goal_idx].stamp_s;
    let stamps = interpolator.interpolate(&[start_time_s, end_time_s], route.len() - 1);
    if stamps.len() != route.len() {
        return Err(DeconflictError::collaborator(
            "time interpolation",
            format!("expected {} stamps, got {}", route.len(), stamps.len()),
        ));
    }

    let waypoints = route
        .iter()
        .zip(&stamps)
        .map(|(p, &stamp_s)| Waypoint::new(p.x, p.y, p.z, stamp_s))
        .collect();

    tracing::info!(
        uav = %uav_id,
        geofence = %geofence_id,
        points = route.len(),
        "routed around geofence"
    );

    Ok(ResolvedPlans {
        uav_ids: vec![uav_id],
        plans: vec![WaypointList::new(waypoints)],
    })
}

/// Build the obstacle polygon from a geofence definition.
fn polygon_from_def(def: GeofenceDef, rules: &ResolutionRules) -> Result<Polygon, DeconflictError> {
    match def {
        GeofenceDef::Circle { x, y, radius } => Ok(geometry::circle_to_polygon(
            x,
            y,
            radius,
            rules.circle_polygon_vertices,
        )),
        GeofenceDef::Polygon { xs, ys } => {
            if xs.len() != ys.len() {
                return Err(DeconflictError::not_found(format!(
                    "geofence polygon coordinate arrays differ in length: {} vs {}",
                    xs.len(),
                    ys.len()
                )));
            }
            Polygon::new(xs.into_iter().zip(ys).map(|(x, y)| [x, y]).collect())
        }
    }
}

/// Synthetic start for an aircraft already inside the forbidden region: the
/// nearest boundary point, pushed outward by `margin` along the direction
/// from the current position to that point.
fn escape_point(polygon: &Polygon, current: Position, margin: f64) -> Position {
    let from = [current.x, current.y];
    let nearest = nearest_boundary_point(polygon, from);

    let dx = nearest[0] - from[0];
    let dy = nearest[1] - from[1];
    let norm = (dx * dx + dy * dy).sqrt();
    let (ux, uy) = if norm > f64::EPSILON {
        (dx / norm, dy / norm)
    } else {
        // Current position sits on the boundary; pick a fixed direction so
        // the escape stays deterministic.
        (1.0, 0.0)
    };

    Position::new(nearest[0] + margin * ux, nearest[1] + margin * uy, current.z)
}

/// Closest boundary point to `from`: the minimum over every vertex and every
/// edge projection whose foot lands on the segment, including the closing
/// edge back to the first vertex.
fn nearest_boundary_point(polygon: &Polygon, from: [f64; 2]) -> [f64; 2] {
    let vertices = polygon.vertices();
    let mut best = vertices[0];
    let mut best_distance = f64::INFINITY;

    for (i, &vertex) in vertices.iter().enumerate() {
        let d = ((vertex[0] - from[0]).powi(2) + (vertex[1] - from[1]).powi(2)).sqrt();
        if d < best_distance {
            best_distance = d;
            best = vertex;
        }

        let next = vertices[(i + 1) % vertices.len()];
        let projection = geometry::project_to_segment(from, vertex, next);
        if let Some(d) = projection.distance {
            if d < best_distance {
                best_distance = d;
                best = projection.foot;
            }
        }
    }

    best
}
