//! Loss-of-separation resolution.
//!
//! Displaces both aircraft symmetrically away from each other at the
//! predicted conflict time, then re-validates the proposal with the
//! monitoring layer until no further conflict is reported.

use std::collections::{BTreeMap, BTreeSet};

use crate::collaborators::{ConflictChecker, FlightPlanReader, TrajectoryReader};
use crate::error::DeconflictError;
use crate::models::{ResolvedPlans, Threat, ThreatKind, Waypoint, WaypointList};
use crate::rules::ResolutionRules;

/// Resolve a loss-of-separation threat.
///
/// The loop chains on the first conflict reported by each re-check rather
/// than searching the conflict graph exhaustively; any collaborator failure
/// aborts the whole resolution.
pub async fn resolve_loss_of_separation(
    threat: &Threat,
    trajectories: &impl TrajectoryReader,
    flight_plans: &impl FlightPlanReader,
    checker: &impl ConflictChecker,
    rules: &ResolutionRules,
) -> Result<ResolvedPlans, DeconflictError> {
    let tolerance = rules.time_match_tolerance_s();
    let mut conflict = threat.clone();
    let mut affected: BTreeSet<String> = BTreeSet::new();
    let mut corrections: BTreeMap<String, Waypoint> = BTreeMap::new();

    loop {
        let (id1, time1, id2, time2) = separation_pair(&conflict)?;
        affected.insert(id1.clone());
        affected.insert(id2.clone());

        let ids = vec![id1.clone(), id2.clone()];
        let tracks = trajectories.read_estimated_trajectories(&ids).await?;
        let [track1, track2] = tracks.as_slice() else {
            return Err(DeconflictError::not_found(format!(
                "expected 2 trajectories for {id1}/{id2}, got {}",
                tracks.len()
            )));
        };

        let wp1 = match_waypoint_at(track1, time1, tolerance)?;
        let wp2 = match_waypoint_at(track2, time2, tolerance)?;

        let (new1, new2) = displace_apart(wp1, wp2, rules.min_horizontal_separation_m);
        corrections.insert(id1.clone(), new1);
        corrections.insert(id2.clone(), new2);

        let descriptor = Threat {
            kind: ThreatKind::LossOfSeparation,
            uav_ids: ids,
            times_s: vec![new1.stamp_s, new2.stamp_s],
            geofence_ids: Vec::new(),
        };
        let reported = checker.check_conflicts(&[new1, new2], &descriptor).await?;
        tracing::debug!(uav1 = %id1, uav2 = %id2, remaining = reported.len(), "re-checked separation proposal");

        match reported.into_iter().next() {
            Some(next) => conflict = next,
            None => break,
        }
    }

    let uav_ids: Vec<String> = affected.into_iter().collect();
    let plans = flight_plans.read_flight_plans(&uav_ids).await?;
    if plans.len() != uav_ids.len() {
        return Err(DeconflictError::not_found(format!(
            "expected {} flight plans, got {}",
            uav_ids.len(),
            plans.len()
        )));
    }

    let plans = uav_ids
        .iter()
        .zip(plans)
        .map(|(id, plan)| match corrections.get(id) {
            Some(&correction) => merge_correction(plan, correction, tolerance),
            None => plan,
        })
        .collect();

    Ok(ResolvedPlans { uav_ids, plans })
}

/// Extract the aircraft pair of a separation conflict, in threat order.
fn separation_pair(conflict: &Threat) -> Result<(String, f64, String, f64), DeconflictError> {
    if conflict.kind != ThreatKind::LossOfSeparation {
        return Err(DeconflictError::invalid_threat(
            "separation re-check reported a non-separation threat",
        ));
    }
    conflict.validate()?;
    Ok((
        conflict.uav_ids[0].clone(),
        conflict.times_s[0],
        conflict.uav_ids[1].clone(),
        conflict.times_s[1],
    ))
}

/// Locate the waypoint whose stamp lies within `tolerance` of `time_s`.
///
/// Timestamps are non-decreasing, so the two waypoints bracketing the
/// insertion point are the only candidates; anything further can only be
/// worse. Fails explicitly when neither is in tolerance.
fn match_waypoint_at(
    track: &WaypointList,
    time_s: f64,
    tolerance: f64,
) -> Result<Waypoint, DeconflictError> {
    let waypoints = &track.waypoints;
    let idx = waypoints.partition_point(|wp| wp.stamp_s < time_s);

    let mut best: Option<Waypoint> = None;
    for candidate in [idx.checked_sub(1), Some(idx)].into_iter().flatten() {
        let Some(&wp) = waypoints.get(candidate) else {
            continue;
        };
        let err = (wp.stamp_s - time_s).abs();
        let closer = best
            .map(|b| err < (b.stamp_s - time_s).abs())
            .unwrap_or(true);
        if err <= tolerance && closer {
            best = Some(wp);
        }
    }

    best.ok_or_else(|| {
        DeconflictError::not_found(format!(
            "no trajectory waypoint within {tolerance:.1}s of t={time_s:.1}s"
        ))
    })
}

/// Symmetric displacement restoring `min_separation` between two waypoints.
///
/// Each aircraft moves half the deficit directly away from the other along
/// the line connecting them; timestamps are preserved. When separation is
/// already met the positions are kept and only re-validated.
fn displace_apart(wp1: Waypoint, wp2: Waypoint, min_separation: f64) -> (Waypoint, Waypoint) {
    let distance = wp1.distance_to(&wp2);
    let push = if distance < min_separation {
        (min_separation - distance) / 2.0
    } else {
        0.0
    };

    let (ux, uy, uz) = if distance > f64::EPSILON {
        (
            (wp1.x - wp2.x) / distance,
            (wp1.y - wp2.y) / distance,
            (wp1.z - wp2.z) / distance,
        )
    } else {
        // Coincident aircraft leave the direction undefined; separate along
        // +x so the result stays deterministic.
        (1.0, 0.0, 0.0)
    };

    let new1 = Waypoint::new(
        wp1.x + push * ux,
        wp1.y + push * uy,
        wp1.z + push * uz,
        wp1.stamp_s,
    );
    let new2 = Waypoint::new(
        wp2.x - push * ux,
        wp2.y - push * uy,
        wp2.z - push * uz,
        wp2.stamp_s,
    );
    (new1, new2)
}

/// Substitute the corrected waypoint into the plan at its stamp.
///
/// The plan waypoint within `tolerance` of the correction's stamp is
/// replaced; when none matches, the correction is inserted preserving time
/// order. The rest of the plan is untouched.
fn merge_correction(mut plan: WaypointList, correction: Waypoint, tolerance: f64) -> WaypointList {
    let waypoints = &mut plan.waypoints;
    let idx = waypoints.partition_point(|wp| wp.stamp_s < correction.stamp_s);

    let mut nearest: Option<usize> = None;
    for candidate in [idx.checked_sub(1), Some(idx)].into_iter().flatten() {
        if candidate >= waypoints.len() {
            continue;
        }
        let err = (waypoints[candidate].stamp_s - correction.stamp_s).abs();
        let closer = nearest
            .map(|n| err < (waypoints[n].stamp_s - correction.stamp_s).abs())
            .unwrap_or(true);
        if err <= tolerance && closer {
            nearest = Some(candidate);
        }
    }

    match nearest {
        Some(i) => waypoints[i] = correction,
        None => waypoints.insert(idx, correction),
    }
    plan
}
