//! Registry API HTTP client.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use deconflict_core::collaborators::{
    ConflictChecker, FlightPlanReader, GeofenceReader, PathFinder, TrajectoryReader,
};
use deconflict_core::error::DeconflictError;
use deconflict_core::geometry::{GridBounds, Polygon};
use deconflict_core::models::{GeofenceDef, Position, Threat, Waypoint, WaypointList};

/// HTTP client for the UTM registry services.
///
/// One client covers every collaborator seam; the registry exposes them
/// under a common base URL. The request timeout bounds each collaborator
/// call, so a stalled service surfaces as a failed step instead of hanging
/// the resolution.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct IdQuery<'a> {
    ids: &'a [String],
}

#[derive(Debug, Deserialize)]
struct TracksResponse {
    tracks: Vec<WaypointList>,
}

#[derive(Debug, Deserialize)]
struct PlansResponse {
    plans: Vec<WaypointList>,
}

#[derive(Debug, Deserialize)]
struct GeofencesResponse {
    geofences: Vec<GeofenceDef>,
}

#[derive(Debug, Serialize)]
struct CheckRequest<'a> {
    proposed_waypoints: &'a [Waypoint],
    threat: &'a Threat,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    threats: Vec<Threat>,
}

#[derive(Debug, Serialize)]
struct PathSearchRequest<'a> {
    path: &'a [Waypoint],
    start: Position,
    goal: Position,
    obstacle: &'a Polygon,
    bounds: GridBounds,
}

#[derive(Debug, Deserialize)]
struct PathSearchResponse {
    positions: Vec<Position>,
}

impl RegistryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
        }
    }

    async fn post_json<T, R>(&self, path: &str, body: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {url}"))?
            .error_for_status()
            .with_context(|| format!("POST {url}"))?;
        response
            .json()
            .await
            .with_context(|| format!("decoding response from {url}"))
    }
}

fn step_error(step: &'static str, err: anyhow::Error) -> DeconflictError {
    tracing::warn!(step, error = %err, "registry call failed");
    DeconflictError::collaborator(step, format!("{err:#}"))
}

impl TrajectoryReader for RegistryClient {
    async fn read_estimated_trajectories(
        &self,
        uav_ids: &[String],
    ) -> Result<Vec<WaypointList>, DeconflictError> {
        let response: TracksResponse = self
            .post_json("/v1/trajectories/query", &IdQuery { ids: uav_ids })
            .await
            .map_err(|err| step_error("trajectory read", err))?;
        Ok(response.tracks)
    }
}

impl FlightPlanReader for RegistryClient {
    async fn read_flight_plans(
        &self,
        uav_ids: &[String],
    ) -> Result<Vec<WaypointList>, DeconflictError> {
        let response: PlansResponse = self
            .post_json("/v1/flight-plans/query", &IdQuery { ids: uav_ids })
            .await
            .map_err(|err| step_error("flight plan read", err))?;
        Ok(response.plans)
    }
}

impl GeofenceReader for RegistryClient {
    async fn read_geofences(
        &self,
        geofence_ids: &[String],
    ) -> Result<Vec<GeofenceDef>, DeconflictError> {
        let response: GeofencesResponse = self
            .post_json("/v1/geofences/query", &IdQuery { ids: geofence_ids })
            .await
            .map_err(|err| step_error("geofence read", err))?;
        Ok(response.geofences)
    }
}

impl ConflictChecker for RegistryClient {
    async fn check_conflicts(
        &self,
        proposed: &[Waypoint],
        threat: &Threat,
    ) -> Result<Vec<Threat>, DeconflictError> {
        let request = CheckRequest {
            proposed_waypoints: proposed,
            threat,
        };
        let response: CheckResponse = self
            .post_json("/v1/conflicts/check", &request)
            .await
            .map_err(|err| step_error("conflict check", err))?;
        Ok(response.threats)
    }
}

impl PathFinder for RegistryClient {
    async fn find_path(
        &self,
        path: &[Waypoint],
        start: Position,
        goal: Position,
        obstacle: &Polygon,
        bounds: GridBounds,
    ) -> Result<Vec<Position>, DeconflictError> {
        let request = PathSearchRequest {
            path,
            start,
            goal,
            obstacle,
            bounds,
        };
        let response: PathSearchResponse = self
            .post_json("/v1/route/search", &request)
            .await
            .map_err(|err| step_error("path search", err))?;
        Ok(response.positions)
    }
}
