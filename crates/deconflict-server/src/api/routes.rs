//! REST API routes.

use std::sync::Arc;

use axum::{extract::State, middleware, routing::post, Json, Router};
use serde::Deserialize;

use crate::api::request_id;
use crate::state::AppState;
use deconflict_core::models::{ResolutionResult, Threat};

#[derive(Debug, Deserialize)]
pub struct DeconflictionRequest {
    pub threat: Threat,
    /// Only tactical requests are resolved; others are acknowledged as-is.
    #[serde(default)]
    pub tactical: bool,
}

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/deconfliction", post(resolve_threat))
        .layer(middleware::from_fn(request_id::ensure_request_id))
}

/// Resolve a tactical threat into corrected flight plans.
pub async fn resolve_threat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DeconflictionRequest>,
) -> Json<ResolutionResult> {
    Json(state.solver.resolve(&request.threat, request.tactical).await)
}
