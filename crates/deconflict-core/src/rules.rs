//! Tunable parameters for the resolution strategies.

use serde::{Deserialize, Serialize};

/// Configuration for tactical resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionRules {
    /// Minimum horizontal separation between aircraft in meters
    pub min_horizontal_separation_m: f64,
    /// Minimum vertical separation between aircraft in meters
    pub min_vertical_separation_m: f64,
    /// Conflict re-check rate of the monitoring layer in Hz
    pub monitoring_rate_hz: f64,
    /// Distance a synthetic start point is pushed outside a geofence (meters)
    pub geofence_safety_margin_m: f64,
    /// Step used when growing the search grid around an obstacle (meters)
    pub grid_expansion_step_m: f64,
    /// Vertex count used to discretize circular geofences
    pub circle_polygon_vertices: usize,
}

impl Default for ResolutionRules {
    fn default() -> Self {
        Self {
            min_horizontal_separation_m: 10.0,
            min_vertical_separation_m: 10.0,
            monitoring_rate_hz: 0.5,
            geofence_safety_margin_m: 1.0,
            grid_expansion_step_m: 1.0,
            circle_polygon_vertices: 8,
        }
    }
}

impl ResolutionRules {
    /// Time-matching tolerance: one monitoring period.
    pub fn time_match_tolerance_s(&self) -> f64 {
        1.0 / self.monitoring_rate_hz
    }
}
