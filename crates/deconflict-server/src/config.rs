//! Server configuration from environment.

use std::env;

use deconflict_core::rules::ResolutionRules;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub registry_url: String,
    pub rules: ResolutionRules,
}

impl Config {
    pub fn from_env() -> Self {
        let mut rules = ResolutionRules::default();
        if let Some(value) = env_f64("DECONFLICT_MIN_SEPARATION_M") {
            rules.min_horizontal_separation_m = value;
        }
        if let Some(value) = env_f64("DECONFLICT_MONITORING_RATE_HZ") {
            rules.monitoring_rate_hz = value;
        }
        if let Some(value) = env_f64("DECONFLICT_SAFETY_MARGIN_M") {
            rules.geofence_safety_margin_m = value;
        }

        Self {
            server_port: env::var("DECONFLICT_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(4000),
            registry_url: env::var("REGISTRY_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            rules,
        }
    }
}

fn env_f64(key: &str) -> Option<f64> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
