//! Shared server state.

use deconflict_core::collaborators::LinearTimeInterpolator;
use deconflict_core::solver::ConflictSolver;
use deconflict_registry::RegistryClient;

use crate::config::Config;

/// The solver instantiated against the registry services.
pub type RegistrySolver = ConflictSolver<
    RegistryClient,
    RegistryClient,
    RegistryClient,
    RegistryClient,
    RegistryClient,
    LinearTimeInterpolator,
>;

pub struct AppState {
    pub solver: RegistrySolver,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let client = RegistryClient::new(config.registry_url.clone());
        Self {
            solver: ConflictSolver::new(
                client.clone(),
                client.clone(),
                client.clone(),
                client.clone(),
                client,
                LinearTimeInterpolator,
                config.rules.clone(),
            ),
        }
    }
}
