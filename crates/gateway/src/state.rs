//! Application state for dependency injection.

use std::sync::Arc;

use user_service_lib::infra::HealthCheck;
use user_service_lib::service::{AccessControl, UserLifecycle};
use user_service_lib::Services;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserLifecycle>,
    pub access: Arc<AccessControl>,
    pub health: Arc<dyn HealthCheck>,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        users: Arc<dyn UserLifecycle>,
        access: Arc<AccessControl>,
        health: Arc<dyn HealthCheck>,
    ) -> Self {
        Self {
            users,
            access,
            health,
        }
    }
}

impl From<Services> for AppState {
    fn from(services: Services) -> Self {
        Self::new(services.users, services.access, services.health)
    }
}
