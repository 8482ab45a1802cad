//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, HealthCheck, UserRepository, UserStore};
use crate::services::{AuthService, Authenticator, UserManager, UserService};

/// Services shared by every handler. Cloned per request, so everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Registration, login and token verification
    pub auth_service: Arc<dyn AuthService>,
    /// User lookups and mutations
    pub user_service: Arc<dyn UserService>,
    /// Backend pinged by `/health`
    pub database: Arc<dyn HealthCheck>,
}

impl AppState {
    /// Wire the SeaORM-backed services around a connected database.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(UserStore::new(database.get_connection()));
        Self::from_repository(users, database, config)
    }

    /// Wire the default services around any user repository.
    pub fn from_repository(
        users: Arc<dyn UserRepository>,
        database: Arc<dyn HealthCheck>,
        config: Config,
    ) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(users.clone(), config)),
            user_service: Arc::new(UserManager::new(users)),
            database,
        }
    }

    /// Create application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        database: Arc<dyn HealthCheck>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            database,
        }
    }
}
