use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::Config;
use crate::domain::repositories::IncidentRepository;
use crate::infrastructure::repositories::{PostgresIncidentRepository, PostgresUserRepository};
use crate::infrastructure::{Database, ImageStore};

/// Dependencies shared by all handlers
///
/// Built once at startup and cloned into each request; holds no mutable
/// state of its own.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub incidents: Arc<dyn IncidentRepository>,
    pub images: ImageStore,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        auth: AuthService,
        incidents: Arc<dyn IncidentRepository>,
        images: ImageStore,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            auth,
            incidents,
            images,
            max_upload_bytes,
        }
    }

    /// Wires the PostgreSQL repositories over `database`
    pub fn from_database(database: &Database, config: &Config) -> Self {
        let users = Arc::new(PostgresUserRepository::new(database.pool().clone()));
        let incidents = Arc::new(PostgresIncidentRepository::new(database.pool().clone()));

        Self::new(
            AuthService::new(users, config.auth.clone()),
            incidents,
            ImageStore::new(config.upload_dir.clone()),
            config.max_upload_bytes,
        )
    }
}
