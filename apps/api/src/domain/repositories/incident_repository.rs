use async_trait::async_trait;

use super::RepositoryResult;
use crate::domain::incident::{Incident, IncidentChanges, NewIncident};

/// Repository trait for incidents
///
/// Every method is a single independent statement; there is no unit of work
/// spanning calls.
#[async_trait]
pub trait IncidentRepository: Send + Sync {
    /// All incidents, ordered by id
    async fn list(&self) -> RepositoryResult<Vec<Incident>>;

    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Incident>>;

    /// Insert an incident; id and creation timestamp are assigned by storage
    async fn create(&self, incident: NewIncident) -> RepositoryResult<Incident>;

    /// Apply a partial update. Returns `None` if no incident has this id.
    async fn update(&self, id: i32, changes: IncidentChanges)
        -> RepositoryResult<Option<Incident>>;

    /// Delete an incident. Returns `false` if no incident has this id.
    async fn delete(&self, id: i32) -> RepositoryResult<bool>;
}
