// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod postgres_incident_repository;
pub mod postgres_user_repository;

pub use postgres_incident_repository::PostgresIncidentRepository;
pub use postgres_user_repository::PostgresUserRepository;
