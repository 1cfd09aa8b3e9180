// Infrastructure layer module
// Contains the database handle, repository adapters and upload storage
// Follows Hexagonal Architecture

pub mod database;
pub mod repositories;
pub mod uploads;

pub use database::Database;
pub use uploads::ImageStore;
