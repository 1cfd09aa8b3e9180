// Domain layer module exports
// Records, value objects and repository contracts for users and incidents
// Domain is independent of infrastructure concerns

pub mod incident;
pub mod repositories;
pub mod user;
