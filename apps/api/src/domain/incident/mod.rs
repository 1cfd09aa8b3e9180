// Incident domain module
// Contains the incident record, its creation/update inputs and value objects

#![allow(clippy::module_inception)]

pub mod incident;
pub mod value_objects;

pub use incident::{Incident, IncidentChanges, NewIncident};
pub use value_objects::{IncidentTitle, Severity};
