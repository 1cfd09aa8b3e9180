pub mod auth;
pub mod health;
pub mod incidents;
pub mod uploads;
