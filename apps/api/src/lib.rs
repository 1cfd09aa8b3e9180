//! Cyberbank Incident API Library
//!
//! Incident tracking for banks: user registration and login with bearer
//! tokens, CRUD over incident reports, and image uploads. Built as layers:
//! domain records and repository contracts, PostgreSQL adapters, and an
//! axum HTTP API.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shutdown;
