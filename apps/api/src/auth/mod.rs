// Authentication: password hashing, bearer tokens and the auth service

pub mod jwt;
pub mod password;
pub mod service;

pub use service::{AuthError, AuthService, AuthSettings};
