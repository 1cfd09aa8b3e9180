use async_trait::async_trait;

use super::RepositoryResult;
use crate::domain::user::Username;

/// A registered user as stored
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub username: Username,
    pub hashed_password: String,
}

/// Data needed to insert a user; `id` is assigned by storage
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub hashed_password: String,
}

/// Repository trait for users
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    ///
    /// Fails with `RepositoryError::Conflict` when the username is taken.
    async fn create(&self, user: NewUser) -> RepositoryResult<User>;

    /// Find a user by username
    async fn find_by_username(&self, username: &Username) -> RepositoryResult<Option<User>>;
}
