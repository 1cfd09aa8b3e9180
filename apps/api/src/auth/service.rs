use std::sync::Arc;

use chrono::Duration;
use thiserror::Error;

use crate::auth::jwt::{self, TokenError};
use crate::auth::password::{hash_password_async, verify_password_async};
use crate::domain::repositories::{NewUser, RepositoryError, User, UserRepository};
use crate::domain::user::Username;

/// Signing and hashing parameters for [`AuthService`]
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"***")
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username already registered")]
    UsernameTaken,

    #[error("Incorrect username or password")]
    InvalidCredentials,

    /// Missing, malformed or expired token, or a token for an unknown user
    #[error("Could not validate credentials: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    Validation(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("{0}")]
    Token(TokenError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Registration, login and token checks over a [`UserRepository`]
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    settings: AuthSettings,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, settings: AuthSettings) -> Self {
        Self { users, settings }
    }

    /// Creates a user and returns a fresh bearer token for it
    ///
    /// Any non-empty username and any password are accepted. Fails with
    /// [`AuthError::UsernameTaken`] when the username exists, including when a
    /// concurrent registration wins the unique index.
    pub async fn register(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let username = Username::new(username).map_err(AuthError::Validation)?;

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let hashed_password =
            hash_password_async(password.to_string(), self.settings.bcrypt_cost)
                .await
                .map_err(AuthError::Hashing)?;

        let user = self
            .users
            .create(NewUser {
                username,
                hashed_password,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");

        self.issue_token(&user.username, None)
    }

    /// Checks credentials and returns a fresh bearer token
    ///
    /// Unknown users and wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let username = Username::new(username).map_err(|_| AuthError::InvalidCredentials)?;

        let Some(user) = self.users.find_by_username(&username).await? else {
            tracing::warn!(username = %username, "Login failed: unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        let valid = verify_password_async(password.to_string(), user.hashed_password.clone())
            .await
            .map_err(AuthError::Hashing)?;
        if !valid {
            tracing::warn!(username = %username, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(user_id = user.id, username = %user.username, "User logged in");

        self.issue_token(&user.username, None)
    }

    /// Signs a token for `username`, valid for `ttl` or the configured default
    pub fn issue_token(
        &self,
        username: &Username,
        ttl: Option<Duration>,
    ) -> Result<String, AuthError> {
        jwt::create_token(
            username.as_str(),
            &self.settings.jwt_secret,
            ttl.unwrap_or(self.settings.token_ttl),
        )
        .map_err(AuthError::Token)
    }

    /// Resolves a bearer token to the user it was issued for
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let claims = jwt::verify_token(token, &self.settings.jwt_secret)
            .map_err(|e| AuthError::Unauthorized(e.to_string()))?;

        let username = Username::new(&claims.sub)
            .map_err(|_| AuthError::Unauthorized("invalid subject".to_string()))?;

        self.users
            .find_by_username(&username)
            .await?
            .ok_or_else(|| AuthError::Unauthorized("user not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::domain::repositories::RepositoryResult;

    #[derive(Default)]
    struct FakeUsers {
        rows: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl UserRepository for FakeUsers {
        async fn create(&self, user: NewUser) -> RepositoryResult<User> {
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|u| u.username == user.username) {
                return Err(RepositoryError::Conflict(user.username.to_string()));
            }
            let user = User {
                id: rows.len() as i32 + 1,
                username: user.username,
                hashed_password: user.hashed_password,
            };
            rows.push(user.clone());
            Ok(user)
        }

        async fn find_by_username(&self, username: &Username) -> RepositoryResult<Option<User>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|u| &u.username == username)
                .cloned())
        }
    }

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(FakeUsers::default()),
            AuthSettings {
                jwt_secret: "unit-test-secret-0123456789".to_string(),
                token_ttl: Duration::minutes(30),
                bcrypt_cost: 4,
            },
        )
    }

    #[tokio::test]
    async fn register_then_authenticate() {
        let auth = service();
        let token = auth.register("alice", "secret123").await.expect("registered");

        let user = auth.authenticate(&token).await.expect("authenticated");
        assert_eq!(user.username.as_str(), "alice");
        assert_ne!(user.hashed_password, "secret123");
    }

    #[tokio::test]
    async fn register_duplicate_username() {
        let auth = service();
        auth.register("alice", "secret123").await.unwrap();

        let result = auth.register("alice", "another-pass").await;
        assert!(matches!(result, Err(AuthError::UsernameTaken)));
    }

    #[tokio::test]
    async fn register_accepts_short_credentials() {
        let auth = service();

        let token = auth.register("bo", "pw").await.expect("registered");
        assert_eq!(auth.authenticate(&token).await.unwrap().username.as_str(), "bo");

        let token = auth.login("bo", "pw").await.expect("logged in");
        assert!(auth.authenticate(&token).await.is_ok());
    }

    #[tokio::test]
    async fn register_rejects_empty_username() {
        let auth = service();
        assert!(matches!(
            auth.register("  ", "secret123").await,
            Err(AuthError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn login_with_correct_password() {
        let auth = service();
        auth.register("alice", "secret123").await.unwrap();

        let token = auth.login("alice", "secret123").await.expect("logged in");
        assert!(auth.authenticate(&token).await.is_ok());
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials() {
        let auth = service();
        auth.register("alice", "secret123").await.unwrap();

        assert!(matches!(
            auth.login("alice", "wrong-pass").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("mallory", "secret123").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("", "secret123").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let auth = service();
        auth.register("alice", "secret123").await.unwrap();

        let username = Username::new("alice").unwrap();
        let token = auth
            .issue_token(&username, Some(Duration::seconds(-5)))
            .unwrap();

        assert!(matches!(
            auth.authenticate(&token).await,
            Err(AuthError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn token_for_unknown_user_is_unauthorized() {
        let auth = service();
        let ghost = Username::new("ghost").unwrap();
        let token = auth.issue_token(&ghost, None).unwrap();

        assert!(matches!(
            auth.authenticate(&token).await,
            Err(AuthError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let auth = service();
        assert!(matches!(
            auth.authenticate("not-a-token").await,
            Err(AuthError::Unauthorized(_))
        ));
    }

    #[test]
    fn settings_debug_hides_secret() {
        let settings = AuthSettings {
            jwt_secret: "super-secret-value".to_string(),
            token_ttl: Duration::minutes(30),
            bcrypt_cost: 4,
        };
        assert!(!format!("{:?}", settings).contains("super-secret-value"));
    }
}
