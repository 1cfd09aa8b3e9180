//! Shared fixtures for integration tests
//!
//! In-memory repository fakes so the full router can be driven without a
//! database.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use cyberbank_api::api::{build_router, AppState};
use cyberbank_api::auth::{AuthService, AuthSettings};
use cyberbank_api::domain::incident::{Incident, IncidentChanges, NewIncident};
use cyberbank_api::domain::repositories::{
    IncidentRepository, NewUser, RepositoryError, RepositoryResult, User, UserRepository,
};
use cyberbank_api::domain::user::Username;
use cyberbank_api::infrastructure::ImageStore;
use serde_json::Value;
use tower::util::ServiceExt; // for oneshot

pub const TEST_SECRET: &str = "integration-test-secret-0123456789";
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024;
pub const BOUNDARY: &str = "cyberbank-test-boundary";

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
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

#[derive(Default)]
struct IncidentTable {
    rows: Vec<Incident>,
    next_id: i32,
}

#[derive(Default)]
pub struct InMemoryIncidents {
    table: Mutex<IncidentTable>,
}

#[async_trait]
impl IncidentRepository for InMemoryIncidents {
    async fn list(&self) -> RepositoryResult<Vec<Incident>> {
        Ok(self.table.lock().unwrap().rows.clone())
    }

    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Incident>> {
        Ok(self
            .table
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn create(&self, incident: NewIncident) -> RepositoryResult<Incident> {
        let mut table = self.table.lock().unwrap();
        table.next_id += 1;
        let incident = Incident {
            id: table.next_id,
            title: incident.title.into_inner(),
            description: incident.description,
            severity: incident.severity,
            bank: incident.bank,
            created_at: Utc::now(),
            image_url: incident.image_url,
            created_by: incident.created_by,
        };
        table.rows.push(incident.clone());
        Ok(incident)
    }

    async fn update(
        &self,
        id: i32,
        changes: IncidentChanges,
    ) -> RepositoryResult<Option<Incident>> {
        let mut table = self.table.lock().unwrap();
        Ok(table.rows.iter_mut().find(|i| i.id == id).map(|incident| {
            changes.apply_to(incident);
            incident.clone()
        }))
    }

    async fn delete(&self, id: i32) -> RepositoryResult<bool> {
        let mut table = self.table.lock().unwrap();
        let before = table.rows.len();
        table.rows.retain(|i| i.id != id);
        Ok(table.rows.len() < before)
    }
}

/// Incident storage whose writes always fail, reads return nothing
#[derive(Default)]
pub struct UnavailableIncidents;

#[async_trait]
impl IncidentRepository for UnavailableIncidents {
    async fn list(&self) -> RepositoryResult<Vec<Incident>> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: i32) -> RepositoryResult<Option<Incident>> {
        Ok(None)
    }

    async fn create(&self, _incident: NewIncident) -> RepositoryResult<Incident> {
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn update(
        &self,
        _id: i32,
        _changes: IncidentChanges,
    ) -> RepositoryResult<Option<Incident>> {
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn delete(&self, _id: i32) -> RepositoryResult<bool> {
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    }
}

/// A router over fresh in-memory repositories and a private upload directory
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub upload_dir: PathBuf,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_incidents(Arc::new(InMemoryIncidents::default()))
    }

    /// Like [`TestApp::new`] but over the given incident storage
    pub fn with_incidents(incidents: Arc<dyn IncidentRepository>) -> Self {
        let upload_dir =
            std::env::temp_dir().join(format!("cyberbank-test-{}", uuid::Uuid::new_v4()));

        let auth = AuthService::new(
            Arc::new(InMemoryUsers::default()),
            AuthSettings {
                jwt_secret: TEST_SECRET.to_string(),
                token_ttl: Duration::minutes(30),
                bcrypt_cost: 4,
            },
        );
        let state = AppState::new(
            auth,
            incidents,
            ImageStore::new(upload_dir.clone()),
            MAX_UPLOAD_BYTES,
        );

        Self {
            router: build_router(state.clone()),
            state,
            upload_dir,
        }
    }

    /// Sends a request and returns the status and raw body
    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    /// Sends a request and parses the body as JSON (`Null` for empty bodies)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = self.send_raw(request).await;
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Registers a user and returns its access token
    pub async fn register(&self, username: &str, password: &str) -> String {
        let (status, json) = self
            .send(json_request(
                "POST",
                "/register",
                None,
                &serde_json::json!({ "username": username, "password": password }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", json);
        json["access_token"].as_str().unwrap().to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn form_request(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

/// Encodes text fields and an optional `file` part as `multipart/form-data`
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(uri: &str, token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={}", BOUNDARY),
    );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body)).unwrap()
}
