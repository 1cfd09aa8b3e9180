use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::extract::{JsonBody, PathParam};
use crate::api::handlers::uploads::MultipartForm;
use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;
use crate::domain::incident::{Incident, IncidentChanges, NewIncident, Severity};

/// Request body for creating an incident
#[derive(Debug, Deserialize)]
pub struct CreateIncidentRequest {
    pub title: String,
    pub description: String,
    pub severity: String,
    pub bank: String,
    pub image_url: Option<String>,
}

/// Request body for a partial update; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateIncidentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub bank: Option<String>,
    pub image_url: Option<String>,
}

/// Incident as returned by the API
#[derive(Debug, Serialize)]
pub struct IncidentResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub bank: String,
    pub date: DateTime<Utc>,
    pub image_url: Option<String>,
    pub created_by: Option<i32>,
}

impl From<Incident> for IncidentResponse {
    fn from(incident: Incident) -> Self {
        Self {
            id: incident.id,
            title: incident.title,
            description: incident.description,
            severity: incident.severity,
            bank: incident.bank,
            date: incident.created_at,
            image_url: incident.image_url,
            created_by: incident.created_by,
        }
    }
}

/// Response from a successful delete
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub detail: String,
}

fn incident_not_found() -> ApiError {
    ApiError::not_found("Incident not found")
}

/// List all incidents
///
/// GET /incidents
pub async fn list_incidents(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Vec<IncidentResponse>>, ApiError> {
    let incidents = state.incidents.list().await?;

    Ok(Json(incidents.into_iter().map(IncidentResponse::from).collect()))
}

/// Get an incident by ID
///
/// GET /incidents/:id
pub async fn get_incident(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    PathParam(id): PathParam<i32>,
) -> Result<Json<IncidentResponse>, ApiError> {
    let incident = state
        .incidents
        .find_by_id(id)
        .await?
        .ok_or_else(incident_not_found)?;

    Ok(Json(incident.into()))
}

/// Create an incident from a JSON body
///
/// POST /incidents
pub async fn create_incident(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(req): JsonBody<CreateIncidentRequest>,
) -> Result<(StatusCode, Json<IncidentResponse>), ApiError> {
    let new_incident = NewIncident::new(&req.title, req.description, &req.severity, req.bank)
        .map_err(ApiError::bad_request)?
        .with_image_url(req.image_url)
        .created_by(user.id);

    save_new_incident(&state, new_incident).await
}

/// Create an incident from a multipart form with an optional image
///
/// POST /incidents/with-image
///
/// Fields: `title`, `description`, `severity`, `bank`, and optionally `file`.
pub async fn create_incident_with_image(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<IncidentResponse>), ApiError> {
    let mut form = MultipartForm::read(&mut multipart).await?;

    let title = form.take_required("title")?;
    let description = form.take_required("description")?;
    let severity = form.take_required("severity")?;
    let bank = form.take_required("bank")?;

    // Validate before touching the disk
    let new_incident =
        NewIncident::new(&title, description, &severity, bank).map_err(ApiError::bad_request)?;

    let image_url = form.store_file(&state).await?;

    let result = save_new_incident(
        &state,
        new_incident
            .with_image_url(image_url.clone())
            .created_by(user.id),
    )
    .await;

    // No row points at the image if the insert failed
    if let (Err(_), Some(url)) = (&result, &image_url) {
        state.images.discard(url).await;
    }

    result
}

async fn save_new_incident(
    state: &AppState,
    new_incident: NewIncident,
) -> Result<(StatusCode, Json<IncidentResponse>), ApiError> {
    let incident = state.incidents.create(new_incident).await?;

    tracing::info!(
        incident_id = incident.id,
        created_by = ?incident.created_by,
        severity = %incident.severity,
        "Incident created"
    );

    Ok((StatusCode::CREATED, Json(incident.into())))
}

/// Update the supplied fields of an incident
///
/// PUT /incidents/:id
pub async fn update_incident(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathParam(id): PathParam<i32>,
    JsonBody(req): JsonBody<UpdateIncidentRequest>,
) -> Result<Json<IncidentResponse>, ApiError> {
    let changes = IncidentChanges::new(
        req.title,
        req.description,
        req.severity,
        req.bank,
        req.image_url,
    )
    .map_err(ApiError::bad_request)?;

    let incident = if changes.is_empty() {
        state.incidents.find_by_id(id).await?
    } else {
        state.incidents.update(id, changes).await?
    }
    .ok_or_else(incident_not_found)?;

    tracing::info!(incident_id = id, user_id = user.id, "Incident updated");

    Ok(Json(incident.into()))
}

/// Delete an incident
///
/// DELETE /incidents/:id
pub async fn delete_incident(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathParam(id): PathParam<i32>,
) -> Result<Json<DeleteResponse>, ApiError> {
    if !state.incidents.delete(id).await? {
        return Err(incident_not_found());
    }

    tracing::info!(incident_id = id, user_id = user.id, "Incident deleted");

    Ok(Json(DeleteResponse {
        detail: "Incident deleted successfully".to_string(),
    }))
}
