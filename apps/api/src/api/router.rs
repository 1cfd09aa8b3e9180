use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{auth, health, incidents, uploads};
use crate::api::state::AppState;
use crate::infrastructure::uploads::UPLOADS_ROUTE;

/// Builds the full application router over `state`
///
/// Incident and upload routes require a bearer token; `/health`,
/// `/register`, `/login` and stored images are public.
pub fn build_router(state: AppState) -> Router {
    // Allow everything (development posture)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_routes = Router::new()
        .route("/upload", post(uploads::upload_image))
        .route("/upload/", post(uploads::upload_image))
        .route(
            "/incidents/with-image",
            post(incidents::create_incident_with_image),
        )
        .layer(DefaultBodyLimit::max(state.max_upload_bytes));

    let images = ServeDir::new(state.images.dir());

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth routes
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        // Incident routes
        .route(
            "/incidents",
            get(incidents::list_incidents).post(incidents::create_incident),
        )
        .route(
            "/incidents/:id",
            get(incidents::get_incident)
                .put(incidents::update_incident)
                .delete(incidents::delete_incident),
        )
        .merge(upload_routes)
        .nest_service(UPLOADS_ROUTE, images)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
