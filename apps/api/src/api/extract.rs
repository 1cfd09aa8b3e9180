// Request extractors whose rejections use the `{"detail"}` error body

use axum::extract::{FromRequest, FromRequestParts};

use crate::api::errors::ApiError;

/// JSON request body; malformed or incomplete bodies are 400
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// URL-encoded form body; missing or invalid fields are 400
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Form), rejection(ApiError))]
pub struct FormBody<T>(pub T);

/// Typed path parameters; unparseable segments are 400
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);
