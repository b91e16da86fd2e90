// File upload HTTP routes

use axum::{
    extract::{multipart::Field, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use petgallery_core::{FileUpload, UploadError};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::MAX_UPLOAD_BYTES;
use crate::services::FileService;

/// Multipart field carrying the upload
const FILE_FIELD: &str = "file";

/// Multipart form accepted by the upload endpoint
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// App state for file routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FileService>,
}

impl AppState {
    pub fn new(service: FileService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Create file routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/file", post(upload_file))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// POST /api/file - Upload an image
#[utoipa::path(
    post,
    path = "/api/file",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File uploaded; body is its public URL", body = String),
        (status = 400, description = "File not uploaded", body = Vec<String>)
    ),
    tag = "files"
)]
pub async fn upload_file(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let upload = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(FILE_FIELD) => break read_field(field).await,
            Ok(Some(_)) => continue,
            Ok(None) => break Err(UploadError::MissingFile),
            Err(e) => break Err(UploadError::Io(std::io::Error::other(e.body_text()))),
        }
    };

    let result = match upload {
        Ok(file) => state.service.upload_file(file).await,
        Err(e) => FileService::failed(FILE_FIELD, &e),
    };

    if !result.is_success() {
        return (StatusCode::BAD_REQUEST, Json(result.into_messages())).into_response();
    }

    match result.into_payload() {
        Some(url) => (StatusCode::CREATED, Json(url)).into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn read_field(field: Field<'_>) -> Result<FileUpload, UploadError> {
    let file_name = field
        .file_name()
        .map(str::to_string)
        .ok_or_else(|| UploadError::InvalidFileName(String::new()))?;
    let content_type = field.content_type().map(str::to_string);
    let bytes = field
        .bytes()
        .await
        .map_err(|e| UploadError::Io(std::io::Error::other(e.body_text())))?;

    Ok(FileUpload::new(file_name, content_type, bytes.to_vec()))
}
