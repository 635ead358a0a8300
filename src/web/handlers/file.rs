//! File handlers for Web API.

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::file::{
    DeleteOutcome, FileRecord, FileService, UpdateOutcome, UpdateRequest, UploadRequest,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Uploaded file part of a multipart form.
struct FilePart {
    file_name: String,
    content: Vec<u8>,
}

/// Fields collected from a multipart form.
#[derive(Default)]
struct FileForm {
    file: Option<FilePart>,
    file_name: Option<String>,
    file_extension: Option<String>,
}

impl FileForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = FileForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();

            match name.as_str() {
                "file" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content = field.bytes().await?.to_vec();
                    form.file = Some(FilePart { file_name, content });
                }
                "fileName" => form.file_name = Some(field.text().await?),
                "fileExtension" => form.file_extension = Some(field.text().await?),
                _ => {}
            }
        }

        Ok(form)
    }

    fn take_file(&mut self) -> Result<FilePart, ApiError> {
        self.file
            .take()
            .ok_or_else(|| ApiError::bad_request("No file provided"))
    }
}

/// POST /api/files/upload - Upload a file.
///
/// Request body: multipart/form-data with a "file" field. A file with the
/// same name and size as an existing one is accepted without being stored.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<StatusCode, ApiError> {
    let part = FileForm::read(multipart).await?.take_file()?;

    let service = FileService::new(&state.db, state.blob_store.as_ref());
    let outcome = service
        .upload(&UploadRequest::new(part.file_name, part.content))
        .await?;

    tracing::debug!("{} (id {})", outcome.message(), outcome.record().id);
    Ok(StatusCode::OK)
}

/// GET /api/files/list - List all files.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FileRecord>>, ApiError> {
    let service = FileService::new(&state.db, state.blob_store.as_ref());
    Ok(Json(service.list().await?))
}

/// GET /api/files/list/:id - Get a single file record.
///
/// An unknown ID answers 200 with a `null` body.
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<i64>,
) -> Result<Json<Option<FileRecord>>, ApiError> {
    let service = FileService::new(&state.db, state.blob_store.as_ref());
    Ok(Json(service.get_single(file_id).await?))
}

/// GET /api/files/content/:id - Get the raw content of a file.
///
/// An unknown ID or unreadable blob answers 200 with an empty body.
pub async fn get_file_content(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<i64>,
) -> Result<Response, ApiError> {
    let service = FileService::new(&state.db, state.blob_store.as_ref());
    let content = service.get_content(file_id).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .body(Body::from(content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

/// PUT /api/files/update/:id - Replace a file.
///
/// Request body: multipart/form-data with "file", "fileName" and
/// "fileExtension" fields.
pub async fn update_file(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<i64>,
    multipart: Multipart,
) -> Result<StatusCode, ApiError> {
    let mut form = FileForm::read(multipart).await?;
    let part = form.take_file()?;
    let file_name = form
        .file_name
        .ok_or_else(|| ApiError::bad_request("Missing fileName"))?;
    let file_extension = form
        .file_extension
        .ok_or_else(|| ApiError::bad_request("Missing fileExtension"))?;

    let service = FileService::new(&state.db, state.blob_store.as_ref());
    let request = UpdateRequest::new(part.file_name, part.content, file_name, file_extension);

    match service.update(file_id, &request).await {
        UpdateOutcome::Updated(_) => Ok(StatusCode::OK),
        outcome @ UpdateOutcome::NotFound => Err(ApiError::not_found(outcome.message())),
        UpdateOutcome::Failed(e) => Err(e.into()),
    }
}

/// DELETE /api/files/delete/:id - Delete a file.
///
/// Answers 204 once the record is gone, even if the blob could not be removed.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let service = FileService::new(&state.db, state.blob_store.as_ref());

    if service.get_single(file_id).await?.is_none() {
        return Err(ApiError::not_found("File not found!"));
    }

    match service.delete(file_id).await? {
        DeleteOutcome::Deleted => {}
        DeleteOutcome::Failed(msg) => tracing::warn!("{}", msg),
    }

    Ok(StatusCode::NO_CONTENT)
}
