//! QR upload handler
//!
//! Parses the multipart form, extracts the `file` part and decodes a QR
//! symbol from it. Every failure is answered with a JSON error body.

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use bytes::Bytes;

use crate::error::ApiError;
use crate::response::json_success;
use crate::state::AppState;

/// Name of the form part carrying the image
pub const FILE_FIELD: &str = "file";

/// File part taken from the upload form. Dropped when the request ends.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub headers: HeaderMap,
    pub data: Bytes,
}

/// ANY /api/v1/read
/// Decode the QR symbol in an uploaded image
pub async fn read_qr_code(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let upload = collect_upload(multipart?)
        .await?
        .ok_or(ApiError::MissingFile)?;

    tracing::info!(
        filename = %upload.file_name,
        size = upload.data.len(),
        content_type = ?upload.content_type,
        headers = ?upload.headers,
        "Uploaded file"
    );

    let decoder = state.decoder();
    let text = tokio::task::spawn_blocking(move || decoder.decode(&upload.data))
        .await
        .map_err(|e| ApiError::Internal(format!("Decoding task failed: {}", e)))??;

    tracing::info!(length = text.len(), "QR symbol decoded");

    Ok(json_success(text))
}

/// Reads the whole form, keeping the first `file` part that carries a filename.
///
/// Any malformed part fails the form, even one after the file.
async fn collect_upload(mut multipart: Multipart) -> Result<Option<UploadedFile>, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if upload.is_some() || field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(file_name) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
        else {
            continue;
        };

        let content_type = field.content_type().map(str::to_owned);
        let headers = field.headers().clone();
        let data = field.bytes().await?;

        upload = Some(UploadedFile {
            file_name,
            content_type,
            headers,
            data,
        });
    }

    Ok(upload)
}
