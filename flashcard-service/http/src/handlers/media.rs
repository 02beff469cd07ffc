use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::header,
    response::{IntoResponse, Json},
};
use serde_json::Value;

use flashcard_application::{ReadTextRequest, UploadResponse};

use crate::error::{error_mapper, HttpError};
use crate::extract::ValidatedJson;
use crate::state::AppState;

struct UploadedField {
    bytes: Vec<u8>,
    content_type: Option<String>,
}

pub async fn label_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<Value>>, HttpError> {
    let field = read_field(multipart, "image").await?;
    tracing::info!(image_bytes = field.bytes.len(), "received label request");

    match state.media.label_image(field.bytes).await {
        Ok(labels) => {
            tracing::info!(label_count = labels.len(), "label request completed");
            Ok(Json(labels))
        }
        Err(error) => {
            tracing::error!(error = %error, "label request failed");
            Err(error_mapper(error))
        }
    }
}

pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpError> {
    let field = read_field(multipart, "file").await?;
    tracing::info!(
        byte_count = field.bytes.len(),
        content_type = field.content_type.as_deref().unwrap_or("unknown"),
        "received upload request"
    );

    match state.media.upload(field.bytes, field.content_type).await {
        Ok(response) => {
            tracing::info!(key = %response.key, "upload request completed");
            Ok(Json(response))
        }
        Err(error) => {
            tracing::error!(error = %error, "upload request failed");
            Err(error_mapper(error))
        }
    }
}

pub async fn read_text(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ReadTextRequest>,
) -> Result<impl IntoResponse, HttpError> {
    tracing::info!(char_count = request.text.chars().count(), "received read request");

    match state.media.read_aloud(request).await {
        Ok(audio) => {
            tracing::info!(audio_bytes = audio.bytes.len(), "read request completed");
            Ok(([(header::CONTENT_TYPE, audio.content_type)], audio.bytes))
        }
        Err(error) => {
            tracing::error!(error = %error, "read request failed");
            Err(error_mapper(error))
        }
    }
}

/// Drains the form until the named field shows up. Other fields are skipped.
async fn read_field(
    multipart: Result<Multipart, MultipartRejection>,
    name: &str,
) -> Result<UploadedField, HttpError> {
    let mut multipart = multipart.map_err(|rejection| HttpError::bad_request(rejection.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| HttpError::bad_request(err.body_text()))?
    {
        if field.name() != Some(name) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|err| HttpError::bad_request(err.body_text()))?;
        return Ok(UploadedField {
            bytes: bytes.to_vec(),
            content_type,
        });
    }

    Err(HttpError::bad_request(format!(
        "multipart field `{name}` is required"
    )))
}
