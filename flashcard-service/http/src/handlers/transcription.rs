use axum::{extract::State, response::Json};
use tokio_util::sync::CancellationToken;

use flashcard_application::{ApplicationError, TranscribeAudioRequest};
use flashcard_domain::TranscriptionPayload;

use crate::error::{error_mapper, HttpError};
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// Runs the orchestration on its own task. If the client goes away this
/// future is dropped, the guard cancels the token and polling stops.
pub async fn transcribe_audio(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TranscribeAudioRequest>,
) -> Result<Json<TranscriptionPayload>, HttpError> {
    tracing::info!(
        key = %request.key,
        media_format = %request.media_format,
        sample_rate_hz = request.media_sample_rate_hertz,
        "received transcribe request"
    );

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();
    let usecase = state.transcription.clone();
    let task = tokio::spawn(async move { usecase.transcribe(request, cancel).await });

    let outcome = match task.await {
        Ok(outcome) => outcome,
        Err(join_error) => Err(ApplicationError::Internal(format!(
            "transcription task aborted: {join_error}"
        ))),
    };

    match outcome {
        Ok(payload) => {
            tracing::info!(field_count = payload.fields().len(), "transcribe request completed");
            Ok(Json(payload))
        }
        Err(error) => {
            tracing::error!(error = %error, "transcribe request failed");
            Err(error_mapper(error))
        }
    }
}
