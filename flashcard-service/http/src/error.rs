use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use flashcard_application::{ApplicationError, TranscriptionError};
use flashcard_domain::DomainError;

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: String,
    alt_messages: Vec<String>,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            alt_messages: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn with_alt_message(mut self, message: impl Into<String>) -> Self {
        self.alt_messages.push(message.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "message": self.message,
                "altMessages": self.alt_messages,
            })),
        )
            .into_response()
    }
}

pub fn error_mapper(error: ApplicationError) -> HttpError {
    let status = match &error {
        ApplicationError::Validation(_) => StatusCode::BAD_REQUEST,
        ApplicationError::Domain(domain) => domain_status(domain),
        ApplicationError::Transcription(transcription) => transcription_status(transcription),
        ApplicationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    HttpError::new(status, error.to_string())
}

fn domain_status(error: &DomainError) -> StatusCode {
    match error {
        DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::ExternalService { .. } => StatusCode::BAD_GATEWAY,
        DomainError::Storage(_) | DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn transcription_status(error: &TranscriptionError) -> StatusCode {
    match error {
        TranscriptionError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        TranscriptionError::Cancelled { .. } => StatusCode::SERVICE_UNAVAILABLE,
        TranscriptionError::Submission(_)
        | TranscriptionError::Poll { .. }
        | TranscriptionError::JobFailed { .. }
        | TranscriptionError::Fetch(_)
        | TranscriptionError::Parse(_) => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcription_failures_map_to_gateway_statuses() {
        let timeout = error_mapper(
            TranscriptionError::Timeout {
                job_name: "abc123".to_string(),
                checks: 30,
            }
            .into(),
        );
        assert_eq!(timeout.status(), StatusCode::GATEWAY_TIMEOUT);

        let failed = error_mapper(
            TranscriptionError::JobFailed {
                job_name: "abc123".to_string(),
                reason: None,
            }
            .into(),
        );
        assert_eq!(failed.status(), StatusCode::BAD_GATEWAY);

        let cancelled = error_mapper(TranscriptionError::Cancelled { checks: 2 }.into());
        assert_eq!(cancelled.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn domain_errors_keep_their_category() {
        let external = error_mapper(
            DomainError::external_service_error("polly", "throttled").into(),
        );
        assert_eq!(external.status(), StatusCode::BAD_GATEWAY);

        let storage = error_mapper(DomainError::storage_error("disk full").into());
        assert_eq!(storage.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let invalid = error_mapper(DomainError::invalid_input("bad").into());
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_and_not_found() {
        assert_eq!(
            error_mapper(ApplicationError::Validation("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_mapper(DomainError::not_found("card set", "abc").into()).status(),
            StatusCode::NOT_FOUND
        );
    }
}
