use flashcard_domain::DomainError;
use thiserror::Error;

/// Terminal failures of a single transcription run. None of them is retried.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("failed to start transcription job: {0}")]
    Submission(#[source] DomainError),

    #[error("status check {check} failed: {source}")]
    Poll {
        check: u32,
        #[source]
        source: DomainError,
    },

    #[error(
        "transcription job `{job_name}` failed: {}",
        .reason.as_deref().unwrap_or("no failure reason reported")
    )]
    JobFailed {
        job_name: String,
        reason: Option<String>,
    },

    #[error("failed to fetch transcription result: {0}")]
    Fetch(#[source] DomainError),

    #[error("failed to parse transcription result: {0}")]
    Parse(#[source] DomainError),

    #[error("transcription job `{job_name}` still running after {checks} status checks")]
    Timeout { job_name: String, checks: u32 },

    #[error("transcription cancelled by caller after {checks} status checks")]
    Cancelled { checks: u32 },
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
