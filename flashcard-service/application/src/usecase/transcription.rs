use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use flashcard_domain::{
    PayloadParserPort, ResultFetchPort, TranscriptionJobPort, TranscriptionJobSpec,
    TranscriptionJobStatus, TranscriptionPayload, TranscriptionRequest,
};

use crate::{ApplicationError, TranscribeAudioRequest, TranscriptionError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionSettings {
    /// Bucket holding the uploaded audio objects.
    pub media_bucket: String,
    pub language_code: String,
    /// Wait budget: number of status checks before giving up.
    pub max_wait_checks: u32,
    pub poll_interval: Duration,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            media_bucket: String::new(),
            language_code: "en-US".to_string(),
            max_wait_checks: 30,
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Drives one transcription job from submission to a terminal outcome.
///
/// Runs strictly in sequence: submit, a serial poll loop of at most
/// `max_wait_checks` status checks with `poll_interval` between them, then a
/// single fetch and parse of the result document. Nothing is retried. The
/// cancellation token is checked before every status check and raced against
/// every sleep.
pub struct TranscriptionOrchestrator {
    jobs: Arc<dyn TranscriptionJobPort>,
    fetcher: Arc<dyn ResultFetchPort>,
    parser: Arc<dyn PayloadParserPort>,
    settings: TranscriptionSettings,
}

impl TranscriptionOrchestrator {
    pub fn new(
        jobs: Arc<dyn TranscriptionJobPort>,
        fetcher: Arc<dyn ResultFetchPort>,
        parser: Arc<dyn PayloadParserPort>,
        settings: TranscriptionSettings,
    ) -> Self {
        Self {
            jobs,
            fetcher,
            parser,
            settings,
        }
    }

    pub fn settings(&self) -> &TranscriptionSettings {
        &self.settings
    }

    pub async fn run(
        &self,
        request: &TranscriptionRequest,
        cancel: &CancellationToken,
    ) -> Result<TranscriptionPayload, TranscriptionError> {
        let job = TranscriptionJobSpec::for_request(
            request,
            &self.settings.language_code,
            &self.settings.media_bucket,
        );
        tracing::debug!(
            job_name = %job.job_name,
            media_uri = %job.media_uri,
            media_format = %job.media_format,
            sample_rate_hertz = job.sample_rate_hertz,
            "submitting transcription job"
        );
        self.jobs
            .submit(&job)
            .await
            .map_err(TranscriptionError::Submission)?;

        for check in 1..=self.settings.max_wait_checks {
            if cancel.is_cancelled() {
                return Err(TranscriptionError::Cancelled { checks: check - 1 });
            }

            let status = self
                .jobs
                .status(&job.job_name)
                .await
                .map_err(|source| TranscriptionError::Poll { check, source })?;
            tracing::debug!(
                job_name = %job.job_name,
                check,
                status = status.label(),
                "checked transcription job"
            );

            match status {
                TranscriptionJobStatus::Completed { transcript_uri } => {
                    return self.fetch_payload(&transcript_uri).await;
                }
                TranscriptionJobStatus::Failed { reason } => {
                    return Err(TranscriptionError::JobFailed {
                        job_name: job.job_name.clone(),
                        reason,
                    });
                }
                TranscriptionJobStatus::InProgress => {}
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(TranscriptionError::Cancelled { checks: check });
                }
                _ = tokio::time::sleep(self.settings.poll_interval) => {}
            }
        }

        Err(TranscriptionError::Timeout {
            job_name: job.job_name,
            checks: self.settings.max_wait_checks,
        })
    }

    async fn fetch_payload(&self, uri: &str) -> Result<TranscriptionPayload, TranscriptionError> {
        let bytes = self
            .fetcher
            .fetch(uri)
            .await
            .map_err(TranscriptionError::Fetch)?;
        tracing::debug!(byte_count = bytes.len(), "fetched transcription result");
        self.parser.parse(&bytes).map_err(TranscriptionError::Parse)
    }
}

#[async_trait]
pub trait TranscriptionUseCase: Send + Sync {
    async fn transcribe(
        &self,
        request: TranscribeAudioRequest,
        cancel: CancellationToken,
    ) -> Result<TranscriptionPayload, ApplicationError>;
}

pub struct TranscriptionUseCaseImpl {
    orchestrator: TranscriptionOrchestrator,
}

impl TranscriptionUseCaseImpl {
    pub fn new(orchestrator: TranscriptionOrchestrator) -> Self {
        Self { orchestrator }
    }
}

#[async_trait]
impl TranscriptionUseCase for TranscriptionUseCaseImpl {
    async fn transcribe(
        &self,
        request: TranscribeAudioRequest,
        cancel: CancellationToken,
    ) -> Result<TranscriptionPayload, ApplicationError> {
        let request = request.into_domain()?;
        tracing::debug!(
            key = %request.key,
            media_format = %request.media_format,
            media_sample_rate_hertz = request.media_sample_rate_hertz,
            max_wait_checks = self.orchestrator.settings().max_wait_checks,
            "starting transcription"
        );

        let started = Instant::now();
        let outcome = self.orchestrator.run(&request, &cancel).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Ok(payload) => tracing::debug!(
                key = %request.key,
                elapsed_ms,
                field_count = payload.fields().len(),
                "transcription completed"
            ),
            Err(error) => tracing::warn!(
                key = %request.key,
                elapsed_ms,
                error = %error,
                "transcription did not complete"
            ),
        }

        outcome.map_err(ApplicationError::from)
    }
}
