use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_transcribe::error::DisplayErrorContext;
use aws_sdk_transcribe::types::{
    LanguageCode, Media, MediaFormat, TranscriptionJob,
    TranscriptionJobStatus as VendorJobStatus,
};
use aws_sdk_transcribe::Client;

use flashcard_domain::{
    DomainError, TranscriptionJobPort, TranscriptionJobSpec, TranscriptionJobStatus,
};

const SERVICE: &str = "transcribe";

/// Batch transcription jobs on AWS Transcribe.
pub struct AwsTranscriptionJobs {
    client: Client,
}

impl AwsTranscriptionJobs {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
}

#[async_trait]
impl TranscriptionJobPort for AwsTranscriptionJobs {
    async fn submit(&self, job: &TranscriptionJobSpec) -> Result<(), DomainError> {
        let sample_rate = i32::try_from(job.sample_rate_hertz).map_err(|_| {
            DomainError::invalid_input(&format!(
                "sample rate {} is out of range",
                job.sample_rate_hertz
            ))
        })?;

        self.client
            .start_transcription_job()
            .transcription_job_name(&job.job_name)
            .language_code(LanguageCode::from(job.language_code.as_str()))
            .media_sample_rate_hertz(sample_rate)
            .media_format(MediaFormat::from(job.media_format.as_str()))
            .media(Media::builder().media_file_uri(&job.media_uri).build())
            .send()
            .await
            .map_err(|err| {
                DomainError::external_service_error(
                    SERVICE,
                    &format!("start job failed: {}", DisplayErrorContext(&err)),
                )
            })?;

        tracing::debug!(job_name = %job.job_name, media_uri = %job.media_uri, "transcription job started");
        Ok(())
    }

    async fn status(&self, job_name: &str) -> Result<TranscriptionJobStatus, DomainError> {
        let output = self
            .client
            .get_transcription_job()
            .transcription_job_name(job_name)
            .send()
            .await
            .map_err(|err| {
                DomainError::external_service_error(
                    SERVICE,
                    &format!("get job failed: {}", DisplayErrorContext(&err)),
                )
            })?;

        let job = output.transcription_job().ok_or_else(|| {
            DomainError::external_service_error(SERVICE, "response carried no transcription job")
        })?;
        job_status(job)
    }
}

fn job_status(job: &TranscriptionJob) -> Result<TranscriptionJobStatus, DomainError> {
    match job.transcription_job_status() {
        Some(VendorJobStatus::Completed) => {
            let transcript_uri = job
                .transcript()
                .and_then(|transcript| transcript.transcript_file_uri())
                .ok_or_else(|| {
                    DomainError::external_service_error(
                        SERVICE,
                        "completed job has no transcript uri",
                    )
                })?;
            Ok(TranscriptionJobStatus::Completed {
                transcript_uri: transcript_uri.to_string(),
            })
        }
        Some(VendorJobStatus::Failed) => Ok(TranscriptionJobStatus::Failed {
            reason: job.failure_reason().map(str::to_string),
        }),
        Some(VendorJobStatus::InProgress) | Some(VendorJobStatus::Queued) => {
            Ok(TranscriptionJobStatus::InProgress)
        }
        Some(other) => Err(DomainError::external_service_error(
            SERVICE,
            &format!("unrecognized job status `{}`", other.as_str()),
        )),
        None => Err(DomainError::external_service_error(
            SERVICE,
            "job status missing from response",
        )),
    }
}
