use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use flashcard_application::{
    ApplicationError, TranscribeAudioRequest, TranscriptionError, TranscriptionOrchestrator,
    TranscriptionSettings, TranscriptionUseCase, TranscriptionUseCaseImpl,
};
use flashcard_domain::{
    DomainError, MediaFormat, PayloadParserPort, ResultFetchPort, TranscriptionJobPort,
    TranscriptionJobSpec, TranscriptionJobStatus, TranscriptionPayload, TranscriptionRequest,
};
use serde_json::json;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

const RESULT_URI: &str = "https://results.example.com/abc123.json";

#[derive(Default)]
struct ScriptedJobs {
    fail_submit: bool,
    statuses: Mutex<VecDeque<Result<TranscriptionJobStatus, DomainError>>>,
    submitted: Mutex<Vec<TranscriptionJobSpec>>,
    checks: AtomicU32,
}

impl ScriptedJobs {
    fn with_statuses(statuses: Vec<Result<TranscriptionJobStatus, DomainError>>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            ..Self::default()
        }
    }

    fn checks(&self) -> u32 {
        self.checks.load(Ordering::SeqCst)
    }

    fn submissions(&self) -> usize {
        self.submitted.lock().expect("lock").len()
    }
}

#[async_trait]
impl TranscriptionJobPort for ScriptedJobs {
    async fn submit(&self, job: &TranscriptionJobSpec) -> Result<(), DomainError> {
        self.submitted.lock().expect("lock").push(job.clone());
        if self.fail_submit {
            return Err(DomainError::external_service_error(
                "transcribe",
                "ConflictException: job name already exists",
            ));
        }
        Ok(())
    }

    async fn status(&self, _job_name: &str) -> Result<TranscriptionJobStatus, DomainError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        self.statuses
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(Ok(TranscriptionJobStatus::InProgress))
    }
}

struct CountingFetcher {
    body: Result<Vec<u8>, DomainError>,
    fetches: AtomicU32,
    last_uri: Mutex<Option<String>>,
}

impl CountingFetcher {
    fn returning(body: &[u8]) -> Self {
        Self {
            body: Ok(body.to_vec()),
            fetches: AtomicU32::new(0),
            last_uri: Mutex::new(None),
        }
    }

    fn failing() -> Self {
        Self {
            body: Err(DomainError::external_service_error(
                "transcript-fetch",
                "connection refused",
            )),
            fetches: AtomicU32::new(0),
            last_uri: Mutex::new(None),
        }
    }

    fn fetches(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResultFetchPort for CountingFetcher {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, DomainError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        *self.last_uri.lock().expect("lock") = Some(uri.to_string());
        self.body.clone()
    }
}

struct JsonObjectParser;

impl PayloadParserPort for JsonObjectParser {
    fn parse(&self, bytes: &[u8]) -> Result<TranscriptionPayload, DomainError> {
        serde_json::from_slice(bytes)
            .map(TranscriptionPayload::new)
            .map_err(|err| DomainError::invalid_input(&format!("invalid transcript json: {err}")))
    }
}

fn transcript_body() -> serde_json::Value {
    json!({"results": {"transcripts": [{"transcript": "hello world"}]}})
}

fn request() -> TranscriptionRequest {
    TranscriptionRequest {
        key: "abc123".to_string(),
        media_format: MediaFormat::Mp3,
        media_sample_rate_hertz: 16_000,
    }
}

fn settings() -> TranscriptionSettings {
    TranscriptionSettings {
        media_bucket: "flashcards-media".to_string(),
        ..TranscriptionSettings::default()
    }
}

fn orchestrator(jobs: &Arc<ScriptedJobs>, fetcher: &Arc<CountingFetcher>) -> TranscriptionOrchestrator {
    TranscriptionOrchestrator::new(
        jobs.clone(),
        fetcher.clone(),
        Arc::new(JsonObjectParser),
        settings(),
    )
}

fn completed() -> Result<TranscriptionJobStatus, DomainError> {
    Ok(TranscriptionJobStatus::Completed {
        transcript_uri: RESULT_URI.to_string(),
    })
}

#[tokio::test(start_paused = true)]
async fn completed_on_third_check_returns_fetched_payload() {
    let jobs = Arc::new(ScriptedJobs::with_statuses(vec![
        Ok(TranscriptionJobStatus::InProgress),
        Ok(TranscriptionJobStatus::InProgress),
        completed(),
    ]));
    let body = serde_json::to_vec(&transcript_body()).expect("body");
    let fetcher = Arc::new(CountingFetcher::returning(&body));

    let payload = orchestrator(&jobs, &fetcher)
        .run(&request(), &CancellationToken::new())
        .await
        .expect("transcription succeeds");

    assert_eq!(payload.into_value(), transcript_body());
    assert_eq!(jobs.checks(), 3);
    assert_eq!(fetcher.fetches(), 1);
    assert_eq!(
        fetcher.last_uri.lock().expect("lock").as_deref(),
        Some(RESULT_URI)
    );

    let submitted = jobs.submitted.lock().expect("lock");
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].job_name, "abc123");
    assert_eq!(submitted[0].media_uri, "s3://flashcards-media/abc123");
    assert_eq!(submitted[0].language_code, "en-US");
    assert_eq!(submitted[0].media_format, MediaFormat::Mp3);
}

#[tokio::test(start_paused = true)]
async fn job_that_never_finishes_times_out_after_full_budget() {
    let jobs = Arc::new(ScriptedJobs::default());
    let fetcher = Arc::new(CountingFetcher::returning(b"{}"));
    let started = Instant::now();

    let error = orchestrator(&jobs, &fetcher)
        .run(&request(), &CancellationToken::new())
        .await
        .expect_err("job never completes");

    assert!(matches!(
        error,
        TranscriptionError::Timeout { ref job_name, checks: 30 } if job_name == "abc123"
    ));
    assert_eq!(jobs.checks(), 30);
    assert_eq!(fetcher.fetches(), 0);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(30) && elapsed < Duration::from_secs(31));
}

#[tokio::test(start_paused = true)]
async fn submission_failure_skips_polling_and_fetch() {
    let jobs = Arc::new(ScriptedJobs {
        fail_submit: true,
        ..ScriptedJobs::default()
    });
    let fetcher = Arc::new(CountingFetcher::returning(b"{}"));

    let error = orchestrator(&jobs, &fetcher)
        .run(&request(), &CancellationToken::new())
        .await
        .expect_err("submission fails");

    assert!(matches!(error, TranscriptionError::Submission(_)));
    assert_eq!(jobs.submissions(), 1);
    assert_eq!(jobs.checks(), 0);
    assert_eq!(fetcher.fetches(), 0);
}

#[tokio::test(start_paused = true)]
async fn status_failure_stops_at_the_failing_check() {
    let jobs = Arc::new(ScriptedJobs::with_statuses(vec![
        Ok(TranscriptionJobStatus::InProgress),
        Ok(TranscriptionJobStatus::InProgress),
        Err(DomainError::external_service_error("transcribe", "timeout")),
        completed(),
    ]));
    let fetcher = Arc::new(CountingFetcher::returning(b"{}"));

    let error = orchestrator(&jobs, &fetcher)
        .run(&request(), &CancellationToken::new())
        .await
        .expect_err("status check fails");

    assert!(matches!(error, TranscriptionError::Poll { check: 3, .. }));
    assert_eq!(jobs.checks(), 3);
    assert_eq!(fetcher.fetches(), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_job_ends_polling_immediately() {
    let jobs = Arc::new(ScriptedJobs::with_statuses(vec![
        Ok(TranscriptionJobStatus::InProgress),
        Ok(TranscriptionJobStatus::Failed {
            reason: Some("The media format doesn't match the file".to_string()),
        }),
    ]));
    let fetcher = Arc::new(CountingFetcher::returning(b"{}"));
    let started = Instant::now();

    let error = orchestrator(&jobs, &fetcher)
        .run(&request(), &CancellationToken::new())
        .await
        .expect_err("job fails");

    match error {
        TranscriptionError::JobFailed { job_name, reason } => {
            assert_eq!(job_name, "abc123");
            assert_eq!(
                reason.as_deref(),
                Some("The media format doesn't match the file")
            );
        }
        other => panic!("expected JobFailed, got {other:?}"),
    }
    assert_eq!(jobs.checks(), 2);
    assert_eq!(fetcher.fetches(), 0);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(1) && elapsed < Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn fetch_failure_is_reported() {
    let jobs = Arc::new(ScriptedJobs::with_statuses(vec![completed()]));
    let fetcher = Arc::new(CountingFetcher::failing());

    let error = orchestrator(&jobs, &fetcher)
        .run(&request(), &CancellationToken::new())
        .await
        .expect_err("fetch fails");

    assert!(matches!(error, TranscriptionError::Fetch(_)));
    assert_eq!(jobs.checks(), 1);
    assert_eq!(fetcher.fetches(), 1);
}

#[tokio::test(start_paused = true)]
async fn unparseable_result_does_not_leak_raw_payload() {
    let jobs = Arc::new(ScriptedJobs::with_statuses(vec![completed()]));
    let fetcher = Arc::new(CountingFetcher::returning(b"<Error>AccessDenied secret-token</Error>"));

    let error = orchestrator(&jobs, &fetcher)
        .run(&request(), &CancellationToken::new())
        .await
        .expect_err("parse fails");

    assert!(matches!(error, TranscriptionError::Parse(_)));
    assert!(!error.to_string().contains("secret-token"));
    assert_eq!(fetcher.fetches(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancellation_halts_polling_within_one_interval() {
    let jobs = Arc::new(ScriptedJobs::default());
    let fetcher = Arc::new(CountingFetcher::returning(b"{}"));
    let orchestrator = orchestrator(&jobs, &fetcher);
    let cancel = CancellationToken::new();

    let task_cancel = cancel.clone();
    let run = tokio::spawn(async move { orchestrator.run(&request(), &task_cancel).await });

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    cancel.cancel();
    let error = run
        .await
        .expect("task joins")
        .expect_err("cancelled run fails");

    assert!(matches!(error, TranscriptionError::Cancelled { checks: 3 }));
    assert_eq!(jobs.checks(), 3);
    assert_eq!(fetcher.fetches(), 0);
}

#[tokio::test(start_paused = true)]
async fn already_cancelled_token_issues_no_status_checks() {
    let jobs = Arc::new(ScriptedJobs::default());
    let fetcher = Arc::new(CountingFetcher::returning(b"{}"));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let error = orchestrator(&jobs, &fetcher)
        .run(&request(), &cancel)
        .await
        .expect_err("cancelled before polling");

    assert!(matches!(error, TranscriptionError::Cancelled { checks: 0 }));
    assert_eq!(jobs.checks(), 0);
}

#[tokio::test(start_paused = true)]
async fn usecase_rejects_invalid_request_before_submitting() {
    let jobs = Arc::new(ScriptedJobs::default());
    let fetcher = Arc::new(CountingFetcher::returning(b"{}"));
    let usecase: Arc<dyn TranscriptionUseCase> =
        Arc::new(TranscriptionUseCaseImpl::new(orchestrator(&jobs, &fetcher)));

    let error = usecase
        .transcribe(
            TranscribeAudioRequest {
                key: "abc123".to_string(),
                media_format: "aiff".to_string(),
                media_sample_rate_hertz: 16_000,
            },
            CancellationToken::new(),
        )
        .await
        .expect_err("invalid media format");

    assert!(matches!(error, ApplicationError::Validation(_)));
    assert_eq!(jobs.submissions(), 0);
}

#[tokio::test(start_paused = true)]
async fn usecase_wraps_orchestrator_outcome() {
    let jobs = Arc::new(ScriptedJobs::with_statuses(vec![completed()]));
    let body = serde_json::to_vec(&transcript_body()).expect("body");
    let fetcher = Arc::new(CountingFetcher::returning(&body));
    let usecase = TranscriptionUseCaseImpl::new(orchestrator(&jobs, &fetcher));

    let payload = usecase
        .transcribe(
            TranscribeAudioRequest {
                key: "abc123".to_string(),
                media_format: "mp3".to_string(),
                media_sample_rate_hertz: 16_000,
            },
            CancellationToken::new(),
        )
        .await
        .expect("transcription succeeds");

    assert_eq!(
        payload.fields()["results"]["transcripts"][0]["transcript"],
        "hello world"
    );
}
