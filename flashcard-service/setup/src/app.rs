use std::{path::Path, sync::Arc, time::Duration};

use anyhow::{anyhow, bail, Context, Error};
use flashcard_application::{
    CardSetUseCase, CardSetUseCaseImpl, MediaUseCase, MediaUseCaseImpl,
    TranscriptionOrchestrator, TranscriptionSettings, TranscriptionUseCase,
    TranscriptionUseCaseImpl,
};
use flashcard_configuration::{AppConfig, ServerConfig};
use flashcard_domain::{
    CardSetRepository, ImageLabelPort, ObjectStoragePort, PayloadParserPort, ResultFetchPort,
    SpeechSynthesisPort, TranscriptionJobPort,
};
use flashcard_http_server::{create_app_routes, AppState};
use flashcard_infra::{HttpResultFetcher, JsonPayloadParser};
use flashcard_infra_aws::{
    load_aws_config, AwsTranscriptionJobs, PollySpeechSynthesizer, S3ObjectStorage,
};
use flashcard_infra_store::{Database, SqliteCardSetRepository};
use flashcard_infra_vision::GoogleVisionLabeler;

const OUTBOUND_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub async fn build_and_run(config: AppConfig, server_config: ServerConfig) -> Result<(), Error> {
    let app = Application::new(config).await?;
    app.run(server_config).await
}

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

impl Application {
    /// Vendor clients are built once here and shared by every request.
    pub async fn new(config: AppConfig) -> Result<Self, Error> {
        let service = &config.service;
        if service.storage.bucket.trim().is_empty() {
            bail!("service.storage.bucket (or BUCKET_NAME) must be set");
        }
        if service.vision.api_key.is_empty() {
            tracing::warn!("service.vision.api_key is empty; label requests will be rejected upstream");
        }

        let aws = load_aws_config(&service.aws.region).await;
        let http_client = reqwest::Client::builder()
            .timeout(OUTBOUND_HTTP_TIMEOUT)
            .build()
            .context("failed to build outbound http client")?;

        let jobs: Arc<dyn TranscriptionJobPort> =
            Arc::new(AwsTranscriptionJobs::from_sdk_config(&aws));
        let storage: Arc<dyn ObjectStoragePort> = Arc::new(S3ObjectStorage::from_sdk_config(
            &aws,
            service.storage.bucket.clone(),
        ));
        let speech: Arc<dyn SpeechSynthesisPort> = Arc::new(
            PollySpeechSynthesizer::from_sdk_config(&aws, &service.speech.voice_id),
        );
        let labeler: Arc<dyn ImageLabelPort> = Arc::new(GoogleVisionLabeler::new(
            http_client.clone(),
            service.vision.endpoint.clone(),
            service.vision.api_key.clone(),
        ));
        let fetcher: Arc<dyn ResultFetchPort> = Arc::new(HttpResultFetcher::new(http_client));
        let parser: Arc<dyn PayloadParserPort> = Arc::new(JsonPayloadParser);

        let database = Database::open(Path::new(&service.store.database_path))
            .map_err(|err| anyhow!("failed to open card set store: {err}"))?;
        let repository: Arc<dyn CardSetRepository> =
            Arc::new(SqliteCardSetRepository::new(database));

        let settings = transcription_settings(&config);
        tracing::info!(
            bucket = %settings.media_bucket,
            language_code = %settings.language_code,
            max_wait_checks = settings.max_wait_checks,
            poll_interval_ms = settings.poll_interval.as_millis() as u64,
            "transcription configured"
        );
        let orchestrator = TranscriptionOrchestrator::new(jobs, fetcher, parser, settings);

        let card_sets: Arc<dyn CardSetUseCase> = Arc::new(CardSetUseCaseImpl::new(repository));
        let media: Arc<dyn MediaUseCase> = Arc::new(MediaUseCaseImpl::new(
            labeler,
            storage,
            speech,
            service.vision.max_results,
        ));
        let transcription: Arc<dyn TranscriptionUseCase> =
            Arc::new(TranscriptionUseCaseImpl::new(orchestrator));
        let state = AppState::new(card_sets, media, transcription);

        Ok(Self { config, state })
    }

    pub async fn run(self, server_config: ServerConfig) -> Result<(), Error> {
        create_app_routes(self.state, server_config)
            .await
            .map_err(|err| anyhow!("flashcard http server failed: {err}"))
    }
}

pub fn transcription_settings(config: &AppConfig) -> TranscriptionSettings {
    let transcription = &config.service.transcription;
    TranscriptionSettings {
        media_bucket: config.service.storage.bucket.clone(),
        language_code: transcription.language_code.clone(),
        max_wait_checks: transcription.max_wait_checks(),
        poll_interval: transcription.poll_interval(),
    }
}
