use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_polly::error::DisplayErrorContext;
use aws_sdk_polly::types::{OutputFormat, VoiceId};
use aws_sdk_polly::Client;

use flashcard_domain::{DomainError, SpeechAudio, SpeechSynthesisPort};

const SERVICE: &str = "polly";
const MP3_CONTENT_TYPE: &str = "audio/mp3";

/// Text-to-speech through Polly, always mp3.
pub struct PollySpeechSynthesizer {
    client: Client,
    voice_id: VoiceId,
}

impl PollySpeechSynthesizer {
    pub fn new(client: Client, voice_id: &str) -> Self {
        Self {
            client,
            voice_id: VoiceId::from(voice_id),
        }
    }

    pub fn from_sdk_config(config: &SdkConfig, voice_id: &str) -> Self {
        Self::new(Client::new(config), voice_id)
    }
}

#[async_trait]
impl SpeechSynthesisPort for PollySpeechSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio, DomainError> {
        let output = self
            .client
            .synthesize_speech()
            .output_format(OutputFormat::Mp3)
            .voice_id(self.voice_id.clone())
            .text(text)
            .send()
            .await
            .map_err(|err| {
                DomainError::external_service_error(
                    SERVICE,
                    &format!("synthesize speech failed: {}", DisplayErrorContext(&err)),
                )
            })?;

        let bytes = output
            .audio_stream
            .collect()
            .await
            .map_err(|err| {
                DomainError::external_service_error(
                    SERVICE,
                    &format!("failed to read audio stream: {err}"),
                )
            })?
            .into_bytes()
            .to_vec();

        Ok(SpeechAudio {
            content_type: MP3_CONTENT_TYPE.to_string(),
            bytes,
        })
    }
}
