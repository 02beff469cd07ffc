use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use flashcard_domain::{ImageLabelPort, ObjectStoragePort, SpeechAudio, SpeechSynthesisPort};

use crate::{ApplicationError, ReadTextRequest, UploadResponse};

const OBJECT_KEY_BYTES: usize = 16;

#[async_trait]
pub trait MediaUseCase: Send + Sync {
    async fn label_image(&self, image: Vec<u8>) -> Result<Vec<Value>, ApplicationError>;
    async fn upload(
        &self,
        bytes: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<UploadResponse, ApplicationError>;
    async fn read_aloud(&self, request: ReadTextRequest) -> Result<SpeechAudio, ApplicationError>;
}

pub struct MediaUseCaseImpl {
    labeler: Arc<dyn ImageLabelPort>,
    storage: Arc<dyn ObjectStoragePort>,
    speech: Arc<dyn SpeechSynthesisPort>,
    max_labels: u32,
}

impl MediaUseCaseImpl {
    pub fn new(
        labeler: Arc<dyn ImageLabelPort>,
        storage: Arc<dyn ObjectStoragePort>,
        speech: Arc<dyn SpeechSynthesisPort>,
        max_labels: u32,
    ) -> Self {
        Self {
            labeler,
            storage,
            speech,
            max_labels,
        }
    }
}

#[async_trait]
impl MediaUseCase for MediaUseCaseImpl {
    async fn label_image(&self, image: Vec<u8>) -> Result<Vec<Value>, ApplicationError> {
        if image.is_empty() {
            return Err(ApplicationError::Validation("image is empty".to_string()));
        }
        let labels = self.labeler.detect_labels(&image, self.max_labels).await?;
        tracing::debug!(
            image_bytes = image.len(),
            label_count = labels.len(),
            "image labeled"
        );
        Ok(labels)
    }

    async fn upload(
        &self,
        bytes: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<UploadResponse, ApplicationError> {
        let key = generate_object_key();
        let byte_count = bytes.len();
        self.storage
            .put_object(&key, bytes, content_type.as_deref())
            .await?;
        tracing::debug!(key = %key, byte_count, "object uploaded");
        Ok(UploadResponse { key })
    }

    async fn read_aloud(&self, request: ReadTextRequest) -> Result<SpeechAudio, ApplicationError> {
        if request.text.trim().is_empty() {
            return Err(ApplicationError::Validation("text cannot be empty".to_string()));
        }
        let audio = self.speech.synthesize(&request.text).await?;
        tracing::debug!(
            char_count = request.text.chars().count(),
            audio_bytes = audio.bytes.len(),
            "speech synthesized"
        );
        Ok(audio)
    }
}

/// Random lowercase hex object key, also used later as the transcription job name.
pub fn generate_object_key() -> String {
    let bytes: [u8; OBJECT_KEY_BYTES] = rand::random();
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}
