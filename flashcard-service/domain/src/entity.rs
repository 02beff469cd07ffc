use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::DomainError;

/// Audio container formats accepted by the batch transcription service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    Amr,
    Flac,
    M4a,
    Mp3,
    Mp4,
    Ogg,
    Webm,
    Wav,
}

impl MediaFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFormat::Amr => "amr",
            MediaFormat::Flac => "flac",
            MediaFormat::M4a => "m4a",
            MediaFormat::Mp3 => "mp3",
            MediaFormat::Mp4 => "mp4",
            MediaFormat::Ogg => "ogg",
            MediaFormat::Webm => "webm",
            MediaFormat::Wav => "wav",
        }
    }
}

impl FromStr for MediaFormat {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parsed = match value.trim().to_ascii_lowercase().as_str() {
            "amr" => MediaFormat::Amr,
            "flac" => MediaFormat::Flac,
            "m4a" => MediaFormat::M4a,
            "mp3" => MediaFormat::Mp3,
            "mp4" => MediaFormat::Mp4,
            "ogg" => MediaFormat::Ogg,
            "webm" => MediaFormat::Webm,
            "wav" => MediaFormat::Wav,
            other => {
                return Err(DomainError::invalid_input(&format!(
                    "unsupported media format `{other}`"
                )));
            }
        };
        Ok(parsed)
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request to transcribe an audio object already in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionRequest {
    pub key: String,
    pub media_format: MediaFormat,
    pub media_sample_rate_hertz: u32,
}

/// Everything the transcription service needs to start a job.
///
/// The object key doubles as the job name, so one key maps to at most one
/// in-flight job on the vendor side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionJobSpec {
    pub job_name: String,
    pub language_code: String,
    pub sample_rate_hertz: u32,
    pub media_format: MediaFormat,
    pub media_uri: String,
}

impl TranscriptionJobSpec {
    pub fn for_request(request: &TranscriptionRequest, language_code: &str, bucket: &str) -> Self {
        Self {
            job_name: request.key.clone(),
            language_code: language_code.to_string(),
            sample_rate_hertz: request.media_sample_rate_hertz,
            media_format: request.media_format,
            media_uri: media_uri(bucket, &request.key),
        }
    }
}

pub fn media_uri(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{key}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionJobStatus {
    InProgress,
    Completed { transcript_uri: String },
    Failed { reason: Option<String> },
}

impl TranscriptionJobStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TranscriptionJobStatus::InProgress => "IN_PROGRESS",
            TranscriptionJobStatus::Completed { .. } => "COMPLETED",
            TranscriptionJobStatus::Failed { .. } => "FAILED",
        }
    }
}

/// Transcript document produced by the transcription service, passed through
/// to the caller untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranscriptionPayload(Map<String, Value>);

impl TranscriptionPayload {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub word: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSet {
    pub id: Uuid,
    pub name: String,
    pub cover_image: String,
    pub cards: Vec<Card>,
}

impl CardSet {
    /// Builds a set under `id`, giving every card a fresh identifier.
    pub fn with_fresh_card_ids(
        id: Uuid,
        name: String,
        cover_image: String,
        cards: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            id,
            name,
            cover_image,
            cards: cards
                .into_iter()
                .map(|(word, image)| Card {
                    id: Uuid::new_v4(),
                    word,
                    image,
                })
                .collect(),
        }
    }
}

/// Encoded speech returned by the synthesis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechAudio {
    pub content_type: String,
    pub bytes: Vec<u8>,
}
