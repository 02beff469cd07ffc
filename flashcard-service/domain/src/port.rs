use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    CardSet, DomainError, SpeechAudio, TranscriptionJobSpec, TranscriptionJobStatus,
    TranscriptionPayload,
};

#[async_trait]
pub trait TranscriptionJobPort: Send + Sync {
    async fn submit(&self, job: &TranscriptionJobSpec) -> Result<(), DomainError>;
    async fn status(&self, job_name: &str) -> Result<TranscriptionJobStatus, DomainError>;
}

#[async_trait]
pub trait ResultFetchPort: Send + Sync {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, DomainError>;
}

pub trait PayloadParserPort: Send + Sync {
    fn parse(&self, bytes: &[u8]) -> Result<TranscriptionPayload, DomainError>;
}

#[async_trait]
pub trait ObjectStoragePort: Send + Sync {
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), DomainError>;
}

#[async_trait]
pub trait SpeechSynthesisPort: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio, DomainError>;
}

#[async_trait]
pub trait ImageLabelPort: Send + Sync {
    /// Returns the vendor's label annotations as-is.
    async fn detect_labels(&self, image: &[u8], max_results: u32)
        -> Result<Vec<Value>, DomainError>;
}

#[async_trait]
pub trait CardSetRepository: Send + Sync {
    async fn insert(&self, card_set: &CardSet) -> Result<(), DomainError>;
    async fn list(&self) -> Result<Vec<CardSet>, DomainError>;
    async fn find(&self, id: Uuid) -> Result<Option<CardSet>, DomainError>;
    /// Returns `false` when no set with this id exists.
    async fn replace(&self, card_set: &CardSet) -> Result<bool, DomainError>;
    /// Returns `false` when no set with this id exists.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
