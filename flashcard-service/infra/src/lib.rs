use async_trait::async_trait;
use flashcard_domain::{DomainError, PayloadParserPort, ResultFetchPort, TranscriptionPayload};
use serde_json::Value;

const FETCH_SERVICE: &str = "transcript-fetch";

/// Downloads a finished transcript from the URI the job reported.
pub struct HttpResultFetcher {
    client: reqwest::Client,
}

impl HttpResultFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResultFetchPort for HttpResultFetcher {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, DomainError> {
        let response = self.client.get(uri).send().await.map_err(|err| {
            DomainError::external_service_error(FETCH_SERVICE, &format!("request failed: {err}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::external_service_error(
                FETCH_SERVICE,
                &format!("unexpected status {status}"),
            ));
        }

        let body = response.bytes().await.map_err(|err| {
            DomainError::external_service_error(
                FETCH_SERVICE,
                &format!("failed to read body: {err}"),
            )
        })?;
        tracing::debug!(byte_count = body.len(), "transcript downloaded");
        Ok(body.to_vec())
    }
}

/// Parses the transcript document into a JSON object tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPayloadParser;

impl PayloadParserPort for JsonPayloadParser {
    fn parse(&self, bytes: &[u8]) -> Result<TranscriptionPayload, DomainError> {
        // Only the serde position is reported, never the document itself.
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(fields)) => Ok(TranscriptionPayload::new(fields)),
            Ok(other) => Err(DomainError::invalid_input(&format!(
                "transcript must be a JSON object, got {}",
                json_kind(&other)
            ))),
            Err(err) => Err(DomainError::invalid_input(&format!(
                "transcript is not valid JSON (line {}, column {})",
                err.line(),
                err.column()
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
