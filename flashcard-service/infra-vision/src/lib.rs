use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};

use flashcard_domain::{DomainError, ImageLabelPort};

const SERVICE: &str = "vision";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Label detection through the Cloud Vision `images:annotate` REST endpoint.
pub struct GoogleVisionLabeler {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    label_annotations: Vec<Value>,
    error: Option<AnnotateError>,
}

#[derive(Debug, Deserialize)]
struct AnnotateError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

impl GoogleVisionLabeler {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ImageLabelPort for GoogleVisionLabeler {
    async fn detect_labels(
        &self,
        image: &[u8],
        max_results: u32,
    ) -> Result<Vec<Value>, DomainError> {
        let body = json!({
            "requests": [{
                "image": { "content": STANDARD.encode(image) },
                "features": [{ "type": "LABEL_DETECTION", "maxResults": max_results }],
            }]
        });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if !self.api_key.is_empty() {
            request = request.header(API_KEY_HEADER, &self.api_key);
        }

        let response = request.send().await.map_err(|err| {
            DomainError::external_service_error(SERVICE, &format!("request failed: {err}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DomainError::external_service_error(
                SERVICE,
                &format!("HTTP {status}: {text}"),
            ));
        }

        let parsed: AnnotateResponse = response.json().await.map_err(|err| {
            DomainError::external_service_error(SERVICE, &format!("invalid response: {err}"))
        })?;

        let first = parsed.responses.into_iter().next().ok_or_else(|| {
            DomainError::external_service_error(SERVICE, "response contained no results")
        })?;
        if let Some(error) = first.error {
            return Err(DomainError::external_service_error(
                SERVICE,
                &format!("annotate error {}: {}", error.code, error.message),
            ));
        }

        tracing::debug!(label_count = first.label_annotations.len(), "labels detected");
        Ok(first.label_annotations)
    }
}
