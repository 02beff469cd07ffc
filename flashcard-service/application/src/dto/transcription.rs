use serde::Deserialize;
use validator::Validate;

use flashcard_domain::{MediaFormat, TranscriptionRequest};

use crate::ApplicationError;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeAudioRequest {
    #[validate(length(min = 1, max = 200))]
    pub key: String,
    #[validate(length(min = 1, max = 8))]
    pub media_format: String,
    #[validate(range(min = 8_000, max = 48_000))]
    pub media_sample_rate_hertz: u32,
}

impl TranscribeAudioRequest {
    pub fn into_domain(self) -> Result<TranscriptionRequest, ApplicationError> {
        let key = self.key.trim();
        if key.is_empty() {
            return Err(ApplicationError::Validation("key cannot be empty".to_string()));
        }
        // The key is reused verbatim as the vendor job name.
        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(ApplicationError::Validation(format!(
                "key `{key}` may only contain letters, digits, '.', '_' and '-'"
            )));
        }
        let media_format = self
            .media_format
            .parse::<MediaFormat>()
            .map_err(|err| ApplicationError::Validation(err.to_string()))?;
        if self.media_sample_rate_hertz == 0 {
            return Err(ApplicationError::Validation(
                "mediaSampleRateHertz must be positive".to_string(),
            ));
        }

        Ok(TranscriptionRequest {
            key: key.to_string(),
            media_format,
            media_sample_rate_hertz: self.media_sample_rate_hertz,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(key: &str, media_format: &str) -> TranscribeAudioRequest {
        TranscribeAudioRequest {
            key: key.to_string(),
            media_format: media_format.to_string(),
            media_sample_rate_hertz: 16_000,
        }
    }

    #[test]
    fn deserializes_camel_case_body() {
        let parsed: TranscribeAudioRequest = serde_json::from_str(
            r#"{"key":"abc123","mediaFormat":"mp3","mediaSampleRateHertz":16000}"#,
        )
        .expect("body parses");

        assert_eq!(parsed.key, "abc123");
        assert_eq!(parsed.media_format, "mp3");
        assert_eq!(parsed.media_sample_rate_hertz, 16_000);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_sample_rate() {
        let mut body = request("abc123", "mp3");
        body.media_sample_rate_hertz = 0;
        assert!(body.validate().is_err());
    }

    #[test]
    fn converts_into_domain_request() {
        let converted = request("abc123", "MP3").into_domain().expect("valid request");
        assert_eq!(converted.key, "abc123");
        assert_eq!(converted.media_format, MediaFormat::Mp3);
    }

    #[test]
    fn rejects_unknown_media_format() {
        let error = request("abc123", "aiff").into_domain().expect_err("invalid format");
        assert!(matches!(error, ApplicationError::Validation(_)));
    }

    #[test]
    fn rejects_key_unusable_as_job_name() {
        let error = request("../etc/passwd", "mp3")
            .into_domain()
            .expect_err("invalid key");
        assert!(error.to_string().contains("may only contain"));
    }
}
