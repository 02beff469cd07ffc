use std::path::PathBuf;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

mod logging;

pub use logging::setup_logging;

pub type AppConfig = FlashcardConfig;

/// Points at an explicit TOML file, bypassing `config/<RUN_ENV>.toml`.
pub const CONFIG_PATH_ENV: &str = "FLASHCARD_SERVICE_CONFIG";
pub const ENV_PREFIX: &str = "FLASHCARD_SERVICE_";

#[derive(Debug, thiserror::Error)]
#[error("failed to load configuration: {0}")]
pub struct ConfigError(#[from] Box<figment::Error>);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlashcardConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub aws: AwsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub vision: VisionConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    #[serde(default = "default_aws_region")]
    pub region: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket holding uploaded media. Transcription jobs read from it too.
    #[serde(default)]
    pub bucket: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    #[serde(default = "default_language_code")]
    pub language_code: String,
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl TranscriptionConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Number of status checks that fit in the wait budget, at least one.
    pub fn max_wait_checks(&self) -> u32 {
        let interval_ms = self.poll_interval_ms.max(1);
        let budget_ms = self.max_wait_secs.saturating_mul(1000);
        let checks = budget_ms.div_ceil(interval_ms).max(1);
        u32::try_from(checks).unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_voice_id")]
    pub voice_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    #[serde(default = "default_vision_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_vision_max_results")]
    pub max_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_aws_region(),
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            language_code: default_language_code(),
            max_wait_secs: default_max_wait_secs(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            voice_id: default_voice_id(),
        }
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_vision_endpoint(),
            api_key: String::new(),
            max_results: default_vision_max_results(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

pub fn load_config() -> Result<FlashcardConfig, ConfigError> {
    config_figment(config_file_path())
        .extract()
        .map_err(|err| ConfigError(Box::new(err)))
}

/// Defaults, then the TOML file (skipped when missing), then prefixed
/// environment variables, then the legacy unprefixed variables.
pub fn config_figment(path: PathBuf) -> Figment {
    Figment::from(Serialized::defaults(FlashcardConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(
            Env::raw()
                .only(&["BUCKET_NAME"])
                .map(|_| "service.storage.bucket".into()),
        )
        .merge(
            Env::raw()
                .only(&["DATABASE_PATH"])
                .map(|_| "service.store.database_path".into()),
        )
}

fn config_file_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    let run_env = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string());
    PathBuf::from("config").join(format!("{run_env}.toml"))
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_body_limit_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_aws_region() -> String {
    "ap-southeast-1".to_string()
}

fn default_language_code() -> String {
    "en-US".to_string()
}

fn default_max_wait_secs() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_voice_id() -> String {
    "Joanna".to_string()
}

fn default_vision_endpoint() -> String {
    "https://vision.googleapis.com/v1/images:annotate".to_string()
}

fn default_vision_max_results() -> u32 {
    10
}

fn default_database_path() -> String {
    "data/flashcards.db".to_string()
}
