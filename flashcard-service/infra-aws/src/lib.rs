use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region, SdkConfig};

mod polly;
mod s3;
mod transcribe;

pub use polly::PollySpeechSynthesizer;
pub use s3::S3ObjectStorage;
pub use transcribe::AwsTranscriptionJobs;

/// Loads credentials from the default chain. The configured region wins over
/// `AWS_REGION`.
pub async fn load_aws_config(region: &str) -> SdkConfig {
    let region_provider =
        RegionProviderChain::first_try(Region::new(region.to_string())).or_default_provider();
    aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .load()
        .await
}
