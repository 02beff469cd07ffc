mod card_set;
mod media;
mod transcription;

pub use card_set::{CardPayload, CardSetPayload};
pub use media::{ReadTextRequest, UploadResponse};
pub use transcription::TranscribeAudioRequest;
