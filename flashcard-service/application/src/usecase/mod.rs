mod card_set;
mod media;
mod transcription;

pub use card_set::{CardSetUseCase, CardSetUseCaseImpl};
pub use media::{generate_object_key, MediaUseCase, MediaUseCaseImpl};
pub use transcription::{
    TranscriptionOrchestrator, TranscriptionSettings, TranscriptionUseCase,
    TranscriptionUseCaseImpl,
};
