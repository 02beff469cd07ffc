use std::sync::Arc;

use flashcard_application::{CardSetUseCase, MediaUseCase, TranscriptionUseCase};

#[derive(Clone)]
pub struct AppState {
    pub card_sets: Arc<dyn CardSetUseCase>,
    pub media: Arc<dyn MediaUseCase>,
    pub transcription: Arc<dyn TranscriptionUseCase>,
}

impl AppState {
    pub fn new(
        card_sets: Arc<dyn CardSetUseCase>,
        media: Arc<dyn MediaUseCase>,
        transcription: Arc<dyn TranscriptionUseCase>,
    ) -> Self {
        Self {
            card_sets,
            media,
            transcription,
        }
    }
}
