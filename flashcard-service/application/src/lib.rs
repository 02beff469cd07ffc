pub mod dto;
pub mod error;
pub mod usecase;

pub use dto::*;
pub use error::*;
pub use usecase::{
    generate_object_key, CardSetUseCase, CardSetUseCaseImpl, MediaUseCase, MediaUseCaseImpl,
    TranscriptionOrchestrator, TranscriptionSettings, TranscriptionUseCase,
    TranscriptionUseCaseImpl,
};
