pub mod card_sets;
pub mod health;
pub mod media;
pub mod transcription;

pub use card_sets::*;
pub use health::*;
pub use media::*;
pub use transcription::*;
