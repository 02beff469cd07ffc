mod app;

pub use app::{build_and_run, transcription_settings, Application};
