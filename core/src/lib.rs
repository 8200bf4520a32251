// Minpair Core Library
// Minimal-pairs flashcard pipeline: parse word listings, fetch remote TTS
// audio, assemble per-word clips, export pairwise notes.

pub mod export;
pub mod media;
pub mod pair;
pub mod pipeline;
pub mod tts;

// Export core types
pub use export::{pair_lines, write_notes};
pub use media::{FfmpegConfig, FfmpegTool, MediaTool};
pub use pair::{parse_components, PairComponent};
pub use pipeline::{PendingClip, Pipeline, PipelineConfig};
pub use tts::{FptTtsClient, SpeechService, TtsConfig, TtsResponse};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MinpairError {
    #[error("Invalid input record: {0}")]
    InvalidRecord(String),

    #[error("Speech API response could not be decoded: {0}")]
    MalformedResponse(String),

    #[error("Media tool error: {0}")]
    MediaTool(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}
pub type Result<T> = std::result::Result<T, MinpairError>;
