use std::path::PathBuf;

use crate::types::chapter::ChapterId;

/// Errors raised by chapter editing, import/export and playback commands.
#[derive(Debug, thiserror::Error)]
pub enum ChapterError {
    /// Start/end violate `0 <= start < end`.
    #[error("End time must be greater than start time (start {start}, end {end})")]
    InvalidChapterRange { start: f64, end: f64 },

    #[error("Chapter title must not be empty")]
    MissingTitle,

    /// Import document is not valid JSON or not a list of chapters.
    #[error("Malformed chapter import: {0}")]
    MalformedImport(String),

    /// Playback command issued while no audio resource is bound.
    #[error("No audio loaded")]
    NoAudioLoaded,

    #[error("No chapter ids left to assign")]
    IdsExhausted,

    #[error("No chapter with id {0}")]
    UnknownChapter(ChapterId),

    #[error("Not a supported audio file: {0}")]
    UnsupportedAudio(PathBuf),

    #[error("Failed to serialize chapters: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ChapterResult<T> = Result<T, ChapterError>;
