use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChapterError, ChapterResult};

/// The audio resource currently loaded into a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSource {
    pub file_name: String,
    /// Location handed to the transport and waveform `load` calls.
    pub url: String,
    pub size: u64,
    pub mime_type: String,
}

impl AudioSource {
    pub fn new(file_name: String, url: String, size: u64, mime_type: String) -> Self {
        AudioSource {
            file_name,
            url,
            size,
            mime_type,
        }
    }

    /// Builds a source from a local file, inferring the media type from the extension.
    pub fn from_path(path: &Path) -> ChapterResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        let mime_type = mime_for_extension(&ext)
            .ok_or_else(|| ChapterError::UnsupportedAudio(path.to_path_buf()))?;
        let file_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Ok(AudioSource::new(
            file_name,
            path.to_string_lossy().to_string(),
            size,
            mime_type.to_string(),
        ))
    }
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "mp3" => Some("audio/mpeg"),
        "wav" => Some("audio/wav"),
        "m4a" => Some("audio/mp4"),
        "ogg" | "opus" => Some("audio/ogg"),
        "flac" => Some("audio/flac"),
        "aac" => Some("audio/aac"),
        _ => None,
    }
}
