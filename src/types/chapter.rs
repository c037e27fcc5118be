use serde::{Deserialize, Serialize};

/// Stable chapter identifier. Persisted as a JSON number.
pub type ChapterId = u64;

/// A named time range within the loaded audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: ChapterId,
    pub title: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds, strictly greater than `start`.
    pub end: f64,
}

impl Chapter {
    pub fn new(id: ChapterId, title: impl Into<String>, start: f64, end: f64) -> Self {
        Chapter {
            id,
            title: title.into(),
            start,
            end,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Title shown in listings, falling back to the 1-based position.
    pub fn display_title(&self, index: usize) -> String {
        if self.title.trim().is_empty() {
            format!("Chapter {}", index + 1)
        } else {
            self.title.clone()
        }
    }
}

/// Ordered chapter list; insertion order is display and playback order.
pub type ChapterList = Vec<Chapter>;
