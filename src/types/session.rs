use crate::types::audio_source::AudioSource;
use crate::types::chapter::{Chapter, ChapterList};
use crate::types::progress::ProgressMap;

/// Session groups the persisted data (chapters, progress) with the
/// ephemeral selection (audio source, current chapter).
/// Only `chapters` and `progress` survive a restart.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub audio_src: Option<AudioSource>,
    pub chapters: ChapterList,
    pub current_chapter: Option<Chapter>,
    pub progress: ProgressMap,
}

impl Session {
    pub fn new(chapters: ChapterList, progress: ProgressMap) -> Self {
        Session {
            audio_src: None,
            chapters,
            current_chapter: None,
            progress,
        }
    }
}
