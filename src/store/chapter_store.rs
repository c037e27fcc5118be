//! Process-wide session state and its persistence.
//!
//! The store is the single owner of the [`Session`]. Every mutation of the
//! chapter list or the progress map is written through to [`Storage`], and
//! every mutation is announced as a [`StoreEvent`] so the playback side can
//! react (see [`ChapterStore::take_events`]).

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::store::storage::{Storage, StorageResult};
use crate::types::audio_source::AudioSource;
use crate::types::chapter::{Chapter, ChapterId, ChapterList};
use crate::types::progress::ProgressMap;
use crate::types::session::Session;

pub const CHAPTERS_KEY: &str = "chapters";
pub const PROGRESS_KEY: &str = "progress";

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    AudioSourceChanged,
    ChaptersChanged,
    CurrentChapterChanged,
    ProgressRecorded { chapter_id: ChapterId, time: f64 },
}

pub struct ChapterStore<S: Storage> {
    storage: S,
    session: Session,
    events: Vec<StoreEvent>,
}

impl<S: Storage> ChapterStore<S> {
    /// Opens the store, restoring chapters and progress from `storage`.
    ///
    /// Missing or unreadable records start out empty.
    pub fn open(storage: S) -> Self {
        let chapters: ChapterList = load_or_default(&storage, CHAPTERS_KEY);
        let progress: ProgressMap = load_or_default(&storage, PROGRESS_KEY);
        debug!(
            chapters = chapters.len(),
            progress = progress.len(),
            "Restored chapter store"
        );

        Self {
            storage,
            session: Session::new(chapters, progress),
            events: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn audio_src(&self) -> Option<&AudioSource> {
        self.session.audio_src.as_ref()
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.session.chapters
    }

    pub fn chapter(&self, id: ChapterId) -> Option<&Chapter> {
        self.session.chapters.iter().find(|c| c.id == id)
    }

    pub fn current_chapter(&self) -> Option<&Chapter> {
        self.session.current_chapter.as_ref()
    }

    pub fn progress(&self) -> &ProgressMap {
        &self.session.progress
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Replaces the audio resource. Chapters and the active chapter belong to
    /// the previous audio and are cleared in the same step.
    pub fn set_audio_src(&mut self, src: Option<AudioSource>) {
        debug!(src = ?src.as_ref().map(|s| &s.file_name), "Audio source changed");
        self.session.audio_src = src;
        self.session.chapters.clear();
        self.session.current_chapter = None;
        self.events.push(StoreEvent::AudioSourceChanged);
        self.events.push(StoreEvent::ChaptersChanged);
        self.events.push(StoreEvent::CurrentChapterChanged);
        self.persist_chapters();
    }

    /// Replaces the chapter list wholesale. Entries are not validated here.
    pub fn set_chapters(&mut self, chapters: ChapterList) {
        self.session.chapters = chapters;
        self.events.push(StoreEvent::ChaptersChanged);
        self.persist_chapters();
    }

    /// Selects the active chapter. Selection drives playback through
    /// [`StoreEvent::CurrentChapterChanged`].
    pub fn set_current_chapter(&mut self, chapter: Option<Chapter>) {
        self.session.current_chapter = chapter;
        self.events.push(StoreEvent::CurrentChapterChanged);
    }

    pub fn record_progress(&mut self, chapter_id: ChapterId, time: f64) {
        if !self.session.progress.record(chapter_id, time) {
            return;
        }
        self.events
            .push(StoreEvent::ProgressRecorded { chapter_id, time });
        self.persist_progress();
    }

    /// Drains the events produced since the last call.
    pub fn take_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.events)
    }

    fn persist_chapters(&mut self) {
        if let Err(e) = write_document(&mut self.storage, CHAPTERS_KEY, &self.session.chapters) {
            error!(error = %e, "Failed to persist chapters");
        }
    }

    fn persist_progress(&mut self) {
        if let Err(e) = write_document(&mut self.storage, PROGRESS_KEY, &self.session.progress) {
            error!(error = %e, "Failed to persist progress");
        }
    }
}

fn write_document<S: Storage, T: Serialize>(
    storage: &mut S,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let json = serde_json::to_string(value)?;
    storage.set(key, &json)
}

fn load_or_default<S: Storage, T: DeserializeOwned + Default>(storage: &S, key: &str) -> T {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            warn!(key, error = %e, "Could not read persisted state, starting empty");
            return T::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Corrupt persisted state, resetting to default");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::storage::MemoryStorage;

    fn intro() -> Chapter {
        Chapter::new(1, "Intro", 0.0, 30.0)
    }

    fn audio(name: &str) -> AudioSource {
        AudioSource::new(
            name.to_string(),
            format!("/audio/{name}"),
            0,
            "audio/mpeg".to_string(),
        )
    }

    #[test]
    fn test_open_restores_persisted_documents() {
        let storage = MemoryStorage::new()
            .with_value(CHAPTERS_KEY, r#"[{"id":5,"title":"Intro","start":0,"end":30}]"#)
            .with_value(PROGRESS_KEY, r#"{"5":30}"#);
        let store = ChapterStore::open(storage);

        assert_eq!(store.chapters(), &[Chapter::new(5, "Intro", 0.0, 30.0)]);
        assert_eq!(store.progress().get(5), Some(30.0));
        assert!(store.audio_src().is_none());
        assert!(store.current_chapter().is_none());
    }

    #[test]
    fn test_open_resets_corrupt_documents() {
        let storage = MemoryStorage::new()
            .with_value(CHAPTERS_KEY, "{not valid")
            .with_value(PROGRESS_KEY, "[1,2,3]");
        let store = ChapterStore::open(storage);

        assert!(store.chapters().is_empty());
        assert!(store.progress().is_empty());
    }

    #[test]
    fn test_set_chapters_persists() {
        let mut store = ChapterStore::open(MemoryStorage::new());
        store.set_chapters(vec![intro()]);

        let raw = store.storage().get(CHAPTERS_KEY).unwrap().unwrap();
        let persisted: ChapterList = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, vec![intro()]);
        assert_eq!(store.take_events(), vec![StoreEvent::ChaptersChanged]);
    }

    #[test]
    fn test_set_audio_src_clears_chapters_and_selection() {
        let mut store = ChapterStore::open(MemoryStorage::new());
        store.set_audio_src(Some(audio("a.mp3")));
        store.set_chapters(vec![intro()]);
        store.set_current_chapter(Some(intro()));
        store.take_events();

        store.set_audio_src(Some(audio("b.mp3")));

        assert_eq!(store.audio_src().map(|s| s.file_name.as_str()), Some("b.mp3"));
        assert!(store.chapters().is_empty());
        assert!(store.current_chapter().is_none());
        assert_eq!(store.storage().get(CHAPTERS_KEY).unwrap().as_deref(), Some("[]"));
        let events = store.take_events();
        assert!(events.contains(&StoreEvent::AudioSourceChanged));
        assert!(events.contains(&StoreEvent::CurrentChapterChanged));
    }

    #[test]
    fn test_record_progress_preserves_other_entries() {
        let mut store = ChapterStore::open(MemoryStorage::new());
        store.record_progress(1, 30.0);
        store.record_progress(2, 10.0);

        assert_eq!(store.progress().get(1), Some(30.0));
        assert_eq!(store.progress().get(2), Some(10.0));
        let raw = store.storage().get(PROGRESS_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"{"1":30.0,"2":10.0}"#);
    }

    #[test]
    fn test_record_progress_is_idempotent() {
        let mut store = ChapterStore::open(MemoryStorage::new());
        store.record_progress(1, 30.0);
        let first = store.progress().clone();
        store.take_events();

        store.record_progress(1, 30.0);

        assert_eq!(store.progress(), &first);
        assert!(store.take_events().is_empty());
    }

    #[test]
    fn test_current_chapter_is_not_persisted() {
        let mut store = ChapterStore::open(MemoryStorage::new());
        store.set_chapters(vec![intro()]);
        store.set_current_chapter(Some(intro()));

        let reopened = ChapterStore::open(store.storage().clone());
        assert_eq!(reopened.chapters(), &[intro()]);
        assert!(reopened.current_chapter().is_none());
    }
}
