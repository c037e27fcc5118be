//! Wires the chapter store, the editor and the playback controller together.
//!
//! All entry points run to completion on the caller's event loop. After each
//! one, pending [`StoreEvent`]s are forwarded to the controller, so selection
//! and audio changes take effect before the next event is handled.

use tracing::debug;

use crate::config::Settings;
use crate::error::{ChapterError, ChapterResult};
use crate::ops::chapter_ops::ChapterEditor;
use crate::player::{MediaBackend, MediaNotification, PlaybackController};
use crate::store::{ChapterStore, Storage, StoreEvent};
use crate::types::audio_source::AudioSource;
use crate::types::chapter::{Chapter, ChapterId};

pub struct ChapterApp<S: Storage, B: MediaBackend> {
    store: ChapterStore<S>,
    editor: ChapterEditor,
    player: PlaybackController<B>,
}

impl<S: Storage, B: MediaBackend> ChapterApp<S, B> {
    pub fn new(storage: S, backend: B, volume: u8) -> Self {
        Self {
            store: ChapterStore::open(storage),
            editor: ChapterEditor::new(),
            player: PlaybackController::new(backend, volume),
        }
    }

    /// Like [`ChapterApp::new`], starting at the configured default volume.
    pub fn from_settings(storage: S, backend: B, settings: &Settings) -> Self {
        Self::new(storage, backend, settings.playback.default_volume)
    }

    pub fn store(&self) -> &ChapterStore<S> {
        &self.store
    }

    pub fn player(&self) -> &PlaybackController<B> {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlaybackController<B> {
        &mut self.player
    }

    /// Loads a new audio file; its chapters start empty.
    pub fn load_audio(&mut self, src: AudioSource) -> ChapterResult<()> {
        self.store.set_audio_src(Some(src));
        self.dispatch()
    }

    pub fn add_chapter(&mut self, title: &str, start: f64, end: f64) -> ChapterResult<Chapter> {
        let chapter = self.editor.add_chapter(&mut self.store, title, start, end)?;
        self.dispatch()?;
        Ok(chapter)
    }

    pub fn export_json(&self) -> ChapterResult<String> {
        self.editor.export_json(&self.store)
    }

    pub fn import_json(&mut self, document: &str) -> ChapterResult<usize> {
        let count = self.editor.import_json(&mut self.store, document)?;
        self.dispatch()?;
        Ok(count)
    }

    /// Makes `id` the active chapter, which seeks to its start and plays it.
    /// Selecting the chapter that is already active replays it from its start.
    pub fn select_chapter(&mut self, id: ChapterId) -> ChapterResult<()> {
        let chapter = self
            .store
            .chapter(id)
            .cloned()
            .ok_or(ChapterError::UnknownChapter(id))?;
        self.store.set_current_chapter(Some(chapter));
        self.dispatch()
    }

    pub fn toggle_play_pause(&mut self) -> ChapterResult<()> {
        self.player.toggle_play_pause()
    }

    pub fn set_volume(&mut self, volume: i32) -> u8 {
        self.player.set_volume(volume)
    }

    pub fn handle_media(&mut self, notification: MediaNotification) -> ChapterResult<()> {
        self.player.handle_notification(&mut self.store, notification);
        self.dispatch()
    }

    pub fn progress_percentage(&self) -> f64 {
        self.player.progress_percentage(self.store.current_chapter())
    }

    pub fn time_readout(&self) -> String {
        self.player.time_readout(self.store.current_chapter())
    }

    /// Forwards store events to the controller. Every event is handled even
    /// if an earlier one failed; the first error is returned.
    fn dispatch(&mut self) -> ChapterResult<()> {
        let mut result = Ok(());
        for event in self.store.take_events() {
            let outcome = match event {
                StoreEvent::AudioSourceChanged => {
                    match self.store.audio_src().cloned() {
                        Some(src) => {
                            self.player.load_source(&src);
                        }
                        None => self.player.unload(),
                    }
                    Ok(())
                }
                StoreEvent::CurrentChapterChanged => self.player.on_chapter_selected(&self.store),
                StoreEvent::ChaptersChanged | StoreEvent::ProgressRecorded { .. } => {
                    debug!(?event, "Store updated");
                    Ok(())
                }
            };
            if let Err(e) = outcome {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_tracing;
    use crate::player::{AudioTransport, BindingId, TransportEvent, WaveformView};
    use crate::store::MemoryStorage;
    use crate::types::playback_state::PlaybackStatus;

    struct SilentTransport;

    impl AudioTransport for SilentTransport {
        fn load(&mut self, _url: &str) {}
        fn play(&mut self) {}
        fn pause(&mut self) {}
        fn current_time(&self) -> f64 {
            0.0
        }
        fn set_current_time(&mut self, _seconds: f64) {}
        fn duration(&self) -> f64 {
            0.0
        }
        fn volume(&self) -> f64 {
            1.0
        }
        fn set_volume(&mut self, _gain: f64) {}
    }

    struct SilentWaveform;

    impl WaveformView for SilentWaveform {
        fn load(&mut self, _url: &str) {}
        fn play(&mut self) {}
        fn pause(&mut self) {}
        fn seek_to(&mut self, _fraction: f64) {}
        fn duration(&self) -> f64 {
            0.0
        }
        fn current_time(&self) -> f64 {
            0.0
        }
        fn destroy(&mut self) {}
    }

    struct SilentBackend;

    impl MediaBackend for SilentBackend {
        type Transport = SilentTransport;
        type Waveform = SilentWaveform;

        fn create_transport(&mut self, _binding: BindingId) -> SilentTransport {
            SilentTransport
        }

        fn create_waveform(&mut self, _binding: BindingId) -> SilentWaveform {
            SilentWaveform
        }
    }

    fn app() -> ChapterApp<MemoryStorage, SilentBackend> {
        init_test_tracing();
        ChapterApp::new(MemoryStorage::new(), SilentBackend, 100)
    }

    fn audio() -> AudioSource {
        AudioSource::new("a.mp3".into(), "/a.mp3".into(), 0, "audio/mpeg".into())
    }

    #[test]
    fn test_from_settings_applies_default_volume() {
        init_test_tracing();
        let mut settings = Settings::default();
        settings.playback.default_volume = 35;
        let app = ChapterApp::from_settings(MemoryStorage::new(), SilentBackend, &settings);
        assert_eq!(app.player().volume(), 35);

        let settings = Settings::default();
        let app = ChapterApp::from_settings(MemoryStorage::new(), SilentBackend, &settings);
        assert_eq!(app.player().volume(), 100);
    }

    #[test]
    fn test_select_unknown_chapter() {
        let mut app = app();
        assert!(matches!(
            app.select_chapter(404),
            Err(ChapterError::UnknownChapter(404))
        ));
    }

    #[test]
    fn test_select_without_audio_reports_no_audio() {
        let mut app = app();
        let chapter = app.add_chapter("Intro", 0.0, 10.0).unwrap();
        assert!(matches!(
            app.select_chapter(chapter.id),
            Err(ChapterError::NoAudioLoaded)
        ));
        assert_eq!(app.store().current_chapter(), Some(&chapter));
    }

    #[test]
    fn test_load_audio_binds_player() {
        let mut app = app();
        app.load_audio(audio()).unwrap();
        let binding = app.player().binding_id().unwrap();

        app.handle_media(MediaNotification::transport(
            binding,
            TransportEvent::MetadataReady { duration: 60.0 },
        ))
        .unwrap();
        assert_eq!(app.player().status(), PlaybackStatus::Ready);

        let chapter = app.add_chapter("Intro", 0.0, 10.0).unwrap();
        app.select_chapter(chapter.id).unwrap();
        assert_eq!(app.player().status(), PlaybackStatus::Playing);
        assert_eq!(app.time_readout(), "0:00 / 0:10");
    }

    #[test]
    fn test_reselecting_active_chapter_replays_it() {
        let mut app = app();
        app.load_audio(audio()).unwrap();
        let binding = app.player().binding_id().unwrap();
        app.handle_media(MediaNotification::transport(
            binding,
            TransportEvent::MetadataReady { duration: 60.0 },
        ))
        .unwrap();
        let chapter = app.add_chapter("Intro", 0.0, 10.0).unwrap();
        app.select_chapter(chapter.id).unwrap();
        app.handle_media(MediaNotification::transport(
            binding,
            TransportEvent::TimeUpdated(10.0),
        ))
        .unwrap();
        assert_eq!(app.player().status(), PlaybackStatus::Paused);

        app.select_chapter(chapter.id).unwrap();
        assert_eq!(app.player().status(), PlaybackStatus::Playing);
        assert_eq!(app.player().current_time(), 0.0);
    }
}
