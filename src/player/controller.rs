use tracing::{debug, info};

use crate::error::{ChapterError, ChapterResult};
use crate::ops::time_format::format_clock;
use crate::player::media::{
    AudioTransport, BindingId, MediaBackend, MediaEvent, MediaNotification, TransportEvent,
    WaveformEvent, WaveformView,
};
use crate::store::{ChapterStore, Storage};
use crate::types::audio_source::AudioSource;
use crate::types::chapter::Chapter;
use crate::types::playback_state::{PlaybackState, PlaybackStatus};

struct Binding<B: MediaBackend> {
    id: BindingId,
    transport: B::Transport,
    waveform: B::Waveform,
}

/// Drives the transport and waveform for the store's active chapter.
///
/// Reads the active chapter from the [`ChapterStore`] on every decision and
/// writes boundary completions back into it.
pub struct PlaybackController<B: MediaBackend> {
    backend: B,
    binding: Option<Binding<B>>,
    next_binding: u64,
    playback_state: PlaybackState,
    /// A chapter was selected before metadata arrived.
    pending_selection: bool,
}

impl<B: MediaBackend> PlaybackController<B> {
    pub fn new(backend: B, volume: u8) -> Self {
        let mut playback_state = PlaybackState::new();
        playback_state.volume = volume.min(100);
        Self {
            backend,
            binding: None,
            next_binding: 0,
            playback_state,
            pending_selection: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn playback_state(&self) -> &PlaybackState {
        &self.playback_state
    }

    pub fn status(&self) -> PlaybackStatus {
        self.playback_state.status
    }

    pub fn current_time(&self) -> f64 {
        self.playback_state.current_time
    }

    pub fn duration(&self) -> f64 {
        self.playback_state.duration
    }

    pub fn volume(&self) -> u8 {
        self.playback_state.volume
    }

    /// The live binding, if any audio is loaded.
    pub fn binding_id(&self) -> Option<BindingId> {
        self.binding.as_ref().map(|b| b.id)
    }

    /// Tears down the current bindings, then binds `src` under a new id.
    pub fn load_source(&mut self, src: &AudioSource) -> BindingId {
        self.teardown();
        self.playback_state.reset();

        self.next_binding += 1;
        let id = BindingId(self.next_binding);
        let mut transport = self.backend.create_transport(id);
        let mut waveform = self.backend.create_waveform(id);
        transport.load(&src.url);
        transport.set_volume(gain(self.playback_state.volume));
        waveform.load(&src.url);

        self.binding = Some(Binding {
            id,
            transport,
            waveform,
        });
        info!(binding = %id, file = %src.file_name, "Loaded audio source");
        id
    }

    pub fn unload(&mut self) {
        self.teardown();
        self.playback_state.reset();
    }

    fn teardown(&mut self) {
        self.pending_selection = false;
        if let Some(mut binding) = self.binding.take() {
            binding.transport.pause();
            binding.waveform.destroy();
            debug!(binding = %binding.id, "Released media binding");
        }
    }

    /// Seeks to the store's active chapter and starts playing it.
    ///
    /// Before metadata is available the seek is deferred until it arrives.
    pub fn on_chapter_selected<S: Storage>(
        &mut self,
        store: &ChapterStore<S>,
    ) -> ChapterResult<()> {
        let Some(chapter) = store.current_chapter() else {
            self.pending_selection = false;
            return Ok(());
        };
        if self.binding.is_none() {
            return Err(ChapterError::NoAudioLoaded);
        }
        if self.playback_state.status == PlaybackStatus::Unloaded {
            debug!(chapter = chapter.id, "Deferring chapter start until metadata is ready");
            self.pending_selection = true;
            return Ok(());
        }
        self.start_chapter(chapter);
        Ok(())
    }

    fn start_chapter(&mut self, chapter: &Chapter) {
        let total = self.total_duration();
        let Some(binding) = self.binding.as_mut() else {
            return;
        };

        binding.transport.set_current_time(chapter.start);
        if total > 0.0 {
            binding.waveform.seek_to((chapter.start / total).clamp(0.0, 1.0));
        }
        binding.transport.play();
        binding.waveform.play();

        self.playback_state.current_time = chapter.start;
        self.playback_state.status = PlaybackStatus::Playing;
        debug!(chapter = chapter.id, start = chapter.start, "Started chapter");
    }

    fn total_duration(&self) -> f64 {
        if self.playback_state.duration > 0.0 {
            return self.playback_state.duration;
        }
        self.binding
            .as_ref()
            .map(|b| b.waveform.duration())
            .unwrap_or(0.0)
    }

    /// Applies a collaborator callback. Callbacks from released bindings are dropped.
    pub fn handle_notification<S: Storage>(
        &mut self,
        store: &mut ChapterStore<S>,
        notification: MediaNotification,
    ) {
        if self.binding_id() != Some(notification.binding) {
            debug!(binding = %notification.binding, "Ignoring notification from stale binding");
            return;
        }

        match notification.event {
            MediaEvent::Transport(TransportEvent::MetadataReady { duration }) => {
                self.playback_state.duration = duration;
                if self.playback_state.status == PlaybackStatus::Unloaded {
                    self.playback_state.status = PlaybackStatus::Ready;
                }
                if self.pending_selection {
                    self.pending_selection = false;
                    if let Some(chapter) = store.current_chapter().cloned() {
                        self.start_chapter(&chapter);
                    }
                }
            }
            MediaEvent::Transport(TransportEvent::Started) => {
                if matches!(
                    self.playback_state.status,
                    PlaybackStatus::Ready | PlaybackStatus::Paused
                ) {
                    self.playback_state.status = PlaybackStatus::Playing;
                }
            }
            MediaEvent::Transport(TransportEvent::Paused) => {
                if self.playback_state.status == PlaybackStatus::Playing {
                    self.playback_state.status = PlaybackStatus::Paused;
                }
            }
            MediaEvent::Transport(TransportEvent::TimeUpdated(time)) => {
                self.on_time_update(store, time);
            }
            MediaEvent::Waveform(WaveformEvent::Ready { duration }) => {
                if self.playback_state.duration <= 0.0 {
                    self.playback_state.duration = duration;
                }
            }
            MediaEvent::Waveform(WaveformEvent::TimeAdvanced(time)) if time.is_finite() => {
                self.playback_state.current_time = time;
            }
            MediaEvent::Waveform(WaveformEvent::TimeAdvanced(_)) => {}
        }
    }

    fn on_time_update<S: Storage>(&mut self, store: &mut ChapterStore<S>, time: f64) {
        if !time.is_finite() {
            debug!(time, "Ignoring non-finite time update");
            return;
        }
        self.playback_state.current_time = time;
        if self.playback_state.status != PlaybackStatus::Playing {
            return;
        }
        let Some(chapter) = store.current_chapter() else {
            return;
        };
        if time < chapter.end {
            return;
        }

        let chapter_id = chapter.id;
        self.pause_bindings();
        self.playback_state.status = PlaybackStatus::Paused;
        store.record_progress(chapter_id, time);
        info!(chapter = chapter_id, time, "Reached chapter end");
    }

    pub fn play(&mut self) -> ChapterResult<()> {
        let ready = matches!(
            self.playback_state.status,
            PlaybackStatus::Ready | PlaybackStatus::Paused | PlaybackStatus::Playing
        );
        let Some(binding) = self.binding.as_mut().filter(|_| ready) else {
            return Err(ChapterError::NoAudioLoaded);
        };
        binding.transport.play();
        binding.waveform.play();
        self.playback_state.status = PlaybackStatus::Playing;
        Ok(())
    }

    pub fn pause(&mut self) -> ChapterResult<()> {
        if self.binding.is_none() {
            return Err(ChapterError::NoAudioLoaded);
        }
        if self.playback_state.status == PlaybackStatus::Playing {
            self.pause_bindings();
            self.playback_state.status = PlaybackStatus::Paused;
        }
        Ok(())
    }

    pub fn toggle_play_pause(&mut self) -> ChapterResult<()> {
        if self.playback_state.is_playing() {
            self.pause()
        } else {
            self.play()
        }
    }

    fn pause_bindings(&mut self) {
        if let Some(binding) = self.binding.as_mut() {
            binding.transport.pause();
            binding.waveform.pause();
        }
    }

    /// Sets the volume on the 0-100 scale, clamping out-of-range input.
    pub fn set_volume(&mut self, volume: i32) -> u8 {
        let volume = volume.clamp(0, 100) as u8;
        self.playback_state.volume = volume;
        if let Some(binding) = self.binding.as_mut() {
            binding.transport.set_volume(gain(volume));
        }
        volume
    }

    /// Percentage of `chapter` played, always within `0.0..=100.0`.
    pub fn progress_percentage(&self, chapter: Option<&Chapter>) -> f64 {
        let Some(chapter) = chapter else {
            return 0.0;
        };
        let span = chapter.duration();
        if self.playback_state.duration <= 0.0 || span <= 0.0 {
            return 0.0;
        }
        let percent = (self.playback_state.current_time - chapter.start) / span * 100.0;
        if percent.is_nan() {
            return 0.0;
        }
        percent.clamp(0.0, 100.0)
    }

    /// `current / end` clock readout; the end is the chapter end when one is active.
    pub fn time_readout(&self, chapter: Option<&Chapter>) -> String {
        let end = chapter
            .map(|c| c.end)
            .unwrap_or(self.playback_state.duration);
        format!(
            "{} / {}",
            format_clock(self.playback_state.current_time),
            format_clock(end)
        )
    }
}

fn gain(volume: u8) -> f64 {
    f64::from(volume.min(100)) / 100.0
}
