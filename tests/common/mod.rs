//! Recording collaborators shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use chapterio::player::{AudioTransport, BindingId, MediaBackend, WaveformView};
use chapterio::types::audio_source::AudioSource;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(BindingId, String),
    Play(BindingId),
    Pause(BindingId),
    Seek(BindingId, f64),
    Volume(BindingId, f64),
    WaveLoad(BindingId, String),
    WavePlay(BindingId),
    WavePause(BindingId),
    WaveSeek(BindingId, f64),
    WaveDestroy(BindingId),
}

pub type Calls = Rc<RefCell<Vec<Call>>>;

pub struct RecordingTransport {
    binding: BindingId,
    calls: Calls,
    time: f64,
    gain: f64,
}

impl AudioTransport for RecordingTransport {
    fn load(&mut self, url: &str) {
        self.calls.borrow_mut().push(Call::Load(self.binding, url.to_string()));
    }

    fn play(&mut self) {
        self.calls.borrow_mut().push(Call::Play(self.binding));
    }

    fn pause(&mut self) {
        self.calls.borrow_mut().push(Call::Pause(self.binding));
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.time = seconds;
        self.calls.borrow_mut().push(Call::Seek(self.binding, seconds));
    }

    fn duration(&self) -> f64 {
        0.0
    }

    fn volume(&self) -> f64 {
        self.gain
    }

    fn set_volume(&mut self, gain: f64) {
        self.gain = gain;
        self.calls.borrow_mut().push(Call::Volume(self.binding, gain));
    }
}

pub struct RecordingWaveform {
    binding: BindingId,
    calls: Calls,
}

impl WaveformView for RecordingWaveform {
    fn load(&mut self, url: &str) {
        self.calls
            .borrow_mut()
            .push(Call::WaveLoad(self.binding, url.to_string()));
    }

    fn play(&mut self) {
        self.calls.borrow_mut().push(Call::WavePlay(self.binding));
    }

    fn pause(&mut self) {
        self.calls.borrow_mut().push(Call::WavePause(self.binding));
    }

    fn seek_to(&mut self, fraction: f64) {
        self.calls
            .borrow_mut()
            .push(Call::WaveSeek(self.binding, fraction));
    }

    fn duration(&self) -> f64 {
        0.0
    }

    fn current_time(&self) -> f64 {
        0.0
    }

    fn destroy(&mut self) {
        self.calls.borrow_mut().push(Call::WaveDestroy(self.binding));
    }
}

#[derive(Default)]
pub struct RecordingBackend {
    pub calls: Calls,
}

impl RecordingBackend {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl MediaBackend for RecordingBackend {
    type Transport = RecordingTransport;
    type Waveform = RecordingWaveform;

    fn create_transport(&mut self, binding: BindingId) -> RecordingTransport {
        RecordingTransport {
            binding,
            calls: self.calls.clone(),
            time: 0.0,
            gain: 1.0,
        }
    }

    fn create_waveform(&mut self, binding: BindingId) -> RecordingWaveform {
        RecordingWaveform {
            binding,
            calls: self.calls.clone(),
        }
    }
}

pub fn audio(name: &str) -> AudioSource {
    AudioSource::new(
        name.to_string(),
        format!("/music/{name}"),
        1024,
        "audio/mpeg".to_string(),
    )
}
