//! Contracts for the external playback collaborators.
//!
//! The audio transport decodes and plays the resource; the waveform view
//! renders it and mirrors the play position. Both report back through
//! [`MediaNotification`]s tagged with the [`BindingId`] they were created for.

use std::fmt;

/// Identifies one load of one audio resource. A new load always gets a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u64);

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "binding#{}", self.0)
    }
}

/// Native audio decode/playback.
pub trait AudioTransport {
    fn load(&mut self, url: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    /// Total duration in seconds, 0 before metadata is available.
    fn duration(&self) -> f64;
    fn volume(&self) -> f64;
    /// Gain in `0.0..=1.0`.
    fn set_volume(&mut self, gain: f64);
}

/// Waveform visualization of the loaded audio.
pub trait WaveformView {
    fn load(&mut self, url: &str);
    fn play(&mut self);
    fn pause(&mut self);
    /// Seeks to a fractional position in `0.0..=1.0`.
    fn seek_to(&mut self, fraction: f64);
    fn duration(&self) -> f64;
    fn current_time(&self) -> f64;
    /// Releases the view; it must not emit notifications afterwards.
    fn destroy(&mut self);
}

/// Creates the collaborators for a new binding.
pub trait MediaBackend {
    type Transport: AudioTransport;
    type Waveform: WaveformView;

    fn create_transport(&mut self, binding: BindingId) -> Self::Transport;
    fn create_waveform(&mut self, binding: BindingId) -> Self::Waveform;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportEvent {
    TimeUpdated(f64),
    Started,
    Paused,
    MetadataReady { duration: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaveformEvent {
    Ready { duration: f64 },
    TimeAdvanced(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    Transport(TransportEvent),
    Waveform(WaveformEvent),
}

/// A collaborator callback, delivered to the controller on the event loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaNotification {
    pub binding: BindingId,
    pub event: MediaEvent,
}

impl MediaNotification {
    pub fn transport(binding: BindingId, event: TransportEvent) -> Self {
        Self {
            binding,
            event: MediaEvent::Transport(event),
        }
    }

    pub fn waveform(binding: BindingId, event: WaveformEvent) -> Self {
        Self {
            binding,
            event: MediaEvent::Waveform(event),
        }
    }
}
