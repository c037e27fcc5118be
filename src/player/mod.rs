pub mod controller;
pub mod media;

pub use controller::PlaybackController;
pub use media::{
    AudioTransport, BindingId, MediaBackend, MediaEvent, MediaNotification, TransportEvent,
    WaveformEvent, WaveformView,
};
