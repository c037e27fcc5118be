pub mod audio_source;
pub mod chapter;
pub mod playback_state;
pub mod progress;
pub mod session;
