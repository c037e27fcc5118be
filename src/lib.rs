//! Chapter markers and chapter-by-chapter playback for a single audio file.
//!
//! The [`store::ChapterStore`] owns the session (audio, chapters, active
//! chapter, progress) and persists it; [`ops::chapter_ops`] creates, exports
//! and imports chapters; [`player::PlaybackController`] plays the active
//! chapter through pluggable transport and waveform collaborators.

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod ops;
pub mod player;
pub mod store;
pub mod types;

pub use app::ChapterApp;
pub use error::{ChapterError, ChapterResult};
