/// Transport state for the currently bound audio resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// No resource, or a resource whose metadata has not arrived yet.
    Unloaded,
    Ready,
    Playing,
    Paused,
}

#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    /// Last reported transport time in seconds.
    pub current_time: f64,
    /// Total duration in seconds; 0 until metadata is available.
    pub duration: f64,
    /// Volume on the 0-100 scale.
    pub volume: u8,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self {
            status: PlaybackStatus::Unloaded,
            current_time: 0.0,
            duration: 0.0,
            volume: 100,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    /// Forget everything tied to the previous resource; volume is kept.
    pub fn reset(&mut self) {
        self.status = PlaybackStatus::Unloaded;
        self.current_time = 0.0;
        self.duration = 0.0;
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}
