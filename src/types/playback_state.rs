/// Playback state as reported by the media engine. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn is_playing(self) -> bool {
        self == PlaybackState::Playing
    }

    pub fn is_paused(self) -> bool {
        self == PlaybackState::Paused
    }

    pub fn is_stopped(self) -> bool {
        self == PlaybackState::Stopped
    }

    /// Playing or paused: there is playback that a stop would end.
    pub fn is_active(self) -> bool {
        !self.is_stopped()
    }
}
