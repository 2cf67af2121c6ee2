use std::path::PathBuf;

use crate::types::playback_state::PlaybackState;

/// PlaybackSession is the controller's view of the player window: what is
/// loaded, what the engine last reported, and the seek-control latch.
/// Nothing in here is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub source_path: Option<PathBuf>,
    pub playback_state: PlaybackState,
    pub current_seconds: u64,
    pub total_seconds: u64,
    pub volume_percent: u8,
    pub muted: bool,
    pub fullscreen: bool,
    /// Set while the user holds the seek control; engine positions are
    /// dropped until it is released.
    pub seek_held: bool,
}

impl PlaybackSession {
    pub fn new() -> Self {
        PlaybackSession {
            source_path: None,
            playback_state: PlaybackState::Stopped,
            current_seconds: 0,
            total_seconds: 0,
            volume_percent: 0,
            muted: false,
            fullscreen: false,
            seek_held: false,
        }
    }

    pub fn has_source(&self) -> bool {
        self.source_path.is_some()
    }

    /// File name of the loaded source, e.g. `movie.mp4`.
    pub fn source_name(&self) -> Option<String> {
        let name = self.source_path.as_deref()?.file_name()?;
        Some(name.to_string_lossy().to_string())
    }

    /// Progress text in `m:s / M:S` form, without zero padding.
    pub fn progress_label(&self) -> String {
        format_progress(self.current_seconds, self.total_seconds)
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new()
    }
}

pub fn format_progress(current_seconds: u64, total_seconds: u64) -> String {
    format!(
        "{}:{} / {}:{}",
        current_seconds / 60,
        current_seconds % 60,
        total_seconds / 60,
        total_seconds % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_has_no_source() {
        let session = PlaybackSession::new();
        assert!(!session.has_source());
        assert_eq!(session.playback_state, PlaybackState::Stopped);
        assert_eq!(session.progress_label(), "0:0 / 0:0");
        assert_eq!(session.source_name(), None);
    }

    #[test]
    fn test_source_name_is_file_name_only() {
        let session = PlaybackSession {
            source_path: Some(PathBuf::from("/videos/holiday/beach.mov")),
            ..PlaybackSession::new()
        };
        assert_eq!(session.source_name().as_deref(), Some("beach.mov"));
    }

    #[test]
    fn test_progress_is_not_zero_padded() {
        assert_eq!(format_progress(30, 125), "0:30 / 2:5");
        assert_eq!(format_progress(61, 3600), "1:1 / 60:0");
    }
}
