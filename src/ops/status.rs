/// Separator that ends every status segment.
pub const FIELD_SEPARATOR: &str = "    ";

/// Where status messages and blocking errors go.
pub trait StatusView {
    fn show_message(&mut self, text: &str);
    /// Blocking, user-visible error.
    fn show_error(&mut self, text: &str);
}

/// Everything the status line reports, read from the engine at the time of
/// the refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot<'a> {
    /// File name of the source when playing.
    pub now_playing: Option<&'a str>,
    pub paused: bool,
    pub fullscreen: bool,
    pub muted: bool,
    pub volume_percent: u8,
}

/// Assemble the status line. Segments appear in a fixed order and absent
/// segments leave no separator behind. A non-empty `suffix` is appended
/// followed by a tab.
pub fn status_text(snapshot: &StatusSnapshot<'_>, suffix: &str) -> String {
    let mut text = String::new();

    if let Some(name) = snapshot.now_playing {
        push_segment(&mut text, &format!("Now playing: {}", name));
    } else if snapshot.paused {
        push_segment(&mut text, "Paused");
    }
    if snapshot.fullscreen {
        push_segment(&mut text, "Fullscreen: on");
    }
    if snapshot.muted {
        push_segment(&mut text, "Mute: on");
    } else {
        push_segment(&mut text, &format!("Volume: {}%", snapshot.volume_percent));
    }
    if !suffix.is_empty() {
        text.push_str(suffix);
        text.push('\t');
    }
    text
}

fn push_segment(text: &mut String, segment: &str) {
    text.push_str(segment);
    text.push_str(FIELD_SEPARATOR);
}


#[cfg(test)]
mod tests {
    use super::*;

    fn idle() -> StatusSnapshot<'static> {
        StatusSnapshot {
            now_playing: None,
            paused: false,
            fullscreen: false,
            muted: false,
            volume_percent: 20,
        }
    }

    #[test]
    fn test_idle_shows_only_volume() {
        assert_eq!(status_text(&idle(), ""), "Volume: 20%    ");
    }

    #[test]
    fn test_all_segments_in_order() {
        let snapshot = StatusSnapshot {
            now_playing: Some("movie.mp4"),
            fullscreen: true,
            ..idle()
        };
        assert_eq!(
            status_text(&snapshot, "seeking"),
            "Now playing: movie.mp4    Fullscreen: on    Volume: 20%    seeking\t"
        );
    }

    #[test]
    fn test_mute_suppresses_volume() {
        let snapshot = StatusSnapshot {
            paused: true,
            muted: true,
            ..idle()
        };
        assert_eq!(status_text(&snapshot, ""), "Paused    Mute: on    ");
    }

    #[test]
    fn test_now_playing_wins_over_paused() {
        let snapshot = StatusSnapshot {
            now_playing: Some("a.avi"),
            paused: true,
            ..idle()
        };
        assert!(!status_text(&snapshot, "").contains("Paused"));
    }
}
