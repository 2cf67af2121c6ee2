use crate::types::playback_state::PlaybackState;

/// Which transport buttons are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordances {
    pub play: bool,
    pub pause: bool,
    pub stop: bool,
}

/// Derive the transport buttons purely from the playback state.
pub fn affordances(state: PlaybackState) -> Affordances {
    match state {
        PlaybackState::Playing => Affordances {
            play: false,
            pause: true,
            stop: true,
        },
        PlaybackState::Paused => Affordances {
            play: true,
            pause: false,
            stop: true,
        },
        PlaybackState::Stopped => Affordances {
            play: true,
            pause: true,
            stop: false,
        },
    }
}

/// Icon on the mute button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeIcon {
    Volume,
    Muted,
}

impl VolumeIcon {
    pub fn for_muted(muted: bool) -> Self {
        if muted {
            VolumeIcon::Muted
        } else {
            VolumeIcon::Volume
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            VolumeIcon::Volume => "🔊",
            VolumeIcon::Muted => "🔇",
        }
    }
}
