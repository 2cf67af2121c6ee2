pub mod config;
pub mod media;
pub mod playback_state;
pub mod session;
