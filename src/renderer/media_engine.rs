use crossbeam_channel::Receiver;
use std::path::Path;

use crate::error::Result;
use crate::types::playback_state::PlaybackState;

/// Notifications pushed by a media engine. They are drained on the UI thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// Duration of the current source in milliseconds.
    DurationChanged(u64),
    /// Playback position in milliseconds.
    PositionChanged(u64),
    PlaybackStateChanged(PlaybackState),
}

/// The decode/render facility the controller drives.
///
/// Calls only request changes. The resulting state is reported back through
/// [`EngineEvent`]s on the receiver returned by [`MediaEngine::events`]; a
/// `DurationChanged` for a new source is always sent before any
/// `PositionChanged` for it.
pub trait MediaEngine {
    fn set_source(&mut self, path: &Path) -> Result<()>;
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    /// Seek to `ms`. An engine that cannot honour the seek returns an error
    /// and keeps its previous position.
    fn set_position(&mut self, ms: u64) -> Result<()>;
    /// Volume as a fraction in `0.0..=1.0`.
    fn set_volume(&mut self, fraction: f64);
    fn volume(&self) -> f64;
    fn set_muted(&mut self, muted: bool);
    fn is_muted(&self) -> bool;

    fn events(&self) -> Receiver<EngineEvent>;

    /// Give the backend a chance to publish pending notifications.
    fn poll(&mut self) {}
}
