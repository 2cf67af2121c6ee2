use crossbeam_channel::Receiver;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{PlayerError, Result};
use crate::ops::affordance::{Affordances, VolumeIcon, affordances};
use crate::ops::status::{StatusSnapshot, StatusView, status_text};
use crate::renderer::media_engine::{EngineEvent, MediaEngine};
use crate::types::media::MediaSource;
use crate::types::playback_state::PlaybackState;
use crate::types::session::PlaybackSession;

/// Input received by the video surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceInput {
    PrimaryClick,
    Space,
    Escape,
}

/// Keeps the player window and the media engine consistent.
///
/// UI intents become engine calls; engine notifications become session
/// updates. The playback state is never assumed: it only changes when the
/// engine reports it.
pub struct PlaybackController<E: MediaEngine, V: StatusView> {
    engine: E,
    view: V,
    events: Receiver<EngineEvent>,
    session: PlaybackSession,
}

impl<E: MediaEngine, V: StatusView> PlaybackController<E, V> {
    pub fn new(engine: E, view: V) -> Self {
        let events = engine.events();
        let mut controller = Self {
            engine,
            view,
            events,
            session: PlaybackSession::new(),
        };
        controller.read_back_audio();
        controller
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn affordances(&self) -> Affordances {
        affordances(self.session.playback_state)
    }

    pub fn volume_icon(&self) -> VolumeIcon {
        VolumeIcon::for_muted(self.session.muted)
    }

    /// Upper bound of the seek control, in seconds.
    pub fn seek_maximum(&self) -> u64 {
        self.session.total_seconds
    }

    pub fn progress_label(&self) -> String {
        self.session.progress_label()
    }

    /// Load `path` and start playing it. Paths that are not existing files
    /// are a cancelled selection and are ignored.
    pub fn open_file(&mut self, path: &Path) {
        let Some(source) = MediaSource::from_path(path) else {
            debug!("Ignoring selection {}: not a file", path.display());
            return;
        };
        if let Err(err) = self.engine.set_source(source.path()) {
            warn!("Failed to load {}: {}", source.path().display(), err);
            return;
        }
        info!("Opened {}", source.path().display());
        self.session.source_path = Some(source.into_path());
        self.session.current_seconds = 0;
        self.session.total_seconds = 0;
        self.drain_events();
        self.play();
    }

    pub fn play(&mut self) {
        if let Err(err) = self.try_play() {
            warn!("Play refused: {}", err);
            self.view.show_error(&err.to_string());
        }
    }

    fn try_play(&mut self) -> Result<()> {
        if self.session.playback_state.is_playing() {
            return Ok(());
        }
        if !self.session.has_source() {
            return Err(PlayerError::NoSourceSelected);
        }
        self.engine.play();
        self.drain_events();
        self.refresh_status("");
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.session.playback_state.is_playing() {
            self.engine.pause();
            self.drain_events();
        }
        self.refresh_status("");
    }

    pub fn stop(&mut self) {
        if self.session.playback_state.is_active() {
            self.engine.stop();
            self.drain_events();
        }
        self.refresh_status("");
    }

    /// Click/Space switch: pause when playing, play otherwise. Without a
    /// source there is nothing to switch and nothing is reported.
    pub fn toggle(&mut self) {
        if self.session.playback_state.is_playing() {
            self.engine.pause();
        } else if self.session.has_source() {
            self.engine.play();
        } else {
            debug!("Toggle ignored: no source loaded");
            return;
        }
        self.drain_events();
    }

    pub fn set_volume(&mut self, percent: u8) {
        let percent = percent.min(100);
        self.engine.set_volume(f64::from(percent) / 100.0);
        self.read_back_audio();
        self.refresh_status("");
    }

    pub fn toggle_mute(&mut self) {
        let muted = !self.engine.is_muted();
        self.engine.set_muted(muted);
        self.read_back_audio();
        self.refresh_status("");
    }

    pub fn toggle_fullscreen(&mut self) {
        self.session.fullscreen = !self.session.fullscreen;
        self.refresh_status("");
    }

    pub fn exit_fullscreen(&mut self) {
        self.set_fullscreen(false);
    }

    /// Adopt a fullscreen change made outside the player, e.g. by the window
    /// manager.
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        if self.session.fullscreen != fullscreen {
            self.session.fullscreen = fullscreen;
            self.refresh_status("");
        }
    }

    pub fn on_surface_input(&mut self, input: SurfaceInput) {
        match input {
            SurfaceInput::PrimaryClick | SurfaceInput::Space => self.toggle(),
            SurfaceInput::Escape => self.exit_fullscreen(),
        }
    }

    /// Press/release of the seek control.
    pub fn set_seek_held(&mut self, held: bool) {
        self.session.seek_held = held;
    }

    /// Seek control moved to `seconds`. Only acts while the control is held.
    pub fn on_seek_drag_position(&mut self, seconds: u64) {
        if !self.session.seek_held {
            return;
        }
        match self.engine.set_position(seconds.saturating_mul(1000)) {
            Ok(()) => self.session.current_seconds = seconds,
            Err(err) => warn!("Seek to {}s refused: {}", seconds, err),
        }
    }

    pub fn on_engine_duration_changed(&mut self, ms: u64) {
        self.session.total_seconds = ms / 1000;
        self.session.current_seconds = 0;
    }

    pub fn on_engine_position_changed(&mut self, ms: u64) {
        if self.session.seek_held {
            return;
        }
        let mut seconds = ms / 1000;
        if self.session.total_seconds > 0 {
            seconds = seconds.min(self.session.total_seconds);
        }
        self.session.current_seconds = seconds;
    }

    pub fn on_engine_state_changed(&mut self, state: PlaybackState) {
        if self.session.playback_state == state {
            return;
        }
        debug!("Playback {:?} -> {:?}", self.session.playback_state, state);
        self.session.playback_state = state;
        self.refresh_status("");
    }

    /// Stop anything still playing before the window goes away.
    pub fn on_window_close(&mut self) {
        if self.session.playback_state.is_active() {
            info!("Stopping playback on close");
            self.engine.stop();
            self.drain_events();
        }
    }

    /// Let the engine publish its notifications, then handle all of them.
    pub fn pump_events(&mut self) {
        self.engine.poll();
        self.drain_events();
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::DurationChanged(ms) => self.on_engine_duration_changed(ms),
            EngineEvent::PositionChanged(ms) => self.on_engine_position_changed(ms),
            EngineEvent::PlaybackStateChanged(state) => self.on_engine_state_changed(state),
        }
    }

    fn read_back_audio(&mut self) {
        self.session.volume_percent = fraction_to_percent(self.engine.volume());
        self.session.muted = self.engine.is_muted();
    }

    /// Rewrite the status line from engine truth, with an optional suffix.
    pub fn refresh_status(&mut self, suffix: &str) {
        let file_name = self.session.source_name();
        let state = self.session.playback_state;
        let snapshot = StatusSnapshot {
            now_playing: if state.is_playing() {
                file_name.as_deref()
            } else {
                None
            },
            paused: state.is_paused(),
            fullscreen: self.session.fullscreen,
            muted: self.engine.is_muted(),
            volume_percent: fraction_to_percent(self.engine.volume()),
        };
        let text = status_text(&snapshot, suffix);
        self.view.show_message(&text);
    }
}

fn fraction_to_percent(fraction: f64) -> u8 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u8
}
