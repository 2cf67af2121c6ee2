use crossbeam_channel::{Receiver, Sender, unbounded};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, trace, warn};

use gst::prelude::*;
use gstreamer as gst;
use gstreamer_app as gst_app;
use gstreamer_video as gst_video;

use crate::error::{PlayerError, Result};
use crate::renderer::media_engine::{EngineEvent, MediaEngine};
use crate::types::playback_state::PlaybackState;

#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub data: Vec<u8>, // Tightly packed RGBA
    pub width: u32,
    pub height: u32,
}

/// Copy `height` rows of `width` RGBA pixels out of a buffer whose rows are
/// `stride` bytes apart.
fn pack_rgba_rows(src: &[u8], width: u32, height: u32, stride: usize) -> Option<Vec<u8>> {
    let row = width as usize * 4;
    if row == 0 || height == 0 || stride == 0 {
        warn!("Ignoring empty frame {}x{} (stride {})", width, height, stride);
        return None;
    }
    if stride < row {
        warn!("Unexpected RGBA stride {} for width {}", stride, width);
        return None;
    }

    let expected = row * height as usize;
    let mut data = Vec::with_capacity(expected);
    for line in src.chunks(stride).take(height as usize) {
        if line.len() < row {
            break;
        }
        data.extend_from_slice(&line[..row]);
    }
    if data.len() != expected {
        warn!(
            "Decoded frame size mismatch: got {}, expected {}",
            data.len(),
            expected
        );
        return None;
    }
    Some(data)
}

/// MediaEngine backed by a GStreamer `playbin`.
///
/// Video is routed through `videoconvert ! videoscale ! appsink` so the UI can
/// pull RGBA frames. Bus messages and position queries are turned into
/// [`EngineEvent`]s whenever [`MediaEngine::poll`] runs.
pub struct GstEngine {
    playbin: gst::Element,
    appsink: gst_app::AppSink,
    bus: gst::Bus,
    sender: Sender<EngineEvent>,
    receiver: Receiver<EngineEvent>,
    source: Option<PathBuf>,
    /// State most recently requested by the controller.
    target: PlaybackState,
    /// State most recently announced on the channel.
    reported: PlaybackState,
    duration_ms: Option<u64>,
    position_ms: Option<u64>,
    /// Seek requested while the pipeline was below `Paused`; applied once it
    /// prerolls.
    pending_seek_ms: Option<u64>,
}

impl GstEngine {
    pub fn new() -> Result<Self> {
        gst::init()?;

        let playbin = gst::ElementFactory::make("playbin").name("player").build()?;

        let appsink = gst_app::AppSink::builder()
            .caps(
                &gst_video::VideoCapsBuilder::new()
                    .format(gst_video::VideoFormat::Rgba)
                    .build(),
            )
            .max_buffers(1)
            .drop(true)
            .build();
        let convert = gst::ElementFactory::make("videoconvert").build()?;
        let scale = gst::ElementFactory::make("videoscale").build()?;

        let sink_bin = gst::Bin::new();
        let chain = [&convert, &scale, appsink.upcast_ref::<gst::Element>()];
        sink_bin.add_many(chain)?;
        gst::Element::link_many(chain)?;
        let pad = convert
            .static_pad("sink")
            .ok_or(PlayerError::MissingPad("sink"))?;
        let ghost = gst::GhostPad::with_target(&pad)?;
        sink_bin.add_pad(&ghost)?;
        playbin.set_property("video-sink", &sink_bin);

        let bus = playbin.bus().ok_or(PlayerError::Bus)?;
        let (sender, receiver) = unbounded();

        let (major, minor, micro, _) = gst::version();
        info!("GStreamer {}.{}.{} playbin ready", major, minor, micro);

        Ok(Self {
            playbin,
            appsink,
            bus,
            sender,
            receiver,
            source: None,
            target: PlaybackState::Stopped,
            reported: PlaybackState::Stopped,
            duration_ms: None,
            position_ms: None,
            pending_seek_ms: None,
        })
    }

    /// Pull the newest decoded frame, if one arrived since the last call.
    pub fn take_frame(&self) -> Option<VideoFrame> {
        let sample = self.appsink.try_pull_sample(gst::ClockTime::ZERO)?;
        let info = gst_video::VideoInfo::from_caps(sample.caps()?).ok()?;
        let buffer = sample.buffer()?;
        let map = buffer.map_readable().ok()?;

        let width = info.width();
        let height = info.height();
        let stride = usize::try_from(info.stride()[0]).unwrap_or(0);
        let data = pack_rgba_rows(map.as_slice(), width, height, stride)?;

        Some(VideoFrame {
            data,
            width,
            height,
        })
    }

    fn send(&self, event: EngineEvent) {
        // The receiver lives as long as self, so this cannot fail.
        let _ = self.sender.send(event);
    }

    fn report(&mut self, state: PlaybackState) {
        if self.reported != state {
            self.reported = state;
            debug!("Engine state: {:?}", state);
            self.send(EngineEvent::PlaybackStateChanged(state));
        }
    }

    fn set_pipeline_state(&self, state: gst::State) -> Result<gst::StateChangeSuccess> {
        Ok(self.playbin.set_state(state)?)
    }

    fn request_state(&mut self, state: gst::State) {
        if let Err(err) = self.set_pipeline_state(state) {
            error!("Failed to set pipeline to {:?}: {}", state, err);
            self.reset_to_stopped();
        }
    }

    fn is_prerolled(&self) -> bool {
        matches!(
            self.playbin.current_state(),
            gst::State::Paused | gst::State::Playing
        )
    }

    fn seek_pipeline(&self, ms: u64) -> Result<()> {
        self.playbin.seek_simple(
            gst::SeekFlags::FLUSH | gst::SeekFlags::KEY_UNIT,
            gst::ClockTime::from_mseconds(ms),
        )?;
        Ok(())
    }

    fn apply_pending_seek(&mut self) {
        let Some(ms) = self.pending_seek_ms.take() else {
            return;
        };
        if let Err(err) = self.seek_pipeline(ms) {
            warn!("Deferred seek to {} ms failed: {}", ms, err);
            self.resync_position();
        }
    }

    /// Announce the position the pipeline actually has, so a refused seek
    /// does not leave the UI ahead of the engine.
    fn resync_position(&mut self) {
        let ms = self
            .playbin
            .query_position::<gst::ClockTime>()
            .map(|position| position.mseconds())
            .unwrap_or(0);
        self.position_ms = Some(ms);
        self.send(EngineEvent::PositionChanged(ms));
    }

    fn reset_to_stopped(&mut self) {
        self.playbin.set_state(gst::State::Null).ok();
        self.pending_seek_ms = None;
        self.target = PlaybackState::Stopped;
        self.report(PlaybackState::Stopped);
    }

    fn refresh_duration(&mut self) {
        let Some(duration) = self.playbin.query_duration::<gst::ClockTime>() else {
            return;
        };
        let ms = duration.mseconds();
        if self.duration_ms != Some(ms) {
            self.duration_ms = Some(ms);
            self.position_ms = None;
            debug!("Duration: {} ms", ms);
            self.send(EngineEvent::DurationChanged(ms));
        }
    }

    fn refresh_position(&mut self) {
        // Positions are only meaningful once the duration was announced, and
        // stale until a deferred seek has been applied.
        if self.duration_ms.is_none()
            || !self.reported.is_active()
            || self.pending_seek_ms.is_some()
        {
            return;
        }
        if let Some(position) = self.playbin.query_position::<gst::ClockTime>() {
            let ms = position.mseconds();
            if self.position_ms != Some(ms) {
                self.position_ms = Some(ms);
                trace!("Position: {} ms", ms);
                self.send(EngineEvent::PositionChanged(ms));
            }
        }
    }

    fn handle_message(&mut self, msg: &gst::Message) {
        use gst::MessageView;

        match msg.view() {
            MessageView::Eos(..) => {
                info!("End of stream");
                MediaEngine::stop(self);
            }
            MessageView::Error(err) => {
                error!(
                    "Pipeline error from {:?}: {} ({:?})",
                    err.src().map(|s| s.path_string()),
                    err.error(),
                    err.debug()
                );
                self.reset_to_stopped();
            }
            MessageView::Warning(warning) => {
                warn!("Pipeline warning: {}", warning.error());
            }
            MessageView::DurationChanged(_) => self.refresh_duration(),
            MessageView::AsyncDone(_) => {
                if self.duration_ms.is_none() {
                    self.refresh_duration();
                }
                self.apply_pending_seek();
            }
            MessageView::StateChanged(changed) => {
                if changed.src() != Some(self.playbin.upcast_ref::<gst::Object>()) {
                    return;
                }
                let state = match changed.current() {
                    gst::State::Playing => PlaybackState::Playing,
                    gst::State::Paused => PlaybackState::Paused,
                    _ => PlaybackState::Stopped,
                };
                if state.is_active() {
                    self.apply_pending_seek();
                }
                // playbin prerolls in Paused on its way to Playing.
                if state == self.target {
                    self.report(state);
                }
            }
            _ => {}
        }
    }
}

impl MediaEngine for GstEngine {
    fn set_source(&mut self, path: &Path) -> Result<()> {
        let path = path.canonicalize()?;
        let uri = gst::glib::filename_to_uri(&path, None)?;

        self.playbin.set_state(gst::State::Null).ok();
        self.playbin.set_property("uri", uri.as_str());
        info!("Source set to {}", uri);

        self.source = Some(path);
        self.duration_ms = None;
        self.position_ms = None;
        self.pending_seek_ms = None;
        self.target = PlaybackState::Stopped;
        self.report(PlaybackState::Stopped);
        Ok(())
    }

    fn play(&mut self) {
        if self.source.is_none() {
            debug!("Play requested without a source");
            return;
        }
        self.target = PlaybackState::Playing;
        self.request_state(gst::State::Playing);
    }

    fn pause(&mut self) {
        if self.source.is_none() {
            return;
        }
        self.target = PlaybackState::Paused;
        self.request_state(gst::State::Paused);
    }

    fn stop(&mut self) {
        self.reset_to_stopped();
        if self.duration_ms.is_some() && self.position_ms != Some(0) {
            self.position_ms = Some(0);
            self.send(EngineEvent::PositionChanged(0));
        }
    }

    fn set_position(&mut self, ms: u64) -> Result<()> {
        if self.source.is_none() {
            return Err(PlayerError::NoSourceSelected);
        }
        if !self.is_prerolled() {
            // A Null/Ready pipeline refuses seeks; keep it for the next preroll.
            debug!("Deferring seek to {} ms", ms);
            self.pending_seek_ms = Some(ms);
            self.position_ms = Some(ms);
            self.send(EngineEvent::PositionChanged(ms));
            return Ok(());
        }
        if let Err(err) = self.seek_pipeline(ms) {
            warn!("Seek to {} ms failed: {}", ms, err);
            self.resync_position();
            return Err(err);
        }
        Ok(())
    }

    fn set_volume(&mut self, fraction: f64) {
        self.playbin.set_property("volume", fraction.clamp(0.0, 1.0));
    }

    fn volume(&self) -> f64 {
        self.playbin.property::<f64>("volume")
    }

    fn set_muted(&mut self, muted: bool) {
        self.playbin.set_property("mute", muted);
    }

    fn is_muted(&self) -> bool {
        self.playbin.property::<bool>("mute")
    }

    fn events(&self) -> Receiver<EngineEvent> {
        self.receiver.clone()
    }

    fn poll(&mut self) {
        while let Some(msg) = self.bus.pop() {
            self.handle_message(&msg);
        }
        if self.duration_ms.is_none() && self.reported.is_active() {
            self.refresh_duration();
        }
        self.refresh_position();
    }
}

impl Drop for GstEngine {
    fn drop(&mut self) {
        self.playbin.set_state(gst::State::Null).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// GStreamer with the base plugins is a runtime dependency; without it
    /// these tests have nothing to drive.
    fn engine() -> Option<GstEngine> {
        match GstEngine::new() {
            Ok(engine) => Some(engine),
            Err(err) => {
                eprintln!("skipping: GStreamer unavailable: {}", err);
                None
            }
        }
    }

    fn drain(engine: &GstEngine) -> Vec<EngineEvent> {
        engine.events().try_iter().collect()
    }

    fn playing(engine: &mut GstEngine) {
        engine.source = Some(PathBuf::from("/videos/clip.mp4"));
        engine.target = PlaybackState::Playing;
        engine.reported = PlaybackState::Playing;
    }

    fn state_changed(engine: &GstEngine, old: gst::State, new: gst::State) -> gst::Message {
        gst::message::StateChanged::builder(old, new, gst::State::VoidPending)
            .src(&engine.playbin)
            .build()
    }

    #[test]
    fn test_pack_rows_drops_stride_padding() {
        // 1x2 frame, rows padded to 8 bytes.
        let src = [1, 2, 3, 4, 0, 0, 0, 0, 5, 6, 7, 8, 0, 0, 0, 0];
        assert_eq!(
            pack_rgba_rows(&src, 1, 2, 8),
            Some(vec![1, 2, 3, 4, 5, 6, 7, 8])
        );
    }

    #[test]
    fn test_pack_rows_rejects_degenerate_layouts() {
        let src = [0u8; 16];
        assert_eq!(pack_rgba_rows(&src, 1, 2, 0), None);
        assert_eq!(pack_rgba_rows(&src, 0, 2, 8), None);
        assert_eq!(pack_rgba_rows(&src, 1, 0, 8), None);
        assert_eq!(pack_rgba_rows(&src, 4, 2, 8), None);
        // Buffer shorter than the advertised height.
        assert_eq!(pack_rgba_rows(&src[..8], 1, 2, 8), None);
    }

    #[test]
    fn test_state_change_error_keeps_gstreamer_text() {
        let err = PlayerError::from(gst::StateChangeError);
        assert_eq!(err.to_string(), gst::StateChangeError.to_string());
    }

    #[test]
    fn test_end_of_stream_stops_and_rewinds() {
        let Some(mut engine) = engine() else { return };
        playing(&mut engine);
        engine.duration_ms = Some(125_000);
        engine.position_ms = Some(124_000);

        engine.handle_message(&gst::message::Eos::new());

        assert_eq!(
            drain(&engine),
            vec![
                EngineEvent::PlaybackStateChanged(PlaybackState::Stopped),
                EngineEvent::PositionChanged(0),
            ]
        );
        assert_eq!(engine.target, PlaybackState::Stopped);
    }

    #[test]
    fn test_pipeline_error_stops() {
        let Some(mut engine) = engine() else { return };
        playing(&mut engine);

        let msg = gst::message::Error::builder(gst::CoreError::Failed, "decoder crashed").build();
        engine.handle_message(&msg);

        assert_eq!(
            drain(&engine),
            vec![EngineEvent::PlaybackStateChanged(PlaybackState::Stopped)]
        );
    }

    #[test]
    fn test_preroll_pause_is_not_reported_on_the_way_to_playing() {
        let Some(mut engine) = engine() else { return };
        engine.source = Some(PathBuf::from("/videos/clip.mp4"));
        engine.target = PlaybackState::Playing;

        let preroll = state_changed(&engine, gst::State::Ready, gst::State::Paused);
        engine.handle_message(&preroll);
        assert!(drain(&engine).is_empty());

        let running = state_changed(&engine, gst::State::Paused, gst::State::Playing);
        engine.handle_message(&running);
        assert_eq!(
            drain(&engine),
            vec![EngineEvent::PlaybackStateChanged(PlaybackState::Playing)]
        );
    }

    #[test]
    fn test_state_changes_of_child_elements_are_ignored() {
        let Some(mut engine) = engine() else { return };
        engine.target = PlaybackState::Playing;

        let msg = gst::message::StateChanged::builder(
            gst::State::Paused,
            gst::State::Playing,
            gst::State::VoidPending,
        )
        .build();
        engine.handle_message(&msg);
        assert!(drain(&engine).is_empty());
    }

    #[test]
    fn test_no_position_before_duration() {
        let Some(mut engine) = engine() else { return };
        playing(&mut engine);
        assert!(engine.duration_ms.is_none());

        engine.refresh_position();
        engine.poll();
        assert!(
            !drain(&engine)
                .iter()
                .any(|e| matches!(e, EngineEvent::PositionChanged(_)))
        );
    }

    #[test]
    fn test_seek_while_stopped_is_deferred() {
        let Some(mut engine) = engine() else { return };
        engine.source = Some(PathBuf::from("/videos/clip.mp4"));
        engine.duration_ms = Some(125_000);

        assert!(engine.set_position(45_000).is_ok());
        assert_eq!(engine.pending_seek_ms, Some(45_000));
        assert_eq!(drain(&engine), vec![EngineEvent::PositionChanged(45_000)]);

        // Positions stay quiet until the deferred seek has been applied.
        engine.reported = PlaybackState::Playing;
        engine.refresh_position();
        assert!(drain(&engine).is_empty());
    }

    #[test]
    fn test_stop_discards_deferred_seek() {
        let Some(mut engine) = engine() else { return };
        engine.source = Some(PathBuf::from("/videos/clip.mp4"));
        engine.set_position(30_000).unwrap();
        engine.stop();
        assert_eq!(engine.pending_seek_ms, None);
    }

    #[test]
    fn test_seek_without_source_is_refused() {
        let Some(mut engine) = engine() else { return };
        assert!(matches!(
            engine.set_position(1_000),
            Err(PlayerError::NoSourceSelected)
        ));
        assert!(drain(&engine).is_empty());
    }
}
