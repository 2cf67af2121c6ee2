use std::time::Duration;

use eframe::egui;
use tracing::info;

use crate::ops::controller::PlaybackController;
use crate::renderer::gst_engine::GstEngine;
use crate::types::config::PlayerConfig;
use crate::ui::controls::{seek_bar, transport_bar};
use crate::ui::status_bar::StatusBar;
use crate::ui::video_player::VideoPlayer;

pub struct PlayerApp {
    pub controller: PlaybackController<GstEngine, StatusBar>,
    pub video_player: VideoPlayer,
    pub config: PlayerConfig,
    /// Fullscreen flag last sent to the viewport.
    applied_fullscreen: bool,
    /// Fullscreen flag last reported by the viewport.
    observed_fullscreen: Option<bool>,
    closing: bool,
}

impl PlayerApp {
    pub fn new(config: PlayerConfig, engine: GstEngine) -> Self {
        let mut controller = PlaybackController::new(engine, StatusBar::default());
        controller.set_volume(config.default_volume);
        Self {
            controller,
            video_player: VideoPlayer::new(),
            config,
            applied_fullscreen: false,
            observed_fullscreen: None,
            closing: false,
        }
    }
}

impl eframe::App for PlayerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.pump_events();
        if let Some(frame) = self.controller.engine().take_frame() {
            self.video_player.update_texture(ctx, &frame);
        }

        if ctx.input(|i| i.viewport().close_requested()) && !self.closing {
            info!("Window closing");
            self.closing = true;
            self.controller.on_window_close();
        }

        // The window manager may leave fullscreen on its own.
        let observed = ctx.input(|i| i.viewport().fullscreen);
        if let Some(actual) = viewport_fullscreen_change(self.observed_fullscreen, observed) {
            self.applied_fullscreen = actual;
            self.controller.set_fullscreen(actual);
        }
        if observed.is_some() {
            self.observed_fullscreen = observed;
        }

        let fullscreen = self.controller.session().fullscreen;
        if fullscreen != self.applied_fullscreen {
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(fullscreen));
            self.applied_fullscreen = fullscreen;
        }

        // Fullscreen shows the video surface alone.
        if !fullscreen {
            egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
                self.controller.view().show(ui);
            });
            egui::TopBottomPanel::bottom("controls_panel").show(ctx, |ui| {
                ui.add_space(4.0);
                seek_bar(ui, &mut self.controller);
                transport_bar(ui, &mut self.controller, &self.config);
                ui.add_space(4.0);
            });
        }

        let inputs = egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(egui::Color32::BLACK))
            .show(ctx, |ui| self.video_player.show(ui))
            .inner;
        for input in inputs {
            self.controller.on_surface_input(input);
        }

        // Keep polling the engine: every frame while playing, slower otherwise.
        if self.controller.session().playback_state.is_playing() {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

/// New fullscreen flag when the viewport reports a different one than last
/// time.
fn viewport_fullscreen_change(previous: Option<bool>, observed: Option<bool>) -> Option<bool> {
    match observed {
        Some(actual) if previous != Some(actual) => Some(actual),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_fullscreen_change() {
        assert_eq!(viewport_fullscreen_change(None, None), None);
        assert_eq!(viewport_fullscreen_change(None, Some(false)), Some(false));
        assert_eq!(viewport_fullscreen_change(Some(true), Some(true)), None);
        // Left fullscreen through the window manager.
        assert_eq!(viewport_fullscreen_change(Some(true), Some(false)), Some(false));
        assert_eq!(viewport_fullscreen_change(Some(true), None), None);
    }
}
