use eframe::egui;

use crate::ops::controller::PlaybackController;
use crate::ops::status::StatusView;
use crate::renderer::media_engine::MediaEngine;
use crate::types::config::PlayerConfig;
use crate::ui::file_dialog::pick_video_file;

/// Seek row: slider plus `m:s / M:S` label.
///
/// The slider counts as held while the pointer is down on it; only then do
/// its changes seek the engine.
pub fn seek_bar<E: MediaEngine, V: StatusView>(
    ui: &mut egui::Ui,
    controller: &mut PlaybackController<E, V>,
) {
    ui.horizontal(|ui| {
        let label = controller.progress_label();
        let mut position = controller.session().current_seconds;
        let max = controller.seek_maximum();

        ui.spacing_mut().slider_width = (ui.available_width() - 110.0).max(80.0);
        let response = ui.add(egui::Slider::new(&mut position, 0..=max).show_value(false));

        controller.set_seek_held(response.is_pointer_button_down_on());
        if response.changed() {
            controller.on_seek_drag_position(position);
        }
        ui.label(label);
    });
}

/// Transport buttons, mute, volume and fullscreen.
pub fn transport_bar<E: MediaEngine, V: StatusView>(
    ui: &mut egui::Ui,
    controller: &mut PlaybackController<E, V>,
    config: &PlayerConfig,
) {
    let enabled = controller.affordances();
    ui.horizontal(|ui| {
        if ui.button("📂").on_hover_text("Open file").clicked() {
            if let Some(path) = pick_video_file(&config.video_extensions) {
                controller.open_file(&path);
            }
        }
        ui.separator();
        if ui
            .add_enabled(enabled.play, egui::Button::new("▶"))
            .on_hover_text("Play")
            .clicked()
        {
            controller.play();
        }
        if ui
            .add_enabled(enabled.pause, egui::Button::new("⏸"))
            .on_hover_text("Pause")
            .clicked()
        {
            controller.pause();
        }
        if ui
            .add_enabled(enabled.stop, egui::Button::new("⏹"))
            .on_hover_text("Stop")
            .clicked()
        {
            controller.stop();
        }
        ui.separator();

        if ui
            .button(controller.volume_icon().glyph())
            .on_hover_text("Mute")
            .clicked()
        {
            controller.toggle_mute();
        }
        let mut volume = controller.session().volume_percent;
        if ui
            .add(egui::Slider::new(&mut volume, 0..=100).show_value(false))
            .changed()
        {
            controller.set_volume(volume);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("🗖").on_hover_text("Fullscreen").clicked() {
                controller.toggle_fullscreen();
            }
        });
    });
}
