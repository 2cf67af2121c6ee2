use eframe::egui;

use crate::ops::controller::SurfaceInput;
use crate::renderer::gst_engine::VideoFrame;

/// The video surface: shows the latest decoded frame and turns clicks and
/// keys on it into [`SurfaceInput`]s.
pub struct VideoPlayer {
    pub texture: Option<egui::TextureHandle>,
}

impl VideoPlayer {
    pub fn new() -> Self {
        Self { texture: None }
    }

    /// Upload a decoded frame, reusing the texture when there is one.
    pub fn update_texture(&mut self, ctx: &egui::Context, frame: &VideoFrame) {
        let color_img = egui::ColorImage::from_rgba_unmultiplied(
            [frame.width as usize, frame.height as usize],
            &frame.data,
        );
        match &mut self.texture {
            Some(texture) => texture.set(color_img, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("video_frame", color_img, egui::TextureOptions::LINEAR));
            }
        }
    }

    /// Paint the surface over all available space and collect its input.
    pub fn show(&mut self, ui: &mut egui::Ui) -> Vec<SurfaceInput> {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, egui::Color32::BLACK);

        if let Some(texture) = &self.texture {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(
                texture.id(),
                fit_centered(rect, texture.size_vec2()),
                uv,
                egui::Color32::WHITE,
            );
        } else {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No video loaded",
                egui::FontId::proportional(14.0),
                egui::Color32::GRAY,
            );
        }

        let mut inputs = Vec::new();
        if response.clicked() {
            response.request_focus();
            inputs.push(SurfaceInput::PrimaryClick);
        }
        // Space belongs to the surface unless another widget holds focus.
        let owns_keyboard =
            response.has_focus() || ui.ctx().memory(|mem| mem.focused().is_none());
        if owns_keyboard && ui.input(|i| i.key_pressed(egui::Key::Space)) {
            inputs.push(SurfaceInput::Space);
        }
        if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            inputs.push(SurfaceInput::Escape);
        }
        inputs
    }
}

impl Default for VideoPlayer {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest rect with the aspect ratio of `content` that fits in `area`,
/// centered.
pub fn fit_centered(area: egui::Rect, content: egui::Vec2) -> egui::Rect {
    if content.x <= 0.0 || content.y <= 0.0 {
        return area;
    }
    let scale = (area.width() / content.x).min(area.height() / content.y);
    egui::Rect::from_center_size(area.center(), content * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_wide_video_into_square() {
        let area = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(400.0, 400.0));
        let fitted = fit_centered(area, egui::vec2(1920.0, 1080.0));
        assert!((fitted.width() - 400.0).abs() < 0.01);
        assert!((fitted.height() - 225.0).abs() < 0.01);
        assert!((fitted.center() - area.center()).length() < 0.01);
    }

    #[test]
    fn test_fit_tall_video_into_wide_area() {
        let area = egui::Rect::from_min_size(egui::pos2(10.0, 10.0), egui::vec2(800.0, 300.0));
        let fitted = fit_centered(area, egui::vec2(100.0, 200.0));
        assert_eq!(fitted.height(), 300.0);
        assert_eq!(fitted.width(), 150.0);
    }

    #[test]
    fn test_empty_content_fills_area() {
        let area = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(320.0, 240.0));
        assert_eq!(fit_centered(area, egui::Vec2::ZERO), area);
    }
}
