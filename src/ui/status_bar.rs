use eframe::egui;
use tracing::error;

use crate::ops::status::StatusView;

/// Status line at the bottom of the window. Errors go to a blocking native
/// message box.
#[derive(Debug, Default)]
pub struct StatusBar {
    message: String,
}

impl StatusBar {
    pub fn show(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(&self.message).size(12.0));
        });
    }
}

impl StatusView for StatusBar {
    fn show_message(&mut self, text: &str) {
        self.message = text.to_string();
    }

    fn show_error(&mut self, text: &str) {
        error!("{}", text);
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("Error")
            .set_description(text)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}
