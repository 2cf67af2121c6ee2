mod error;
mod ops;
mod renderer;
mod types;
mod ui;

use anyhow::Context;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::renderer::gst_engine::GstEngine;
use crate::types::config::PlayerConfig;
use crate::ui::app::PlayerApp;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = PlayerConfig::from_env().context("Failed to load player config")?;
    let engine = GstEngine::new().context("Failed to initialize GStreamer")?;

    let title = config.window_title.clone();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size(config.window_size),
        ..Default::default()
    };
    let app = PlayerApp::new(config, engine);

    eframe::run_native(&title, native_options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("Player window failed: {e}"))?;
    Ok(())
}
