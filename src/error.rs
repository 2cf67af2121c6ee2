use gstreamer as gst;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlayerError>;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Please choose a file to play first")]
    NoSourceSelected,

    // GStreamer
    #[error("{0}")]
    Glib(#[from] gst::glib::Error),
    #[error("{0}")]
    Bool(#[from] gst::glib::BoolError),
    #[error("{0}")]
    StateChange(#[from] gst::StateChangeError),
    #[error("failed to get the gstreamer bus")]
    Bus,
    #[error("video sink is missing its {0} pad")]
    MissingPad(&'static str),

    // Configuration
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
