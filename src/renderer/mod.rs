pub mod gst_engine;
pub mod media_engine;
