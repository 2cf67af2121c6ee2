pub mod app;
pub mod controls;
pub mod file_dialog;
pub mod status_bar;
pub mod video_player;
