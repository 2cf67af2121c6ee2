use std::path::PathBuf;

/// Ask the user for a file to play. The video filter is advisory: an
/// "All files" filter is always offered as well.
pub fn pick_video_file(video_extensions: &[String]) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Choose a file to play")
        .set_directory(".")
        .add_filter("Video files", video_extensions)
        .add_filter("All files", &["*"])
        .pick_file()
}
