use std::path::{Path, PathBuf};

/// Container types offered by the open-file dialog's video filter.
pub const VIDEO_EXTENSIONS: [&str; 4] = ["wmv", "avi", "mp4", "mov"];

/// A media file that exists on disk and can be handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    path: PathBuf,
}

impl MediaSource {
    /// Returns `None` unless `path` names an existing regular file.
    /// Extensions are not checked; the dialog filter is advisory only.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        if path.is_file() {
            Some(Self {
                path: path.to_path_buf(),
            })
        } else {
            None
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}
