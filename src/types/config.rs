use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{PlayerError, Result};
use crate::types::media::VIDEO_EXTENSIONS;

/// Environment variable naming a JSON file to load the config from.
pub const CONFIG_ENV: &str = "REELPLAY_CONFIG";

/// Startup constants of the player window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub window_title: String,
    /// Initial volume in percent.
    pub default_volume: u8,
    pub window_size: [f32; 2],
    /// Extensions listed in the open dialog's video filter.
    pub video_extensions: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            window_title: "Video Player".to_string(),
            default_volume: 20,
            window_size: [960.0, 600.0],
            video_extensions: VIDEO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl PlayerConfig {
    /// Load a config from a JSON file at the given path. Missing fields take
    /// their default values.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<PlayerConfig> {
        let mut file = File::open(path)?;
        let mut json = String::new();
        file.read_to_string(&mut json)?;
        let config: PlayerConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `REELPLAY_CONFIG` if it is set, otherwise the defaults.
    pub fn from_env() -> Result<PlayerConfig> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_volume > 100 {
            return Err(PlayerError::Config(format!(
                "default_volume must be within 0..=100, got {}",
                self.default_volume
            )));
        }
        if self.window_size.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(PlayerError::Config(format!(
                "window_size must be positive, got {:?}",
                self.window_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = PlayerConfig::default();
        assert_eq!(config.default_volume, 20);
        assert_eq!(config.video_extensions, vec!["wmv", "avi", "mp4", "mov"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let file = write_config(r#"{ "window_title": "Cinema", "default_volume": 55 }"#);
        let config = PlayerConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.window_title, "Cinema");
        assert_eq!(config.default_volume, 55);
        assert_eq!(config.window_size, [960.0, 600.0]);
    }

    #[test]
    fn test_volume_out_of_range_is_rejected() {
        let file = write_config(r#"{ "default_volume": 150 }"#);
        let err = PlayerConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, PlayerError::Config(_)));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let file = write_config("{ not json");
        let err = PlayerConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, PlayerError::Json(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PlayerConfig::load_from_file(dir.path().join("none.json")).unwrap_err();
        assert!(matches!(err, PlayerError::Io(_)));
    }
}
