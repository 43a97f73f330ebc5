use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const DEFAULT_SETTINGS_TOML: &str = include_str!("../../config/default.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_accent")]
    pub accent: String,
    #[serde(default = "default_ui_fps")]
    pub ui_fps: u32,
    #[serde(default = "default_transition_delay_ms")]
    pub transition_delay_ms: u64,

    #[serde(default = "default_download_attempts")]
    pub download_attempts: usize,
    #[serde(default = "default_download_retry_delay_ms")]
    pub download_retry_delay_ms: u64,
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,

    #[serde(default)]
    pub transparent_background: bool,
}

fn default_accent() -> String {
    "#007aff".to_string()
}

fn default_ui_fps() -> u32 {
    30
}

fn default_transition_delay_ms() -> u64 {
    500
}

fn default_download_attempts() -> usize {
    3
}

fn default_download_retry_delay_ms() -> u64 {
    1000
}

fn default_download_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            accent: default_accent(),
            ui_fps: default_ui_fps(),
            transition_delay_ms: default_transition_delay_ms(),
            download_attempts: default_download_attempts(),
            download_retry_delay_ms: default_download_retry_delay_ms(),
            download_timeout_secs: default_download_timeout_secs(),
            transparent_background: false,
        }
    }
}

impl Settings {
    /// Missing file: the bundled defaults are written out and used.
    /// Unreadable or malformed file: defaults, with a warning.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.is_file() {
            if let Err(e) = write_default(path) {
                log::warn!("could not write default settings: {e:#}");
            }
            return toml::from_str(DEFAULT_SETTINGS_TOML).unwrap_or_default();
        }
        match Self::load(path) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("settings unreadable, using defaults: {e:#}");
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parse {}", path.display()))
    }

    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }

    pub fn download_retry_delay(&self) -> Duration {
        Duration::from_millis(self.download_retry_delay_ms)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs.max(1))
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.ui_fps.clamp(1, 120)))
    }
}

fn write_default(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("mkdir {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_SETTINGS_TOML).with_context(|| format!("write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_match_code_defaults() {
        let parsed: Settings = toml::from_str(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn missing_file_is_written_out() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("settings.toml");

        let s = Settings::load_or_default(&path);

        assert_eq!(s, Settings::default());
        assert!(path.is_file());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.toml");
        fs::write(&path, "ui_fps = \"fast\"").unwrap();

        assert_eq!(Settings::load_or_default(&path), Settings::default());
        // the user's file is left for them to fix
        assert_eq!(fs::read_to_string(&path).unwrap(), "ui_fps = \"fast\"");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.toml");
        fs::write(&path, "download_attempts = 5\n").unwrap();

        let s = Settings::load_or_default(&path);

        assert_eq!(s.download_attempts, 5);
        assert_eq!(s.accent, default_accent());
        assert_eq!(s.transition_delay(), Duration::from_millis(500));
    }
}
