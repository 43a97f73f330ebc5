use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What the installer screen decided, persisted across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    pub version: String,
    #[serde(alias = "shortcutCreated")]
    pub shortcut_created: bool,
    #[serde(alias = "shortcutPath")]
    pub shortcut_path: Option<PathBuf>,
    #[serde(alias = "skipInstall")]
    pub skip_install: bool,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            version: crate::VERSION.to_string(),
            shortcut_created: false,
            shortcut_path: None,
            skip_install: false,
        }
    }
}

impl InstallConfig {
    pub fn mark_skipped(&mut self) {
        self.skip_install = true;
        self.shortcut_created = false;
    }

    pub fn mark_shortcut(&mut self, path: PathBuf) {
        self.shortcut_created = true;
        self.shortcut_path = Some(path);
        self.skip_install = false;
    }
}

/// Reads and writes [`InstallConfig`] as pretty JSON. Never fails outward:
/// a broken file reads as defaults, a failed write reports `false`.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> InstallConfig {
        self.ensure_parent();
        if !self.path.exists() {
            return InstallConfig::default();
        }
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("Failed to read config {}: {e}", self.path.display());
                return InstallConfig::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::error!("Failed to parse config {}: {e}", self.path.display());
                InstallConfig::default()
            }
        }
    }

    /// Stamps the current version on the record before writing it.
    pub fn save(&self, config: &InstallConfig) -> bool {
        self.ensure_parent();
        let mut stamped = config.clone();
        stamped.version = crate::VERSION.to_string();

        let raw = match serde_json::to_string_pretty(&stamped) {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("Failed to serialize config: {e}");
                return false;
            }
        };
        match fs::write(&self.path, raw) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save config {}: {e}", self.path.display());
                false
            }
        }
    }

    fn ensure_parent(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("Failed to create {}: {e}", parent.display());
            }
        }
    }
}
