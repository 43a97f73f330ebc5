use crate::data::install_config::ConfigStore;
use crate::install::decision;
use crate::install::script::{PlatformHost, ScriptHost};
use crate::install::shortcut::{shortcut_path, ShortcutError, ShortcutKind, ShortcutProvisioner};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstallError {
    #[error(transparent)]
    Shortcut(#[from] ShortcutError),
    #[error("invalid option: {0:?}")]
    InvalidOption(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOption {
    Desktop,
    StartMenu,
    None,
}

impl InstallOption {
    pub const ALL: [InstallOption; 3] = [Self::Desktop, Self::StartMenu, Self::None];

    pub fn shortcut_kind(self) -> Option<ShortcutKind> {
        match self {
            InstallOption::Desktop => Some(ShortcutKind::Desktop),
            InstallOption::StartMenu => Some(ShortcutKind::StartMenu),
            InstallOption::None => None,
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            InstallOption::Desktop => "Desktop shortcut",
            InstallOption::StartMenu => "Start menu",
            InstallOption::None => "No shortcut",
        }
    }
}

impl FromStr for InstallOption {
    type Err = InstallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(Self::Desktop),
            "startmenu" | "start-menu" => Ok(Self::StartMenu),
            "none" => Ok(Self::None),
            _ => Err(InstallError::InvalidOption(s.to_string())),
        }
    }
}

/// Tells the shell to swap the installer for the player once `after` has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub after: Duration,
}

/// Turns installer-screen choices into shortcuts and config updates.
///
/// The config is re-read before every change, so a backfill done by the
/// startup decision is never clobbered by a stale copy.
pub struct InstallerController<H = PlatformHost> {
    store: ConfigStore,
    provisioner: ShortcutProvisioner<H>,
    transition_delay: Duration,
}

impl<H: ScriptHost> InstallerController<H> {
    pub fn new(store: ConfigStore, provisioner: ShortcutProvisioner<H>, transition_delay: Duration) -> Self {
        Self {
            store,
            provisioner,
            transition_delay,
        }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Startup decision: `true` means the installer screen should be shown.
    pub fn needs_install(&self) -> bool {
        let desktop = shortcut_path(self.provisioner.paths(), ShortcutKind::Desktop);
        decision::needs_install(&self.store, &desktop)
    }

    /// Entry point for raw option strings coming from the shell.
    pub fn choose_option(&self, option: &str) -> Result<String, InstallError> {
        let option = option.parse::<InstallOption>().map_err(|e| {
            log::warn!("Rejected installer option {option:?}");
            e
        })?;
        self.choose(option)
    }

    pub fn choose(&self, option: InstallOption) -> Result<String, InstallError> {
        let Some(kind) = option.shortcut_kind() else {
            self.skip()?;
            return Ok("Shortcut creation skipped".to_string());
        };

        let link = self.provisioner.create_shortcut(kind)?;
        self.record_shortcut(link);
        Ok(match kind {
            ShortcutKind::Desktop => "Desktop shortcut created".to_string(),
            ShortcutKind::StartMenu => "Start menu shortcut created".to_string(),
        })
    }

    /// Opts out of shortcut creation. A failed save is only logged, so this
    /// currently always succeeds.
    pub fn skip(&self) -> Result<String, InstallError> {
        let mut config = self.store.load();
        config.mark_skipped();
        if !self.store.save(&config) {
            log::warn!("Skip choice was not persisted");
        }
        log::info!("Installation skipped");
        Ok("Installation skipped".to_string())
    }

    pub fn complete_install(&self) -> Transition {
        log::info!("Installation complete, loading main UI");
        Transition {
            after: self.transition_delay,
        }
    }

    /// Removes the shortcut for `kind`, forgetting it in the config if it was
    /// the recorded one.
    pub fn remove_shortcut(&self, kind: ShortcutKind) -> Result<String, InstallError> {
        let Some(removed) = self.provisioner.remove_shortcut(kind)? else {
            return Ok(format!("No {kind} shortcut to remove"));
        };

        let mut config = self.store.load();
        if config.shortcut_path.as_deref() == Some(removed.as_path()) {
            config.shortcut_created = false;
            config.shortcut_path = None;
            if !self.store.save(&config) {
                log::warn!("Shortcut removal was not persisted");
            }
        }
        Ok(format!("Removed {kind} shortcut"))
    }

    fn record_shortcut(&self, link: PathBuf) {
        let mut config = self.store.load();
        config.mark_shortcut(link);
        if !self.store.save(&config) {
            log::warn!("Shortcut was created but the config was not saved");
        }
    }
}
