use crate::data::install_config::{ConfigStore, InstallConfig};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The user opted out earlier.
    Skipped,
    /// The recorded shortcut is still on disk.
    Recorded(PathBuf),
    /// A desktop shortcut exists that the config does not know about.
    Backfill(PathBuf),
    ShowInstaller,
}

impl Decision {
    pub fn needs_install(&self) -> bool {
        matches!(self, Decision::ShowInstaller)
    }
}

/// Decides from the config and the filesystem alone; writes nothing.
/// An explicit skip outranks any shortcut found on disk.
pub fn decide(config: &InstallConfig, desktop_shortcut: &Path) -> Decision {
    if config.skip_install {
        return Decision::Skipped;
    }
    if config.shortcut_created {
        if let Some(recorded) = config.shortcut_path.as_deref() {
            if recorded.is_file() {
                return Decision::Recorded(recorded.to_path_buf());
            }
        }
    }
    if desktop_shortcut.is_file() {
        return Decision::Backfill(desktop_shortcut.to_path_buf());
    }
    Decision::ShowInstaller
}

/// Loads the config, decides, and records a discovered desktop shortcut.
pub fn needs_install(store: &ConfigStore, desktop_shortcut: &Path) -> bool {
    let mut config = store.load();
    let decision = decide(&config, desktop_shortcut);
    match &decision {
        Decision::Skipped => log::info!("User previously skipped installation"),
        Decision::Recorded(p) => log::info!("Shortcut exists at: {}", p.display()),
        Decision::Backfill(p) => {
            log::info!("Desktop shortcut found at: {}", p.display());
            config.shortcut_created = true;
            config.shortcut_path = Some(p.clone());
            if !store.save(&config) {
                log::warn!("Could not record discovered shortcut");
            }
        }
        Decision::ShowInstaller => log::info!("Installation needed"),
    }
    decision.needs_install()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(p: &Path) {
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, "").unwrap();
    }

    #[test]
    fn skip_wins_over_everything() {
        let tmp = tempfile::tempdir().unwrap();
        let desktop = tmp.path().join("Desktop").join("link");
        touch(&desktop);

        for created in [false, true] {
            let cfg = InstallConfig {
                skip_install: true,
                shortcut_created: created,
                shortcut_path: Some(desktop.clone()),
                ..InstallConfig::default()
            };
            assert_eq!(decide(&cfg, &desktop), Decision::Skipped);
        }
    }

    #[test]
    fn recorded_shortcut_that_still_exists() {
        let tmp = tempfile::tempdir().unwrap();
        let recorded = tmp.path().join("Programs").join("link");
        touch(&recorded);
        let mut cfg = InstallConfig::default();
        cfg.mark_shortcut(recorded.clone());

        let d = decide(&cfg, &tmp.path().join("Desktop").join("link"));

        assert_eq!(d, Decision::Recorded(recorded));
        assert!(!d.needs_install());
    }

    #[test]
    fn stale_record_without_desktop_shortcut_shows_installer() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cfg = InstallConfig::default();
        cfg.mark_shortcut(tmp.path().join("deleted-by-user"));

        let d = decide(&cfg, &tmp.path().join("Desktop").join("link"));

        assert_eq!(d, Decision::ShowInstaller);
    }

    #[test]
    fn unrecorded_desktop_shortcut_is_backfilled() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(tmp.path().join("config.json"));
        let desktop = tmp.path().join("Desktop").join("link");
        touch(&desktop);

        assert!(!needs_install(&store, &desktop));

        let cfg = store.load();
        assert!(cfg.shortcut_created);
        assert_eq!(cfg.shortcut_path, Some(desktop));
        assert!(!cfg.skip_install);
    }

    #[test]
    fn fresh_environment_needs_install_and_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(tmp.path().join("config.json"));

        assert!(needs_install(&store, &tmp.path().join("Desktop").join("link")));
        assert!(!store.path().exists());
    }
}
