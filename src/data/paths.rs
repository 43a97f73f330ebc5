use directories::{BaseDirs, UserDirs};
use std::path::{Path, PathBuf};

const ENV_HOME: &str = "CORE_MUSIC_HOME";

const DATA_DIR_NAME: &str = ".CoreMusic";
const CONFIG_FILE_NAME: &str = "config.json";
const SETTINGS_FILE_NAME: &str = "settings.toml";
const LOG_FILE_NAME: &str = "core-music.log";

/// Every per-user location the app touches. Built once at startup and passed
/// down, so tests can point the whole app at a scratch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub config_file: PathBuf,
    pub settings_file: PathBuf,
    pub log_file: PathBuf,
    pub desktop_dir: PathBuf,
    /// Per-user program shortcuts ("Start Menu\Programs" on Windows,
    /// XDG applications dir elsewhere).
    pub programs_dir: PathBuf,
    pub temp_dir: PathBuf,
}

impl Paths {
    pub fn resolve() -> Self {
        if let Some(root) = std::env::var_os(ENV_HOME) {
            return Self::rooted(Path::new(&root));
        }
        Self::from_system().unwrap_or_else(|| {
            // No home directory could be determined: keep everything next to the cwd.
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            Self::rooted(&cwd)
        })
    }

    /// Lays every location out under a single root directory.
    pub fn rooted(root: &Path) -> Self {
        let data = root.join(DATA_DIR_NAME);
        Self {
            config_file: data.join(CONFIG_FILE_NAME),
            settings_file: data.join(SETTINGS_FILE_NAME),
            log_file: data.join(LOG_FILE_NAME),
            desktop_dir: root.join("Desktop"),
            programs_dir: root.join("Programs"),
            temp_dir: root.join("tmp"),
        }
    }

    fn from_system() -> Option<Self> {
        let base = BaseDirs::new()?;
        let home = base.home_dir().to_path_buf();
        let data = home.join(DATA_DIR_NAME);

        let desktop_dir = UserDirs::new()
            .and_then(|u| u.desktop_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| home.join("Desktop"));

        Some(Self {
            config_file: data.join(CONFIG_FILE_NAME),
            settings_file: data.join(SETTINGS_FILE_NAME),
            log_file: data.join(LOG_FILE_NAME),
            desktop_dir,
            programs_dir: system_programs_dir(&base),
            temp_dir: std::env::temp_dir(),
        })
    }
}

#[cfg(windows)]
fn system_programs_dir(base: &BaseDirs) -> PathBuf {
    // config_dir() is %APPDATA% (Roaming) on Windows.
    base.config_dir()
        .join("Microsoft")
        .join("Windows")
        .join("Start Menu")
        .join("Programs")
}

#[cfg(not(windows))]
fn system_programs_dir(base: &BaseDirs) -> PathBuf {
    // $XDG_DATA_HOME/applications, usually ~/.local/share/applications
    base.data_dir().join("applications")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooted_keeps_everything_under_root() {
        let root = PathBuf::from("/scratch/home");
        let paths = Paths::rooted(&root);
        assert_eq!(paths.config_file, root.join(".CoreMusic").join("config.json"));
        assert_eq!(paths.settings_file, root.join(".CoreMusic").join("settings.toml"));
        assert_eq!(paths.desktop_dir, root.join("Desktop"));
        assert_eq!(paths.programs_dir, root.join("Programs"));
        for p in [&paths.log_file, &paths.temp_dir] {
            assert!(p.starts_with(&root));
        }
    }

    #[test]
    fn resolve_prefers_env_root() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let prior = std::env::var_os(ENV_HOME);

        let tmp = tempfile::tempdir().unwrap();
        std::env::set_var(ENV_HOME, tmp.path());
        assert_eq!(Paths::resolve(), Paths::rooted(tmp.path()));

        if let Some(v) = prior {
            std::env::set_var(ENV_HOME, v);
        } else {
            std::env::remove_var(ENV_HOME);
        }
    }

    static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
}
