use crate::data::paths::Paths;
use crate::install::script::{PlatformHost, ScriptHost};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(windows)]
pub const SHORTCUT_FILE_NAME: &str = "Core Music.lnk";
#[cfg(not(windows))]
pub const SHORTCUT_FILE_NAME: &str = "core-music.desktop";

const SHORTCUT_DESCRIPTION: &str = "CORE Music Player";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutKind {
    Desktop,
    StartMenu,
}

impl fmt::Display for ShortcutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShortcutKind::Desktop => f.write_str("desktop"),
            ShortcutKind::StartMenu => f.write_str("start menu"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutStage {
    ResolvePath,
    CreateDir,
    ScriptExec,
    PostCheck,
    Remove,
}

impl fmt::Display for ShortcutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShortcutStage::ResolvePath => "resolve-path",
            ShortcutStage::CreateDir => "create-dir",
            ShortcutStage::ScriptExec => "script-exec",
            ShortcutStage::PostCheck => "post-check",
            ShortcutStage::Remove => "remove",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("shortcut {stage} failed: {message}")]
pub struct ShortcutError {
    pub stage: ShortcutStage,
    pub message: String,
}

impl ShortcutError {
    pub fn new(stage: ShortcutStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

/// What a shortcut launches. Derived from the running process each time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutTarget {
    pub executable_path: PathBuf,
    pub working_directory: PathBuf,
    pub display_name: String,
    pub description: String,
}

impl ShortcutTarget {
    pub fn current() -> io::Result<Self> {
        Self::for_executable(resolve_executable()?)
    }

    pub fn for_executable(executable_path: PathBuf) -> io::Result<Self> {
        let working_directory = executable_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} has no parent directory", executable_path.display()),
                )
            })?;
        Ok(Self {
            executable_path,
            working_directory,
            display_name: crate::APP_NAME.to_string(),
            description: SHORTCUT_DESCRIPTION.to_string(),
        })
    }
}

/// The binary itself when the OS can tell us, otherwise `argv[0]` made absolute.
pub fn resolve_executable() -> io::Result<PathBuf> {
    match std::env::current_exe() {
        Ok(exe) => Ok(exe),
        Err(e) => {
            log::warn!("current_exe unavailable ({e}); falling back to argv[0]");
            let arg0 = std::env::args_os()
                .next()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "argv[0] missing"))?;
            let cwd = std::env::current_dir()?;
            Ok(executable_from_arg0(Path::new(&arg0), &cwd))
        }
    }
}

pub fn executable_from_arg0(arg0: &Path, cwd: &Path) -> PathBuf {
    if arg0.is_absolute() {
        arg0.to_path_buf()
    } else {
        cwd.join(arg0)
    }
}

/// Where the shortcut for `kind` lives. Pure; touches nothing on disk.
pub fn shortcut_path(paths: &Paths, kind: ShortcutKind) -> PathBuf {
    shortcut_dir(paths, kind).join(SHORTCUT_FILE_NAME)
}

fn shortcut_dir(paths: &Paths, kind: ShortcutKind) -> PathBuf {
    match kind {
        ShortcutKind::Desktop => paths.desktop_dir.clone(),
        ShortcutKind::StartMenu => paths.programs_dir.join(crate::APP_NAME),
    }
}

/// Creates and removes the app's shortcuts by generating a script, handing it
/// to a [`ScriptHost`], and then checking the filesystem for the result.
pub struct ShortcutProvisioner<H = PlatformHost> {
    paths: Paths,
    host: H,
}

impl ShortcutProvisioner<PlatformHost> {
    pub fn for_platform(paths: Paths) -> Self {
        Self::new(paths, PlatformHost::default())
    }
}

impl<H: ScriptHost> ShortcutProvisioner<H> {
    pub fn new(paths: Paths, host: H) -> Self {
        Self { paths, host }
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn create_shortcut(&self, kind: ShortcutKind) -> Result<PathBuf, ShortcutError> {
        let target = ShortcutTarget::current()
            .map_err(|e| ShortcutError::new(ShortcutStage::ResolvePath, e.to_string()))?;
        self.create_shortcut_for(kind, &target)
    }

    pub fn create_shortcut_for(
        &self,
        kind: ShortcutKind,
        target: &ShortcutTarget,
    ) -> Result<PathBuf, ShortcutError> {
        let dir = shortcut_dir(&self.paths, kind);
        fs::create_dir_all(&dir).map_err(|e| {
            ShortcutError::new(ShortcutStage::CreateDir, format!("{}: {e}", dir.display()))
        })?;
        let link = dir.join(SHORTCUT_FILE_NAME);
        log::info!("Creating {kind} shortcut: {}", link.display());

        // Set when an old entry is still in the way after the delete attempt.
        let mut stale = false;
        if link.symlink_metadata().is_ok() {
            match fs::remove_file(&link) {
                Ok(()) => log::info!("Removed existing shortcut: {}", link.display()),
                Err(e) => {
                    log::warn!("Failed to remove existing shortcut {}: {e}", link.display());
                    stale = true;
                }
            }
        }

        let script = self.write_script(&link, target)?;
        let outcome = self.host.run(&script);
        let script_display = script.display().to_string();
        if let Err(e) = script.close() {
            log::warn!("Failed to clean up {script_display}: {e}");
        }

        let host_ok = match outcome {
            Ok(out) if out.success() => true,
            Ok(out) => {
                log::warn!(
                    "script host exited with {:?}: {}",
                    out.code,
                    if out.output.is_empty() { "<no output>" } else { out.output.as_str() }
                );
                false
            }
            Err(e) => {
                log::error!("Failed to run script host for {kind} shortcut: {e}");
                return Err(ShortcutError::new(ShortcutStage::ScriptExec, e.to_string()));
            }
        };

        if !link.is_file() {
            log::error!("{kind} shortcut not found after creation: {}", link.display());
            return Err(ShortcutError::new(
                ShortcutStage::PostCheck,
                format!("{} was not created", link.display()),
            ));
        }
        // A failed host plus an undeletable old file means what is there is the old one.
        if stale && !host_ok {
            log::error!("{kind} shortcut was not replaced: {}", link.display());
            return Err(ShortcutError::new(
                ShortcutStage::PostCheck,
                format!("{} is a stale shortcut that could not be replaced", link.display()),
            ));
        }
        log::info!("{kind} shortcut created: {}", link.display());
        Ok(link)
    }

    /// Deletes the shortcut for `kind`. `Ok(None)` when there was nothing to delete.
    pub fn remove_shortcut(&self, kind: ShortcutKind) -> Result<Option<PathBuf>, ShortcutError> {
        let link = shortcut_path(&self.paths, kind);
        if !link.exists() {
            return Ok(None);
        }
        fs::remove_file(&link).map_err(|e| {
            ShortcutError::new(ShortcutStage::Remove, format!("{}: {e}", link.display()))
        })?;
        log::info!("Removed {kind} shortcut: {}", link.display());

        if kind == ShortcutKind::StartMenu {
            let app_dir = shortcut_dir(&self.paths, kind);
            match fs::remove_dir(&app_dir) {
                Ok(()) => log::debug!("Removed empty folder {}", app_dir.display()),
                Err(e) if e.kind() == io::ErrorKind::DirectoryNotEmpty => {}
                Err(e) => log::warn!("Failed to remove folder {}: {e}", app_dir.display()),
            }
        }
        Ok(Some(link))
    }

    fn write_script(
        &self,
        link: &Path,
        target: &ShortcutTarget,
    ) -> Result<tempfile::TempPath, ShortcutError> {
        let exec_err = |e: io::Error| ShortcutError::new(ShortcutStage::ScriptExec, e.to_string());

        fs::create_dir_all(&self.paths.temp_dir).map_err(|e| {
            ShortcutError::new(
                ShortcutStage::CreateDir,
                format!("{}: {e}", self.paths.temp_dir.display()),
            )
        })?;
        let mut file = tempfile::Builder::new()
            .prefix("core-music-shortcut-")
            .suffix(self.host.extension())
            .tempfile_in(&self.paths.temp_dir)
            .map_err(exec_err)?;
        let body = self.host.encode(&self.host.render(link, target));
        file.write_all(&body).map_err(exec_err)?;
        file.flush().map_err(exec_err)?;
        Ok(file.into_temp_path())
    }
}
