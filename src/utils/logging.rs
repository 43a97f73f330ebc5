use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Sends `log` output to `log_file` (appending) so it does not fight the
/// terminal UI for the screen. Falls back to stderr if the file can't be opened.
/// `RUST_LOG` overrides the default `info` level.
pub fn init(log_file: &Path) -> Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_secs();

    match open_log_file(log_file) {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!("warning: logging to stderr: {e:#}");
            builder.target(Target::Stderr);
        }
    }

    builder.try_init().context("install logger")
}

fn open_log_file(log_file: &Path) -> Result<fs::File> {
    if let Some(dir) = log_file.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("open {}", log_file.display()))
}
