use crate::utils::retry::retry;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid file name {0:?}")]
    InvalidName(String),
    #[error("request failed: {0}")]
    Http(String),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downloaded {
    pub path: PathBuf,
    pub filename: String,
}

/// Streams the body behind `url` into `out`.
pub trait Fetch {
    fn fetch(&self, url: &str, out: &mut dyn Write) -> Result<(), DownloadError>;
}

pub struct HttpFetch {
    agent: ureq::Agent,
}

impl HttpFetch {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl Fetch for HttpFetch {
    fn fetch(&self, url: &str, out: &mut dyn Write) -> Result<(), DownloadError> {
        let agent = format!("core-music/{}", crate::VERSION);
        let resp = self
            .agent
            .get(url)
            .set("User-Agent", &agent)
            .call()
            .map_err(|e| DownloadError::Http(e.to_string()))?;
        let mut reader = resp.into_reader();
        io::copy(&mut reader, out).map_err(|e| DownloadError::Http(e.to_string()))?;
        Ok(())
    }
}

/// Saves remote files into one directory (the desktop), never overwriting
/// an existing file.
pub struct Downloader<F = HttpFetch> {
    dest_dir: PathBuf,
    fetcher: F,
    attempts: usize,
    retry_delay: Duration,
}

impl<F: Fetch> Downloader<F> {
    pub fn new(dest_dir: PathBuf, fetcher: F, attempts: usize, retry_delay: Duration) -> Self {
        Self {
            dest_dir,
            fetcher,
            attempts,
            retry_delay,
        }
    }

    /// A failed final attempt leaves whatever was written in place.
    pub fn download(&self, url: &str, suggested: &str) -> Result<Downloaded, DownloadError> {
        let filename = sanitize_file_name(suggested)?;
        fs::create_dir_all(&self.dest_dir).map_err(|source| DownloadError::Io {
            path: self.dest_dir.clone(),
            source,
        })?;

        let (path, filename) = unique_destination(&self.dest_dir, &filename, unix_now());
        log::info!("Downloading {url} to {}", path.display());

        let result = retry(self.attempts, self.retry_delay, |_| {
            let mut file = File::create(&path).map_err(|source| DownloadError::Io {
                path: path.clone(),
                source,
            })?;
            self.fetcher.fetch(url, &mut file)?;
            file.flush().map_err(|source| DownloadError::Io {
                path: path.clone(),
                source,
            })
        });

        match result {
            Ok(()) => {
                log::info!("Download success: {filename}");
                Ok(Downloaded { path, filename })
            }
            Err(e) => {
                log::error!("Download failed: {e}");
                Err(e)
            }
        }
    }
}

/// `name` itself when free, otherwise `<stem>_<timestamp><.ext>`.
pub fn unique_destination(dir: &Path, name: &str, timestamp: u64) -> (PathBuf, String) {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return (candidate, name.to_string());
    }
    let as_path = Path::new(name);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let renamed = match as_path.extension() {
        Some(ext) => format!("{stem}_{timestamp}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{timestamp}"),
    };
    (dir.join(&renamed), renamed)
}

// The suggested name comes from the UI; keep only a bare file name.
fn sanitize_file_name(suggested: &str) -> Result<String, DownloadError> {
    let trimmed = suggested.trim();
    let name = Path::new(trimmed)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if name.is_empty() || name != trimmed {
        return Err(DownloadError::InvalidName(suggested.to_string()));
    }
    Ok(name)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs()
}

/// Last path segment of a URL, used when no file name is given.
pub fn file_name_from_url(url: &str) -> Option<String> {
    let no_query = url.split(['?', '#']).next()?;
    let rest = no_query.split_once("://").map_or(no_query, |(_, rest)| rest);
    let (_host, path) = rest.split_once('/')?;
    let last = path.rsplit('/').next()?;
    if last.is_empty() {
        None
    } else {
        Some(last.to_string())
    }
}
