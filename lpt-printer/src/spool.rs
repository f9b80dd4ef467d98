//! Spool staging
//!
//! Print data is written to a uniquely named file before it is copied onto
//! the device. A [`SpoolFile`] owns its file and deletes it when dropped, so
//! cleanup also happens when a dispatch is cancelled mid-write.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

/// File extension of staged spool files
pub const SPOOL_EXTENSION: &str = "prn";

/// Name collisions tolerated before giving up on one staging attempt
const MAX_NAME_ATTEMPTS: u32 = 4;

/// Stages print data on disk
#[async_trait]
pub trait Spool: Send + Sync {
    /// Persist `data` to a fresh spool file
    async fn stage(&self, data: &[u8]) -> io::Result<SpoolFile>;
}

/// Spool directory on the local filesystem
///
/// The directory is created on first use with owner-only permissions.
#[derive(Debug, Clone)]
pub struct SpoolDir {
    root: PathBuf,
}

impl SpoolDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    async fn ensure(&self) -> io::Result<()> {
        let mut builder = tokio::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(0o700);
        builder.create(&self.root).await
    }

    /// `<utc timestamp>-<random>.prn`
    fn unique_name() -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!(
            "{}-{}.{}",
            Utc::now().format("%Y%m%d%H%M%S%3f"),
            &suffix[..12],
            SPOOL_EXTENSION
        )
    }

    async fn create_unique(&self) -> io::Result<(tokio::fs::File, SpoolFile)> {
        let mut last_err = None;
        for _ in 0..MAX_NAME_ATTEMPTS {
            let path = self.root.join(Self::unique_name());
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((file, SpoolFile::new(path))),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    debug!(path = %path.display(), "Spool name collision, retrying");
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err.unwrap_or_else(|| io::Error::other("spool name collision")))
    }
}

#[async_trait]
impl Spool for SpoolDir {
    async fn stage(&self, data: &[u8]) -> io::Result<SpoolFile> {
        self.ensure().await?;

        // The guard is created before writing so a partial file is removed
        let (mut file, spool_file) = self.create_unique().await?;
        file.write_all(data).await?;
        file.flush().await?;
        drop(file);

        debug!(path = %spool_file.path().display(), bytes = data.len(), "Spool file staged");
        Ok(spool_file)
    }
}

/// A staged spool file, deleted on drop
#[derive(Debug)]
pub struct SpoolFile {
    path: PathBuf,
}

impl SpoolFile {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SpoolFile {
    fn drop(&mut self) {
        // Blocking unlink on purpose: Drop cannot await, and the file must be
        // gone by the time the dispatch returns.
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Spool file removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Spool file busy, retrying removal");
                retry_remove(self.path.clone());
            }
        }
    }
}

/// Delay before the second removal attempt
const REMOVE_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Remove `path` once more after a short delay
///
/// A killed `copy` process can hold the file open for a moment after the
/// dispatch gives up on it (Windows refuses to delete open files).
fn retry_remove(path: PathBuf) {
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        warn!(path = %path.display(), "Failed to remove spool file, left for janitor");
        return;
    };

    handle.spawn(async move {
        tokio::time::sleep(REMOVE_RETRY_DELAY).await;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!(path = %path.display(), "Spool file removed on retry"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to remove spool file, left for janitor");
            }
        }
    });
}
