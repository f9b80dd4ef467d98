//! Spool janitor
//!
//! Spool files only outlive their dispatch when the process dies mid-write.
//! The janitor deletes such leftovers once they are older than the retention
//! window, which is far longer than any dispatch can run.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::spool::SPOOL_EXTENSION;

pub const DEFAULT_RETENTION: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Periodic cleanup of orphaned spool files
#[derive(Debug, Clone)]
pub struct SpoolJanitor {
    spool_dir: PathBuf,
    retention: Duration,
    interval: Duration,
}

impl SpoolJanitor {
    pub fn new(spool_dir: impl Into<PathBuf>) -> Self {
        Self {
            spool_dir: spool_dir.into(),
            retention: DEFAULT_RETENTION,
            interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Delete spool files older than the retention window
    ///
    /// Returns the number of files deleted. Errors are logged, not returned.
    #[instrument(skip(self), fields(dir = %self.spool_dir.display()))]
    pub async fn sweep(&self) -> usize {
        let mut entries = match fs::read_dir(&self.spool_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return 0,
            Err(e) => {
                warn!(error = %e, "Failed to read spool directory");
                return 0;
            }
        };

        let now = SystemTime::now();
        let mut deleted_count = 0;

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to read spool entry");
                    break;
                }
            };

            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SPOOL_EXTENSION) {
                continue;
            }

            let modified = match entry.metadata().await.and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to stat spool file");
                    continue;
                }
            };

            // Timestamps in the future count as fresh
            let age = now.duration_since(modified).unwrap_or_default();
            if age <= self.retention {
                continue;
            }

            match fs::remove_file(&path).await {
                Ok(()) => {
                    debug!(path = %path.display(), age_secs = age.as_secs(), "Orphan spool file deleted");
                    deleted_count += 1;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to delete orphan spool file");
                }
            }
        }

        if deleted_count > 0 {
            info!(count = deleted_count, "Orphan spool files cleaned up");
        }

        deleted_count
    }

    /// Sweep now, then on every interval until cancelled
    pub async fn run(self, shutdown: CancellationToken) {
        // interval() panics on a zero period
        let mut ticker = tokio::time::interval(self.interval.max(Duration::from_secs(1)));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Spool janitor stopped");
                    return;
                }
                // First tick completes immediately
                _ = ticker.tick() => {
                    self.sweep().await;
                }
            }
        }
    }
}
